//! TCP addressing and connections
//!
//! A [`TcpStream`] obtained from [`TcpStream::connect`] returns
//! immediately while the connection is established in the background;
//! the connection outcome is surfaced by the first read, write or
//! [`TcpStream::peer_address`] call. A failed connection reports the
//! underlying I/O error exactly once, then every later operation fails
//! with [`DicomError::StreamClosed`].

use std::io::{Read, Write};
use std::net::{self, Shutdown, SocketAddr, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use log::debug;

use dicomite_core::{DicomError, DicomResult};

use crate::stream::{StreamInput, StreamOutput};

/// Resolved TCP endpoint
///
/// Resolution happens at construction time; an unresolvable node or a
/// non-numeric service fails immediately with
/// [`DicomError::AddressResolution`].
#[derive(Debug, Clone)]
pub struct TcpAddress {
    node: String,
    service: String,
    socket_addr: SocketAddr,
}

impl TcpAddress {
    fn resolve(node: &str, service: &str, default_node: &str) -> DicomResult<Self> {
        let node = if node.is_empty() { default_node } else { node };
        let port: u16 = service.parse().map_err(|_| {
            DicomError::AddressResolution(format!("invalid service '{service}'"))
        })?;
        let socket_addr = (node, port)
            .to_socket_addrs()
            .map_err(|e| DicomError::AddressResolution(format!("{node}:{port}: {e}")))?
            .next()
            .ok_or_else(|| {
                DicomError::AddressResolution(format!("{node}:{port}: no address found"))
            })?;
        Ok(Self {
            node: node.to_owned(),
            service: service.to_owned(),
            socket_addr,
        })
    }

    fn from_socket_addr(socket_addr: SocketAddr) -> Self {
        Self {
            node: socket_addr.ip().to_string(),
            service: socket_addr.port().to_string(),
            socket_addr,
        }
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.socket_addr
    }
}

impl std::fmt::Display for TcpAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.node, self.service)
    }
}

/// Address of a remote peer to connect to
///
/// An empty node resolves to the local host.
#[derive(Debug, Clone)]
pub struct TcpActiveAddress {
    address: TcpAddress,
}

impl TcpActiveAddress {
    pub fn new(node: &str, service: &str) -> DicomResult<Self> {
        Ok(Self {
            address: TcpAddress::resolve(node, service, "127.0.0.1")?,
        })
    }
}

impl std::ops::Deref for TcpActiveAddress {
    type Target = TcpAddress;

    fn deref(&self) -> &TcpAddress {
        &self.address
    }
}

/// Local address to listen on
///
/// An empty node binds every local interface.
#[derive(Debug, Clone)]
pub struct TcpPassiveAddress {
    address: TcpAddress,
}

impl TcpPassiveAddress {
    pub fn new(node: &str, service: &str) -> DicomResult<Self> {
        Ok(Self {
            address: TcpAddress::resolve(node, service, "0.0.0.0")?,
        })
    }
}

impl std::ops::Deref for TcpPassiveAddress {
    type Target = TcpAddress;

    fn deref(&self) -> &TcpAddress {
        &self.address
    }
}

/// A connect attempt still in flight
///
/// The receiver yields the outcome exactly once; a waiter takes it out
/// before blocking, so the state lock stays free while the connect is
/// pending. `abort` holds a second sender to the same channel, letting
/// `close()` wake a blocked waiter.
struct ConnectWait {
    receiver: Option<Receiver<std::io::Result<net::TcpStream>>>,
    abort: Sender<std::io::Result<net::TcpStream>>,
}

/// Connection lifecycle
enum TcpStreamState {
    Connecting(ConnectWait),
    Connected(Arc<net::TcpStream>),
    Failed,
    Closed,
}

impl std::fmt::Debug for TcpStreamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TcpStreamState::Connecting(_) => "Connecting",
            TcpStreamState::Connected(_) => "Connected",
            TcpStreamState::Failed => "Failed",
            TcpStreamState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

type SharedState = Arc<Mutex<TcpStreamState>>;

/// Waits for a pending connection if necessary and returns the socket.
///
/// The connect error is returned once; the state then moves to `Failed`
/// and every later call reports `StreamClosed`. The state lock is not
/// held while blocked on the pending connect, so `close()` stays able
/// to abort the wait.
fn established(state: &SharedState) -> DicomResult<Arc<net::TcpStream>> {
    loop {
        let receiver = {
            let mut guard = state.lock().map_err(|_| DicomError::StreamClosed)?;
            match &mut *guard {
                TcpStreamState::Connected(socket) => return Ok(Arc::clone(socket)),
                TcpStreamState::Failed | TcpStreamState::Closed => {
                    return Err(DicomError::StreamClosed)
                }
                TcpStreamState::Connecting(wait) => match wait.receiver.take() {
                    Some(receiver) => receiver,
                    // The other half is already waiting on this connect;
                    // look again once it has installed the outcome.
                    None => {
                        drop(guard);
                        thread::yield_now();
                        continue;
                    }
                },
            }
        };

        let outcome = receiver.recv();
        let mut guard = state.lock().map_err(|_| DicomError::StreamClosed)?;
        // close() may have run while the wait was parked
        if matches!(*guard, TcpStreamState::Closed) {
            return Err(DicomError::StreamClosed);
        }
        return match outcome {
            Ok(Ok(socket)) => {
                let socket = Arc::new(socket);
                *guard = TcpStreamState::Connected(Arc::clone(&socket));
                Ok(socket)
            }
            Ok(Err(e)) => {
                debug!("tcp connect failed: {e}");
                *guard = TcpStreamState::Failed;
                Err(DicomError::Io(e))
            }
            Err(_) => {
                *guard = TcpStreamState::Failed;
                Err(DicomError::StreamClosed)
            }
        };
    }
}

/// TCP connection
///
/// The reading and writing halves are detached with [`TcpStream::input`]
/// and [`TcpStream::output`]; each half can be obtained once and may
/// live on its own thread. [`TcpStream::close`] shuts the socket down
/// and aborts blocked reads and writes on the detached halves.
#[derive(Debug)]
pub struct TcpStream {
    state: SharedState,
    input_taken: bool,
    output_taken: bool,
}

impl TcpStream {
    /// Starts connecting to the peer and returns immediately.
    pub fn connect(address: &TcpActiveAddress) -> Self {
        let socket_addr = address.socket_addr();
        debug!("tcp connecting to {socket_addr}");
        let (sender, receiver) = mpsc::channel();
        let abort = sender.clone();
        thread::spawn(move || {
            let _ = sender.send(net::TcpStream::connect(socket_addr));
        });
        Self {
            state: Arc::new(Mutex::new(TcpStreamState::Connecting(ConnectWait {
                receiver: Some(receiver),
                abort,
            }))),
            input_taken: false,
            output_taken: false,
        }
    }

    fn from_socket(socket: net::TcpStream) -> Self {
        Self {
            state: Arc::new(Mutex::new(TcpStreamState::Connected(Arc::new(socket)))),
            input_taken: false,
            output_taken: false,
        }
    }

    /// Address of the connected peer
    ///
    /// # Errors
    ///
    /// Returns [`DicomError::NotConnected`] while the connection is
    /// still being established, the deferred connect error once it has
    /// failed, and [`DicomError::StreamClosed`] afterwards.
    pub fn peer_address(&self) -> DicomResult<TcpAddress> {
        let mut guard = self.state.lock().map_err(|_| DicomError::StreamClosed)?;
        match &mut *guard {
            TcpStreamState::Connected(socket) => {
                Ok(TcpAddress::from_socket_addr(socket.peer_addr()?))
            }
            TcpStreamState::Connecting(wait) => {
                let receiver = wait.receiver.as_ref().ok_or(DicomError::NotConnected)?;
                match receiver.try_recv() {
                    Ok(Ok(socket)) => {
                        let peer = socket.peer_addr()?;
                        *guard = TcpStreamState::Connected(Arc::new(socket));
                        Ok(TcpAddress::from_socket_addr(peer))
                    }
                    Ok(Err(e)) => {
                        *guard = TcpStreamState::Failed;
                        Err(DicomError::Io(e))
                    }
                    Err(TryRecvError::Empty) => Err(DicomError::NotConnected),
                    Err(TryRecvError::Disconnected) => {
                        *guard = TcpStreamState::Failed;
                        Err(DicomError::StreamClosed)
                    }
                }
            }
            TcpStreamState::Failed | TcpStreamState::Closed => Err(DicomError::StreamClosed),
        }
    }

    /// Detaches the reading half; available once.
    pub fn input(&mut self) -> DicomResult<TcpStreamInput> {
        if self.input_taken {
            return Err(DicomError::InvalidData(
                "tcp input stream already taken".to_owned(),
            ));
        }
        self.input_taken = true;
        Ok(TcpStreamInput {
            state: Arc::clone(&self.state),
        })
    }

    /// Detaches the writing half; available once.
    pub fn output(&mut self) -> DicomResult<TcpStreamOutput> {
        if self.output_taken {
            return Err(DicomError::InvalidData(
                "tcp output stream already taken".to_owned(),
            ));
        }
        self.output_taken = true;
        Ok(TcpStreamOutput {
            state: Arc::clone(&self.state),
        })
    }

    /// Shuts the connection down.
    ///
    /// Reads and writes blocked on the detached halves are interrupted
    /// and fail; later operations report [`DicomError::StreamClosed`].
    pub fn close(&mut self) -> DicomResult<()> {
        let mut guard = self.state.lock().map_err(|_| DicomError::StreamClosed)?;
        match &*guard {
            TcpStreamState::Connected(socket) => {
                let _ = socket.shutdown(Shutdown::Both);
            }
            TcpStreamState::Connecting(wait) => {
                // Wake a waiter parked on the pending connect
                let _ = wait.abort.send(Err(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "connection closed",
                )));
            }
            _ => {}
        }
        *guard = TcpStreamState::Closed;
        Ok(())
    }
}

/// Reading half of a [`TcpStream`]
#[derive(Debug)]
pub struct TcpStreamInput {
    state: SharedState,
}

impl StreamInput for TcpStreamInput {
    fn read(&mut self, buf: &mut [u8]) -> DicomResult<usize> {
        let socket = established(&self.state)?;
        // The lock is not held while blocked on the socket, so close()
        // can shut it down and interrupt this read.
        Ok((&*socket).read(buf)?)
    }
}

/// Writing half of a [`TcpStream`]
#[derive(Debug)]
pub struct TcpStreamOutput {
    state: SharedState,
}

impl StreamOutput for TcpStreamOutput {
    fn write(&mut self, buf: &[u8]) -> DicomResult<()> {
        let socket = established(&self.state)?;
        (&*socket).write_all(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> DicomResult<()> {
        let socket = established(&self.state)?;
        (&*socket).flush()?;
        Ok(())
    }
}

/// Listening socket accepting incoming connections
#[derive(Debug)]
pub struct TcpListener {
    listener: net::TcpListener,
}

impl TcpListener {
    pub fn bind(address: &TcpPassiveAddress) -> DicomResult<Self> {
        let listener = net::TcpListener::bind(address.socket_addr())?;
        debug!("tcp listening on {}", listener.local_addr()?);
        Ok(Self { listener })
    }

    /// Blocks until a peer connects and returns the connected stream.
    pub fn accept(&self) -> DicomResult<TcpStream> {
        let (socket, peer) = self.listener.accept()?;
        debug!("tcp accepted connection from {peer}");
        Ok(TcpStream::from_socket(socket))
    }

    pub fn local_address(&self) -> DicomResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral_listener() -> TcpListener {
        let address = TcpPassiveAddress::new("127.0.0.1", "0").unwrap();
        TcpListener::bind(&address).unwrap()
    }

    #[test]
    fn test_invalid_service_fails_resolution() {
        let result = TcpActiveAddress::new("127.0.0.1", "dicom");
        assert!(matches!(result, Err(DicomError::AddressResolution(_))));
    }

    #[test]
    fn test_unknown_host_fails_resolution() {
        let result = TcpActiveAddress::new("host.invalid.", "104");
        assert!(matches!(result, Err(DicomError::AddressResolution(_))));
    }

    #[test]
    fn test_loopback_exchange() {
        let listener = ephemeral_listener();
        let port = listener.local_address().unwrap().port().to_string();

        let active = TcpActiveAddress::new("127.0.0.1", &port).unwrap();
        let mut client = TcpStream::connect(&active);
        let mut server = listener.accept().unwrap();

        let mut client_output = client.output().unwrap();
        client_output.write(b"ping").unwrap();

        let mut server_input = server.input().unwrap();
        let mut buf = [0u8; 4];
        server_input.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        let mut server_output = server.output().unwrap();
        server_output.write(b"pong").unwrap();

        let mut client_input = client.input().unwrap();
        client_input.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"pong");

        let peer = client.peer_address().unwrap();
        assert_eq!(peer.node(), "127.0.0.1");
        assert_eq!(peer.service(), &port);
    }

    #[test]
    fn test_halves_taken_once() {
        let listener = ephemeral_listener();
        let port = listener.local_address().unwrap().port().to_string();
        let active = TcpActiveAddress::new("127.0.0.1", &port).unwrap();
        let mut client = TcpStream::connect(&active);

        assert!(client.input().is_ok());
        assert!(client.input().is_err());
        assert!(client.output().is_ok());
        assert!(client.output().is_err());
    }

    #[test]
    fn test_deferred_connect_fault() {
        // Grab a free port, then close the listener so connecting to it
        // is refused.
        let port = {
            let listener = ephemeral_listener();
            listener.local_address().unwrap().port().to_string()
        };

        let active = TcpActiveAddress::new("127.0.0.1", &port).unwrap();
        let mut client = TcpStream::connect(&active);
        let mut input = client.input().unwrap();

        // First use surfaces the connect error.
        let mut buf = [0u8; 1];
        assert!(matches!(input.read(&mut buf), Err(DicomError::Io(_))));
        // Later uses report the stream as closed.
        assert!(matches!(
            input.read(&mut buf),
            Err(DicomError::StreamClosed)
        ));
    }

    #[test]
    fn test_close_while_connecting() {
        let port = {
            let listener = ephemeral_listener();
            listener.local_address().unwrap().port().to_string()
        };
        let active = TcpActiveAddress::new("127.0.0.1", &port).unwrap();
        let mut client = TcpStream::connect(&active);
        let mut input = client.input().unwrap();

        // close() must not block behind the pending connect, and it wakes
        // any waiter parked on it
        client.close().unwrap();
        let mut buf = [0u8; 1];
        assert!(matches!(
            input.read(&mut buf),
            Err(DicomError::StreamClosed)
        ));
    }

    #[test]
    fn test_operations_after_close() {
        let listener = ephemeral_listener();
        let port = listener.local_address().unwrap().port().to_string();
        let active = TcpActiveAddress::new("127.0.0.1", &port).unwrap();

        let mut client = TcpStream::connect(&active);
        let _server = listener.accept().unwrap();

        let mut output = client.output().unwrap();
        output.write(b"x").unwrap();
        client.close().unwrap();

        assert!(matches!(
            output.write(b"y"),
            Err(DicomError::StreamClosed)
        ));
        assert!(matches!(
            client.peer_address(),
            Err(DicomError::StreamClosed)
        ));
    }
}
