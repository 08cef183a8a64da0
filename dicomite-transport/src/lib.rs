//! Stream abstraction and network transport
//!
//! This crate provides the byte-stream capability traits used for
//! serialization, with File, Memory and TCP variants, and the TCP
//! addressing/connection objects used for remote exchange.

pub mod file;
pub mod memory;
pub mod stream;
pub mod tcp;

pub use file::{FileStreamInput, FileStreamOutput};
pub use memory::{MemoryStreamInput, MemoryStreamOutput};
pub use stream::{StreamInput, StreamOutput};
pub use tcp::{
    TcpActiveAddress, TcpAddress, TcpListener, TcpPassiveAddress, TcpStream, TcpStreamInput,
    TcpStreamOutput,
};
