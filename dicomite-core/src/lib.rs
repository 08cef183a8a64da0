//! Core types and utilities for the dicomite DICOM toolkit
//!
//! This crate provides fundamental types, error handling, and utilities
//! used throughout the dicomite implementation.

pub mod error;
pub mod tag_id;
pub mod vr;
pub mod datatypes;
pub mod transfer_syntax;
pub mod uid;

pub use error::{DicomError, DicomResult};
pub use tag_id::TagId;
pub use transfer_syntax::{Endianness, TransferSyntax};
pub use vr::Vr;
pub use datatypes::{Age, AgeUnits, DicomDate, PersonName};
pub use uid::{RandomUidGenerator, UidGeneratorRegistry};
