//! Error handling for decompression operations
//!
//! This module re-exports the error type used throughout the crate. Fatal
//! stream corruption is reported through [`DecompressError`]; resumable
//! buffer exhaustion is reported through [`crate::Status`].

pub use crate::common::DecompressError;
pub use crate::common::Result;
