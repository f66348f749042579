//! Common types and constants shared by every decoder
//!
//! This module defines the status codes, algorithm signatures and the error
//! type used by the RLE, LZSS and Deflate decoders.

use std::fmt;
use thiserror::Error;

/// Non-fatal outcome of a single `process` call
///
/// Every call reports exactly one of these. Fatal conditions are returned
/// as [`DecompressError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Input and output were reconciled and the stream is at a clean end
    Done,
    /// Input remains but the output buffer was filled first
    BufferTooSmall,
    /// Output space remains but the input ran out before the stream ended
    DataStarvation,
}

impl Status {
    /// Returns true for [`Status::Done`]
    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Done => "done",
            Status::BufferTooSmall => "output buffer too small",
            Status::DataStarvation => "data starvation",
        };
        f.write_str(text)
    }
}

/// Four character code identifying a compression algorithm
///
/// The code is packed big-endian, so `Signature::ZLIB` has the value
/// `0x5A4C4942`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub u32);

impl Signature {
    /// ILBM style run length encoding
    pub const RLE: Signature = Signature::from_bytes(*b"RLE ");
    /// 4K window LZSS
    pub const LZSS: Signature = Signature::from_bytes(*b"LZSS");
    /// zlib framed DEFLATE
    pub const ZLIB: Signature = Signature::from_bytes(*b"ZLIB");

    /// Build a signature from its four ASCII characters
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Signature(u32::from_be_bytes(bytes))
    }

    /// The four characters of the signature
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            if byte.is_ascii_graphic() || byte == b' ' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02x}")?;
            }
        }
        Ok(())
    }
}

/// Error type for decompression operations
#[derive(Debug, Error)]
pub enum DecompressError {
    /// zlib header names a method other than DEFLATE
    #[error("Invalid compression method: {0:#04x} (expected 8)")]
    InvalidMethod(u8),

    /// zlib header asks for a window larger than 32K
    #[error("Invalid window size: {0} bits (maximum 15)")]
    InvalidWindowSize(u8),

    /// zlib header check bits are wrong
    #[error("Invalid zlib header check: CMF {cmf:#04x}, FLG {flg:#04x}")]
    InvalidHeaderCheck {
        /// Compression method and info byte
        cmf: u8,
        /// Flags byte
        flg: u8,
    },

    /// Stream was compressed with a preset dictionary that has not been supplied
    #[error("Preset dictionary required (Adler-32 {0:08X})")]
    DictionaryRequired(u32),

    /// Supplied dictionary does not match the one the stream was built with
    #[error("Preset dictionary mismatch: expected {expected:08X}, got {actual:08X}")]
    DictionaryMismatch {
        /// Adler-32 stored in the stream
        expected: u32,
        /// Adler-32 of the supplied dictionary
        actual: u32,
    },

    /// A dictionary was supplied while the stream was not waiting for one
    #[error("Preset dictionary not expected in this state")]
    UnexpectedDictionary,

    /// Block header carries the reserved block type 3
    #[error("Invalid block type")]
    InvalidBlockType,

    /// Stored block length and its complement disagree
    #[error("Invalid stored block lengths: {len:#06x} vs complement {nlen:#06x}")]
    StoredLengthMismatch {
        /// Length field
        len: u16,
        /// Ones complement length field
        nlen: u16,
    },

    /// Dynamic block declares too many literal/length or distance codes
    #[error("Too many length or distance symbols")]
    InvalidTableCounts,

    /// Code length set is over-subscribed or incomplete
    #[error("Invalid code lengths set")]
    InvalidCodeLengths,

    /// Repeat code runs past the end of the code lengths or has nothing to repeat
    #[error("Invalid bit length repeat")]
    InvalidRepeat,

    /// Huffman tables need more than the decoder's table workspace
    #[error("Huffman table workspace exhausted")]
    TableOverflow,

    /// Literal/length code that maps to no symbol
    #[error("Invalid literal/length code")]
    InvalidLiteralLength,

    /// Distance code that maps to no symbol
    #[error("Invalid distance code")]
    InvalidDistance,

    /// Adler-32 trailer does not match the decompressed data
    #[error("Adler-32 checksum mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch {
        /// Checksum stored in the stream
        expected: u32,
        /// Checksum of the decompressed output
        actual: u32,
    },

    /// Decoder hit a fatal error earlier and must be reset
    #[error("Decoder aborted, reset required")]
    Aborted,

    /// A one-shot decode did not finish cleanly
    #[error("Decompression incomplete: {0}")]
    Incomplete(Status),

    /// No decoder is registered for the signature
    #[error("Unknown compression signature: {0}")]
    UnknownSignature(Signature),

    /// No decoder is registered for the resource compression id
    #[error("Unknown compression id: {0}")]
    UnknownCompressId(u32),

    /// Unexpected end of input
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for decompression operations
pub type Result<T> = std::result::Result<T, DecompressError>;

/// Default input chunk size for streaming readers
pub const IN_BUFF_SIZE: usize = 0x800;

/// Largest chunk the resource loader reads at once
pub const MAX_CHUNK_SIZE: usize = 0x8000;
