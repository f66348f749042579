//! resumable-decompress - Resumable streaming decompressors
//!
//! This crate provides three decoders that can be driven one chunk at a time
//! and stopped and restarted at any byte of input or output:
//!
//! - [`RleDecoder`] for ILBM style run length encoding
//! - [`LzssDecoder`] for LZSS with a 4K history window
//! - [`DeflateDecoder`] for zlib framed DEFLATE (RFC 1950/1951)
//!
//! Every decoder implements the [`Decompress`] trait. A call to
//! [`Decompress::process`] consumes as much input as it can, writes as much
//! output as fits and reports a [`Status`]; the caller advances its buffers by
//! [`Decompress::processed_input_size`] and [`Decompress::processed_output_size`]
//! and calls again.
//!
//! # Features
//!
//! - Any split of input or output gives byte-identical results
//! - Preset dictionary support for zlib streams
//! - Streaming API via the Read trait
//! - Chunked loading of packed resources with known sizes
//! - Optional async support (`async` feature)
//!
//! # Example
//!
//! ```no_run
//! use resumable_decompress::{Decompress, DecompressReader, DeflateDecoder};
//! use std::io::Read;
//!
//! let packed = std::fs::read("data.zlib")?;
//!
//! // Drive the decoder by hand, 64 bytes of output at a time
//! let mut decoder = DeflateDecoder::new();
//! let mut input = &packed[..];
//! let mut output = Vec::new();
//! let mut chunk = [0u8; 64];
//! while !decoder.is_finished() {
//!     decoder.process(&mut chunk, input)?;
//!     input = &input[decoder.processed_input_size()..];
//!     output.extend_from_slice(&chunk[..decoder.processed_output_size()]);
//! }
//!
//! // Or use the streaming API
//! let mut reader = DecompressReader::new(&packed[..], DeflateDecoder::new());
//! let mut streamed = Vec::new();
//! reader.read_to_end(&mut streamed)?;
//! assert_eq!(output, streamed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod adler32;
pub mod common;
pub mod decompress;
pub mod error;
pub mod inflate;
pub mod lzss;
pub mod reader;
pub mod rle;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;
#[cfg(feature = "async")]
pub mod async_reader;

// Re-export commonly used types
pub use adler32::{adler32, adler32_update};
pub use common::{DecompressError, Result, Signature, Status, IN_BUFF_SIZE, MAX_CHUNK_SIZE};
pub use decompress::{Algorithm, ByteCounters, ByteCursor, Decompress};
pub use inflate::DeflateDecoder;
pub use lzss::LzssDecoder;
pub use reader::{decompress_resource, DecompressReader};
pub use rle::RleDecoder;

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;
#[cfg(feature = "async")]
pub use async_reader::AsyncDecompressReader;

// Convenience functions

/// Decode a complete stream whose unpacked size is known
fn decompress_sized<D: Decompress>(
    mut decoder: D,
    input: &[u8],
    unpacked_len: usize,
) -> Result<Vec<u8>> {
    let mut output = vec![0u8; unpacked_len];
    decoder.decompress_into(&mut output, input)?;
    Ok(output)
}

/// Decompress ILBM RLE data
///
/// # Arguments
/// * `input` - The compressed data
/// * `unpacked_len` - Exact size of the decompressed data
pub fn decompress_rle(input: &[u8], unpacked_len: usize) -> Result<Vec<u8>> {
    decompress_sized(RleDecoder::new(), input, unpacked_len)
}

/// Decompress LZSS data
///
/// # Arguments
/// * `input` - The compressed data
/// * `unpacked_len` - Exact size of the decompressed data
pub fn decompress_lzss(input: &[u8], unpacked_len: usize) -> Result<Vec<u8>> {
    decompress_sized(LzssDecoder::new(), input, unpacked_len)
}

/// Decompress a zlib stream
///
/// # Arguments
/// * `input` - The compressed data
/// * `unpacked_len` - Exact size of the decompressed data
pub fn decompress_zlib(input: &[u8], unpacked_len: usize) -> Result<Vec<u8>> {
    decompress_sized(DeflateDecoder::new(), input, unpacked_len)
}

/// Decompress a zlib stream of unknown unpacked size
///
/// The output grows until the stream's checksum has been verified.
pub fn inflate_zlib(input: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new();
    let mut output = vec![0u8; input.len().saturating_mul(4).max(inflate::WINDOW_SIZE)];
    let mut in_pos = 0;
    let mut out_pos = 0;

    loop {
        let status = decoder.process(&mut output[out_pos..], &input[in_pos..])?;
        in_pos += decoder.processed_input_size();
        out_pos += decoder.processed_output_size();
        if decoder.is_finished() {
            break;
        }
        match status {
            // Spare output but no input left to fill it
            Status::DataStarvation if out_pos < output.len() => {
                return Err(DecompressError::UnexpectedEof);
            }
            _ => {
                let grown = output.len() * 2;
                output.resize(grown, 0);
            }
        }
    }

    output.truncate(out_pos);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _ = Status::Done;
        let _ = Signature::ZLIB;
        assert_eq!(adler32(b"abc"), 0x024D_0127);
        assert_eq!(Algorithm::from_compress_id(2).unwrap(), Algorithm::Lzss);
    }

    #[test]
    fn test_one_shot_helpers() {
        assert_eq!(decompress_rle(&[0xFD, 0x07], 4).unwrap(), [7, 7, 7, 7]);
        assert_eq!(
            decompress_lzss(&[0x03, b'a', b'b', 0xFF, 0x0F], 5).unwrap(),
            b"abbbb"
        );
        assert!(matches!(
            decompress_rle(&[0xFD, 0x07], 3),
            Err(DecompressError::Incomplete(Status::BufferTooSmall))
        ));
    }

    #[test]
    fn test_inflate_grows_output() {
        // 200000 zero bytes, far more than the first output guess
        let mut stream = hex::decode("78daedc13101000000c2a0f54f6d067fa0").unwrap();
        stream.resize(stream.len() + 193, 0);
        stream.extend(hex::decode("80d7000d6d0001").unwrap());

        let output = inflate_zlib(&stream).unwrap();
        assert_eq!(output.len(), 200_000);
        assert!(output.iter().all(|&b| b == 0));
        assert_eq!(decompress_zlib(&stream, 200_000).unwrap(), output);
    }

    #[test]
    fn test_inflate_stops_at_trailer() {
        let hello = hex::decode("78dacb48cdc9c957c84090003a2e067d").unwrap();
        assert_eq!(inflate_zlib(&hello).unwrap(), b"hello hello hello");

        let raw = include_bytes!("../tests/data/reference.raw");
        let packed = include_bytes!("../tests/data/reference.zlib");
        assert_eq!(inflate_zlib(packed).unwrap(), raw);

        // Bytes after the trailer are not part of the stream
        let mut trailing = hello.clone();
        trailing.extend_from_slice(b"next");
        assert_eq!(inflate_zlib(&trailing).unwrap(), b"hello hello hello");
    }

    #[test]
    fn test_inflate_truncated() {
        let stream = [0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, b'a', b'b'];
        assert!(matches!(
            inflate_zlib(&stream),
            Err(DecompressError::UnexpectedEof)
        ));
    }
}
