//! zlib framed DEFLATE decoding
//!
//! [`DeflateDecoder`] is a fully resumable inflater built as three nested
//! state machines:
//!
//! - the stream layer parses the RFC 1950 header, an optional preset
//!   dictionary id and the Adler-32 trailer;
//! - the block layer reads block headers, copies stored blocks and builds
//!   dynamic Huffman tables;
//! - the codes layer decodes literals and length/distance pairs into a 32K
//!   sliding window.
//!
//! Any of them can stop at any bit and pick up again on the next call to
//! [`crate::Decompress::process`].

mod blocks;
mod codes;
mod huffman;
mod state;
mod stream;
mod tables;

pub use state::DeflateDecoder;
pub use tables::WINDOW_SIZE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{DecompressError, Status};
    use crate::decompress::Decompress;
    use crate::adler32::adler32;

    /// Wrap `data` in a zlib stream of stored blocks
    fn stored_stream(data: &[u8], block_size: usize) -> Vec<u8> {
        let mut stream = vec![0x78, 0x01];
        let mut chunks = data.chunks(block_size).peekable();
        if chunks.peek().is_none() {
            stream.extend([0x01, 0x00, 0x00, 0xFF, 0xFF]);
        }
        while let Some(chunk) = chunks.next() {
            stream.push(u8::from(chunks.peek().is_none()));
            let len = chunk.len() as u16;
            stream.extend(len.to_le_bytes());
            stream.extend((!len).to_le_bytes());
            stream.extend(chunk);
        }
        stream.extend(adler32(data).to_be_bytes());
        stream
    }

    #[test]
    fn test_stored_blocks() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let stream = stored_stream(&data, 3000);
        let mut output = vec![0u8; data.len()];
        let mut decoder = DeflateDecoder::new();
        assert_eq!(decoder.process(&mut output, &stream).unwrap(), Status::Done);
        assert_eq!(output, data);
        assert!(decoder.is_finished());
        assert_eq!(decoder.processed_input_size(), stream.len());
    }

    #[test]
    fn test_empty_stream() {
        let stream = stored_stream(&[], 1);
        let mut decoder = DeflateDecoder::new();
        assert_eq!(decoder.process(&mut [], &stream).unwrap(), Status::Done);
        assert_eq!(decoder.total_output_size(), 0);
    }

    #[test]
    fn test_stored_length_mismatch() {
        let mut stream = stored_stream(b"abcdef", 16);
        stream[5] ^= 0x01;
        let mut output = [0u8; 6];
        let mut decoder = DeflateDecoder::new();
        assert!(matches!(
            decoder.process(&mut output, &stream),
            Err(DecompressError::StoredLengthMismatch { len: 6, nlen: 0xFFF8 })
        ));
    }

    #[test]
    fn test_stored_output_one_byte_at_a_time() {
        let data = b"stored data comes out one byte per call";
        let stream = stored_stream(data, 7);
        let mut decoder = DeflateDecoder::new();
        let mut output = vec![0u8; data.len()];
        let mut consumed = 0;
        for i in 0..data.len() {
            let status = decoder
                .process(&mut output[i..i + 1], &stream[consumed..])
                .unwrap();
            consumed += decoder.processed_input_size();
            let expected = if i + 1 == data.len() {
                Status::Done
            } else {
                Status::BufferTooSmall
            };
            assert_eq!(status, expected, "byte {i}");
        }
        assert_eq!(&output[..], &data[..]);
        assert_eq!(consumed, stream.len());
    }
}
