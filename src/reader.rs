//! Streaming decompression over `std::io::Read`
//!
//! [`DecompressReader`] drives any [`Decompress`] implementation from a byte
//! source, and [`decompress_resource`] loads a packed resource of known size
//! in bounded chunks.

use crate::common::{DecompressError, Result, Status, IN_BUFF_SIZE};
use crate::decompress::Decompress;
use log::debug;
use std::io::{self, Read};

/// Streaming decompression reader implementing Read trait
#[derive(Debug)]
pub struct DecompressReader<R: Read, D: Decompress> {
    reader: R,
    decoder: D,
    in_buff: Vec<u8>,
    in_pos: usize,
    in_len: usize,
    eof: bool,
    finished: bool,
}

impl<R: Read, D: Decompress> DecompressReader<R, D> {
    /// Create a reader with the default 2K input buffer
    pub fn new(reader: R, decoder: D) -> Self {
        Self::with_buffer_size(reader, decoder, IN_BUFF_SIZE)
    }

    /// Create a reader that pulls at most `size` compressed bytes at a time
    pub fn with_buffer_size(reader: R, mut decoder: D, size: usize) -> Self {
        decoder.reset();
        Self {
            reader,
            decoder,
            in_buff: vec![0; size.max(1)],
            in_pos: 0,
            in_len: 0,
            eof: false,
            finished: false,
        }
    }

    /// The decoder being driven
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Mutable access to the decoder, for example to supply a preset dictionary
    pub fn decoder_mut(&mut self) -> &mut D {
        &mut self.decoder
    }

    /// Total compressed bytes consumed so far
    pub fn total_in(&self) -> usize {
        self.decoder.total_input_size()
    }

    /// Total decompressed bytes produced so far
    pub fn total_out(&self) -> usize {
        self.decoder.total_output_size()
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill_input(&mut self) -> io::Result<()> {
        if self.in_pos == self.in_len && !self.eof {
            self.in_len = self.reader.read(&mut self.in_buff)?;
            self.in_pos = 0;
            if self.in_len == 0 {
                self.eof = true;
            }
        }
        Ok(())
    }
}

impl<R: Read, D: Decompress> Read for DecompressReader<R, D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.finished {
            return Ok(0);
        }

        loop {
            self.fill_input()?;

            let result = self
                .decoder
                .process(buf, &self.in_buff[self.in_pos..self.in_len]);
            let consumed = self.decoder.processed_input_size();
            let produced = self.decoder.processed_output_size();
            self.in_pos += consumed;
            result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            if produced > 0 {
                return Ok(produced);
            }
            if consumed > 0 {
                continue;
            }

            // No progress in either direction
            if self.eof || self.in_pos < self.in_len {
                if self.decoder.is_finished() {
                    self.finished = true;
                    return Ok(0);
                }
                if self.eof {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        DecompressError::UnexpectedEof,
                    ));
                }
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    DecompressError::Incomplete(Status::BufferTooSmall),
                ));
            }
        }
    }
}

/// Decode a packed resource of known sizes, reading it in chunks
///
/// The decoder is reset, then fed `packed_len` bytes from `reader` in pieces
/// of at most `chunk_size` bytes. The result is exactly `unpacked_len` bytes
/// long.
pub fn decompress_resource<D, R>(
    decoder: &mut D,
    reader: &mut R,
    packed_len: usize,
    unpacked_len: usize,
    chunk_size: usize,
) -> Result<Vec<u8>>
where
    D: Decompress + ?Sized,
    R: Read + ?Sized,
{
    decoder.reset();
    let mut output = vec![0u8; unpacked_len];
    let mut chunk = vec![0u8; chunk_size.clamp(1, packed_len.max(1))];
    let mut out_pos = 0;
    let mut remaining = packed_len;
    let mut status = Status::DataStarvation;

    if packed_len == 0 {
        status = decoder.process(&mut output, &[])?;
    }

    while remaining > 0 {
        let size = chunk.len().min(remaining);
        reader.read_exact(&mut chunk[..size])?;
        remaining -= size;

        let mut in_pos = 0;
        loop {
            status = decoder.process(&mut output[out_pos..], &chunk[in_pos..size])?;
            in_pos += decoder.processed_input_size();
            out_pos += decoder.processed_output_size();
            if in_pos == size || decoder.processed_input_size() == 0 {
                break;
            }
        }
        if in_pos < size {
            // Output is full with packed data left over
            return Err(DecompressError::Incomplete(Status::BufferTooSmall));
        }
    }

    debug!(
        "resource unpacked: {} -> {} bytes ({})",
        packed_len,
        out_pos,
        decoder.signature()
    );
    match status {
        Status::Done => Ok(output),
        status => Err(DecompressError::Incomplete(status)),
    }
}
