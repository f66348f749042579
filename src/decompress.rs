//! The resumable decompression contract shared by every decoder
//!
//! A decoder is driven by repeatedly calling [`Decompress::process`] with
//! whatever input and output space the caller has. Each call consumes as much
//! input as it can, writes as much output as fits, records the byte counts in
//! its [`ByteCounters`] and returns a [`Status`]. The caller advances its own
//! buffers by [`Decompress::processed_input_size`] and
//! [`Decompress::processed_output_size`] and calls again.

use crate::common::{DecompressError, Result, Signature, Status};
use crate::inflate::DeflateDecoder;
use crate::lzss::LzssDecoder;
use crate::rle::RleDecoder;
use std::fmt;

/// Cursor over the input and output buffers of one `process` call
#[derive(Debug)]
pub struct ByteCursor<'a> {
    input: &'a [u8],
    in_pos: usize,
    output: &'a mut [u8],
    out_pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Wrap the buffers handed to a `process` call
    pub fn new(input: &'a [u8], output: &'a mut [u8]) -> Self {
        Self {
            input,
            in_pos: 0,
            output,
            out_pos: 0,
        }
    }

    /// Input bytes not yet consumed
    #[inline]
    pub fn input_remaining(&self) -> usize {
        self.input.len() - self.in_pos
    }

    /// Output bytes not yet written
    #[inline]
    pub fn output_remaining(&self) -> usize {
        self.output.len() - self.out_pos
    }

    /// Input bytes consumed so far
    #[inline]
    pub fn consumed(&self) -> usize {
        self.in_pos
    }

    /// Output bytes produced so far
    #[inline]
    pub fn produced(&self) -> usize {
        self.out_pos
    }

    /// Take the next input byte
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.input.get(self.in_pos)?;
        self.in_pos += 1;
        Some(byte)
    }

    /// Take up to `max` input bytes
    #[inline]
    pub fn take_input(&mut self, max: usize) -> &'a [u8] {
        let count = max.min(self.input_remaining());
        let input: &'a [u8] = self.input;
        let slice = &input[self.in_pos..self.in_pos + count];
        self.in_pos += count;
        slice
    }

    /// Write one byte, returning false when the output is full
    #[inline]
    pub fn put(&mut self, byte: u8) -> bool {
        match self.output.get_mut(self.out_pos) {
            Some(slot) => {
                *slot = byte;
                self.out_pos += 1;
                true
            }
            None => false,
        }
    }

    /// Write `count` copies of `byte`; `count` must fit in the output
    #[inline]
    pub fn fill(&mut self, byte: u8, count: usize) {
        self.output[self.out_pos..self.out_pos + count].fill(byte);
        self.out_pos += count;
    }

    /// Write a slice; it must fit in the output
    #[inline]
    pub fn write(&mut self, data: &[u8]) {
        self.output[self.out_pos..self.out_pos + data.len()].copy_from_slice(data);
        self.out_pos += data.len();
    }

    /// Copy up to `max` bytes straight from input to output
    #[inline]
    pub fn copy_through(&mut self, max: usize) -> usize {
        let count = max.min(self.input_remaining()).min(self.output_remaining());
        self.output[self.out_pos..self.out_pos + count]
            .copy_from_slice(&self.input[self.in_pos..self.in_pos + count]);
        self.in_pos += count;
        self.out_pos += count;
        count
    }
}

/// Per-call and cumulative byte counts for a decoder
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByteCounters {
    processed_input: usize,
    processed_output: usize,
    total_input: usize,
    total_output: usize,
}

impl ByteCounters {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the outcome of one `process` call
    pub fn record(&mut self, cursor: &ByteCursor<'_>) {
        self.processed_input = cursor.consumed();
        self.processed_output = cursor.produced();
        self.total_input += self.processed_input;
        self.total_output += self.processed_output;
    }

    /// Input bytes consumed by the last call
    pub fn processed_input(&self) -> usize {
        self.processed_input
    }

    /// Output bytes produced by the last call
    pub fn processed_output(&self) -> usize {
        self.processed_output
    }

    /// Input bytes consumed since the last reset
    pub fn total_input(&self) -> usize {
        self.total_input
    }

    /// Output bytes produced since the last reset
    pub fn total_output(&self) -> usize {
        self.total_output
    }
}

/// A resumable, chunk driven decoder
pub trait Decompress {
    /// Return to the initial state, clearing all counters
    fn reset(&mut self);

    /// Decode from `input` into `output`
    ///
    /// Returns the resumable [`Status`] of the call, or an error when the
    /// stream is corrupt. After an error the decoder refuses further work
    /// until [`Decompress::reset`] is called.
    fn process(&mut self, output: &mut [u8], input: &[u8]) -> Result<Status>;

    /// Byte counters of this decoder
    fn counters(&self) -> &ByteCounters;

    /// Four character code of the algorithm
    fn signature(&self) -> Signature;

    /// True when the decoder sits at a clean stream boundary
    ///
    /// RLE and LZSS have no end marker, so a clean boundary is any point
    /// between tokens. Deflate is finished only after its checksum.
    fn is_finished(&self) -> bool;

    /// Input bytes consumed by the last call to `process`
    fn processed_input_size(&self) -> usize {
        self.counters().processed_input()
    }

    /// Output bytes written by the last call to `process`
    fn processed_output_size(&self) -> usize {
        self.counters().processed_output()
    }

    /// Input bytes consumed since the last reset
    fn total_input_size(&self) -> usize {
        self.counters().total_input()
    }

    /// Output bytes written since the last reset
    fn total_output_size(&self) -> usize {
        self.counters().total_output()
    }

    /// Reset, then decode a complete stream in a single call
    ///
    /// Anything other than [`Status::Done`] is reported as
    /// [`DecompressError::Incomplete`].
    fn decompress_into(&mut self, output: &mut [u8], input: &[u8]) -> Result<()> {
        self.reset();
        match self.process(output, input)? {
            Status::Done => Ok(()),
            status => Err(DecompressError::Incomplete(status)),
        }
    }
}

/// The decoders known to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// ILBM run length encoding
    Rle,
    /// LZSS with a 4K window
    Lzss,
    /// zlib framed DEFLATE
    Deflate,
}

impl Algorithm {
    /// All algorithms, in resource compression id order
    pub const ALL: [Algorithm; 3] = [Algorithm::Deflate, Algorithm::Lzss, Algorithm::Rle];

    /// Signature written by containers that tag compressed chunks
    pub fn signature(self) -> Signature {
        match self {
            Algorithm::Rle => Signature::RLE,
            Algorithm::Lzss => Signature::LZSS,
            Algorithm::Deflate => Signature::ZLIB,
        }
    }

    /// Look an algorithm up by signature
    pub fn from_signature(signature: Signature) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.signature() == signature)
            .ok_or(DecompressError::UnknownSignature(signature))
    }

    /// Look an algorithm up by resource file compression id (1 to 3)
    pub fn from_compress_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Algorithm::Deflate),
            2 => Ok(Algorithm::Lzss),
            3 => Ok(Algorithm::Rle),
            _ => Err(DecompressError::UnknownCompressId(id)),
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Rle => "ILBM RLE",
            Algorithm::Lzss => "LZSS",
            Algorithm::Deflate => "zlib/DEFLATE",
        }
    }

    /// A fresh decoder for this algorithm
    pub fn new_decoder(self) -> Box<dyn Decompress + Send> {
        match self {
            Algorithm::Rle => Box::new(RleDecoder::new()),
            Algorithm::Lzss => Box::new(LzssDecoder::new()),
            Algorithm::Deflate => Box::new(DeflateDecoder::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<D: Decompress + ?Sized> Decompress for Box<D> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn process(&mut self, output: &mut [u8], input: &[u8]) -> Result<Status> {
        (**self).process(output, input)
    }

    fn counters(&self) -> &ByteCounters {
        (**self).counters()
    }

    fn signature(&self) -> Signature {
        (**self).signature()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}
