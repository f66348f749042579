//! Decoder state shared by the stream, block and codes layers

use super::huffman::Huft;
use super::tables::{
    DYNAMIC_TABLE_SIZE, FIXED_DISTANCE, FIXED_LITERAL, MASK, MAX_DYNAMIC_LENGTHS, WINDOW_SIZE,
};
use crate::adler32::{adler32_update, ADLER32_INIT};
use crate::common::Signature;
use crate::decompress::{ByteCounters, ByteCursor};

/// Index of the fixed literal/length table in [`DeflateDecoder::huft`]
pub(super) const FIXED_LITERAL_ROOT: usize = 0;

/// Index of the fixed distance table in [`DeflateDecoder::huft`]
pub(super) const FIXED_DISTANCE_ROOT: usize = FIXED_LITERAL.len();

/// First entry available to dynamic block tables
pub(super) const DYNAMIC_ROOT: usize = FIXED_DISTANCE_ROOT + FIXED_DISTANCE.len();

/// zlib framing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StreamState {
    /// Waiting for the CMF byte
    Method,
    /// Waiting for the FLG byte
    Flag,
    /// Reading the preset dictionary id
    Dictionary { remaining: u8 },
    /// Dictionary id read, waiting for `set_dictionary`
    NeedDictionary,
    /// Decoding DEFLATE blocks
    Blocks,
    /// Reading the Adler-32 trailer
    Checksum { remaining: u8 },
    /// Stream fully decoded and verified
    Complete,
    /// A fatal error occurred
    Abort,
}

/// DEFLATE block state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockState {
    /// Waiting for a three bit block header
    Type,
    /// Waiting for the stored block length and its complement
    Lens,
    /// Copying stored bytes
    Stored { remaining: usize },
    /// Waiting for the dynamic header counts
    Table,
    /// Reading code length code lengths
    BitLengths { index: usize },
    /// Reading literal/length and distance code lengths
    CodeLengths { index: usize },
    /// Decoding Huffman codes
    Codes,
    /// Last block decoded, draining the window
    Dry,
    /// Stream body finished
    Completed,
    /// A fatal error occurred
    Abort,
}

/// Huffman code decoding state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CodesState {
    /// Start of a literal/length code
    Start,
    /// Walking the literal/length tables
    Length,
    /// Reading length extra bits
    LengthExtra { extra: u32 },
    /// Walking the distance tables
    Distance,
    /// Reading distance extra bits
    DistanceExtra { extra: u32 },
    /// Copying a match out of the window
    Copy,
    /// Writing a literal byte
    Literal(u8),
    /// End of block code seen, draining the window
    Wash,
    /// Block finished
    End,
    /// A fatal error occurred
    Abort,
}

/// Tables and progress of the block being decoded
#[derive(Debug, Clone, Copy)]
pub(super) struct Codes {
    pub state: CodesState,
    pub literal_root: usize,
    pub literal_bits: u32,
    pub distance_root: Option<usize>,
    pub distance_bits: u32,
    /// Table being walked and the bits it is indexed by
    pub table: usize,
    pub need: u32,
    pub length: usize,
    pub distance: usize,
}

impl Codes {
    pub(super) fn new(
        literal_root: usize,
        literal_bits: u32,
        distance_root: Option<usize>,
        distance_bits: u32,
    ) -> Self {
        Self {
            state: CodesState::Start,
            literal_root,
            literal_bits,
            distance_root,
            distance_bits,
            table: literal_root,
            need: literal_bits,
            length: 0,
            distance: 0,
        }
    }

    pub(super) fn fixed() -> Self {
        use super::tables::{FIXED_DISTANCE_BITS, FIXED_LITERAL_BITS};
        Self::new(
            FIXED_LITERAL_ROOT,
            FIXED_LITERAL_BITS,
            Some(FIXED_DISTANCE_ROOT),
            FIXED_DISTANCE_BITS,
        )
    }
}

/// Resumable zlib/DEFLATE decoder
///
/// Output passes through a 32K sliding window. Data is copied from the
/// window to the caller's buffer as space allows, so a call can end with
/// decoded bytes still waiting in the window.
#[derive(Debug)]
pub struct DeflateDecoder {
    pub(super) state: StreamState,
    pub(super) block: BlockState,
    pub(super) codes: Codes,
    pub(super) last_block: bool,

    /// CMF byte of the header
    pub(super) method: u8,
    /// Dictionary id or trailer as read so far
    pub(super) stream_check: u32,
    /// Adler-32 of the output produced so far
    pub(super) adler: u32,

    pub(super) bit_bucket: u32,
    pub(super) bit_count: u32,

    pub(super) window: Box<[u8]>,
    pub(super) window_read: usize,
    pub(super) window_write: usize,

    /// Fixed tables followed by the dynamic table workspace
    pub(super) huft: Box<[Huft]>,
    /// Dynamic header counts
    pub(super) header: u32,
    /// Code lengths of the dynamic block being read
    pub(super) lengths: [u8; MAX_DYNAMIC_LENGTHS],
    pub(super) bit_length_root: usize,
    pub(super) bit_length_bits: u32,

    pub(super) counters: ByteCounters,
}

impl DeflateDecoder {
    /// Signature of this algorithm
    pub const SIGNATURE: Signature = Signature::ZLIB;

    /// Create a decoder waiting for a zlib header
    pub fn new() -> Self {
        let mut huft = vec![Huft::default(); DYNAMIC_ROOT + DYNAMIC_TABLE_SIZE].into_boxed_slice();
        huft[FIXED_LITERAL_ROOT..FIXED_DISTANCE_ROOT].copy_from_slice(&FIXED_LITERAL);
        huft[FIXED_DISTANCE_ROOT..DYNAMIC_ROOT].copy_from_slice(&FIXED_DISTANCE);

        Self {
            state: StreamState::Method,
            block: BlockState::Type,
            codes: Codes::fixed(),
            last_block: false,
            method: 0,
            stream_check: 0,
            adler: ADLER32_INIT,
            bit_bucket: 0,
            bit_count: 0,
            window: vec![0; WINDOW_SIZE].into_boxed_slice(),
            window_read: 0,
            window_write: 0,
            huft,
            header: 0,
            lengths: [0; MAX_DYNAMIC_LENGTHS],
            bit_length_root: DYNAMIC_ROOT,
            bit_length_bits: 0,
            counters: ByteCounters::new(),
        }
    }

    /// Put the block layer back at a block header with an empty window
    ///
    /// Bits already in the bucket are left alone.
    pub(super) fn reset_blocks(&mut self) {
        self.block = BlockState::Type;
        self.codes = Codes::fixed();
        self.last_block = false;
        self.window_read = 0;
        self.window_write = 0;
        self.adler = ADLER32_INIT;
    }

    /// Make sure the bucket holds at least `count` bits
    #[inline]
    pub(super) fn need_bits(&mut self, io: &mut ByteCursor<'_>, count: u32) -> bool {
        while self.bit_count < count {
            let Some(byte) = io.next_byte() else {
                return false;
            };
            self.bit_bucket |= u32::from(byte) << self.bit_count;
            self.bit_count += 8;
        }
        true
    }

    /// The low `count` bits of the bucket
    #[inline]
    pub(super) fn peek_bits(&self, count: u32) -> u32 {
        self.bit_bucket & MASK[count as usize]
    }

    #[inline]
    pub(super) fn drop_bits(&mut self, count: u32) {
        self.bit_bucket >>= count;
        self.bit_count -= count;
    }

    /// Next whole byte, taken from the bucket before the input
    pub(super) fn next_aligned_byte(&mut self, io: &mut ByteCursor<'_>) -> Option<u8> {
        if self.bit_count >= 8 {
            let byte = (self.bit_bucket & 0xFF) as u8;
            self.drop_bits(8);
            return Some(byte);
        }
        io.next_byte()
    }

    /// Bytes that can be written to the window without passing the read position
    #[inline]
    pub(super) fn window_room(&self) -> usize {
        if self.window_write < self.window_read {
            self.window_read - self.window_write - 1
        } else {
            WINDOW_SIZE - self.window_write
        }
    }

    #[inline]
    fn wrap_write(&mut self) {
        if self.window_write == WINDOW_SIZE && self.window_read != 0 {
            self.window_write = 0;
        }
    }

    /// Find space for at least one byte, flushing to the output if needed
    pub(super) fn make_room(&mut self, io: &mut ByteCursor<'_>) -> bool {
        if self.window_room() == 0 {
            self.wrap_write();
            if self.window_room() == 0 {
                self.flush(io);
                self.wrap_write();
                if self.window_room() == 0 {
                    return false;
                }
            }
        }
        true
    }

    /// Copy as much of the window as fits into the output
    pub(super) fn flush(&mut self, io: &mut ByteCursor<'_>) {
        let end = if self.window_read <= self.window_write {
            self.window_write
        } else {
            WINDOW_SIZE
        };
        self.flush_until(io, end);

        if self.window_read == WINDOW_SIZE {
            self.window_read = 0;
            if self.window_write == WINDOW_SIZE {
                self.window_write = 0;
            }
            let end = self.window_write;
            self.flush_until(io, end);
        }
    }

    fn flush_until(&mut self, io: &mut ByteCursor<'_>, end: usize) {
        let count = (end - self.window_read).min(io.output_remaining());
        if count == 0 {
            return;
        }
        let data = &self.window[self.window_read..self.window_read + count];
        io.write(data);
        self.adler = adler32_update(self.adler, data);
        self.window_read += count;
    }

    /// True when every decoded byte has been handed to the caller
    #[inline]
    pub(super) fn window_drained(&self) -> bool {
        self.window_read == self.window_write
    }
}

impl Default for DeflateDecoder {
    fn default() -> Self {
        Self::new()
    }
}
