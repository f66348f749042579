//! LZSS decoding with a 4K history window
//!
//! A flag byte supplies eight control bits, least significant first. A set
//! bit copies one literal byte. A clear bit reads a little-endian 16-bit
//! token whose low 12 bits are a negative displacement into the recent
//! output and whose high 4 bits are the copy length minus three.

use crate::common::{Result, Signature, Status};
use crate::decompress::{ByteCounters, ByteCursor, Decompress};

/// Size of the history window
pub const WINDOW_SIZE: usize = 0x1000;

/// Mask for positions in the history window
const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Shortest back-reference
pub const MIN_MATCH: usize = 3;

/// Bit bucket value that forces a new flag byte
const EMPTY_BUCKET: u32 = 1;

/// Where the decoder stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LzssState {
    /// Normal flag driven dispatch
    Init,
    /// Low byte of a back-reference read, high byte pending
    HalfToken { low: u8 },
    /// Back-reference copy interrupted by a full output buffer
    Run { remaining: usize, offset: usize },
}

/// Resumable LZSS decoder
#[derive(Debug)]
pub struct LzssDecoder {
    state: LzssState,
    bit_bucket: u32,
    history: Box<[u8; WINDOW_SIZE]>,
    history_pos: usize,
    counters: ByteCounters,
}

impl LzssDecoder {
    /// Signature of this algorithm
    pub const SIGNATURE: Signature = Signature::LZSS;

    /// Create a decoder with an empty history
    pub fn new() -> Self {
        Self {
            state: LzssState::Init,
            bit_bucket: EMPTY_BUCKET,
            history: Box::new([0; WINDOW_SIZE]),
            history_pos: 0,
            counters: ByteCounters::new(),
        }
    }

    #[inline]
    fn emit(&mut self, io: &mut ByteCursor<'_>, byte: u8) {
        io.put(byte);
        self.history[self.history_pos] = byte;
        self.history_pos = (self.history_pos + 1) & WINDOW_MASK;
    }

    /// Copy `count` bytes from `offset` behind the write position, byte by byte
    fn copy_back(&mut self, io: &mut ByteCursor<'_>, offset: usize, count: usize) {
        for _ in 0..count {
            let byte = self.history[self.history_pos.wrapping_add(offset) & WINDOW_MASK];
            self.emit(io, byte);
        }
    }

    /// Start a back-reference; returns false if the output filled up first
    fn back_reference(&mut self, io: &mut ByteCursor<'_>, token: u16) -> bool {
        // Sign extended 12-bit displacement
        let offset = !0xFFF_usize | usize::from(token);
        let length = usize::from(token >> 12) + MIN_MATCH;
        let room = io.output_remaining();
        if room < length {
            self.copy_back(io, offset, room);
            self.state = LzssState::Run {
                remaining: length - room,
                offset,
            };
            return false;
        }
        self.copy_back(io, offset, length);
        true
    }

    fn decode(&mut self, io: &mut ByteCursor<'_>) {
        let mut bucket = self.bit_bucket;

        match std::mem::replace(&mut self.state, LzssState::Init) {
            LzssState::Init => {}
            LzssState::Run { remaining, offset } => {
                let room = io.output_remaining();
                if room < remaining {
                    self.copy_back(io, offset, room);
                    self.state = LzssState::Run {
                        remaining: remaining - room,
                        offset,
                    };
                    return;
                }
                self.copy_back(io, offset, remaining);
                bucket >>= 1;
            }
            LzssState::HalfToken { low } => {
                // Only resumed with input available
                let Some(high) = io.next_byte() else {
                    self.state = LzssState::HalfToken { low };
                    return;
                };
                let completed = self.back_reference(io, u16::from_le_bytes([low, high]));
                if completed {
                    bucket >>= 1;
                }
                if !completed || io.output_remaining() == 0 {
                    self.bit_bucket = bucket;
                    return;
                }
            }
        }

        loop {
            if bucket == EMPTY_BUCKET {
                let Some(flags) = io.next_byte() else {
                    break;
                };
                bucket = u32::from(flags) | 0x100;
            }
            if io.input_remaining() == 0 {
                break;
            }

            if bucket & 1 != 0 {
                if io.output_remaining() == 0 {
                    break;
                }
                if let Some(byte) = io.next_byte() {
                    self.emit(io, byte);
                }
            } else {
                let Some(low) = io.next_byte() else {
                    break;
                };
                let Some(high) = io.next_byte() else {
                    self.state = LzssState::HalfToken { low };
                    break;
                };
                if !self.back_reference(io, u16::from_le_bytes([low, high])) {
                    break;
                }
            }

            bucket >>= 1;
            if io.output_remaining() == 0 {
                break;
            }
        }

        self.bit_bucket = bucket;
    }
}

impl Default for LzssDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompress for LzssDecoder {
    fn reset(&mut self) {
        self.state = LzssState::Init;
        self.bit_bucket = EMPTY_BUCKET;
        self.history.fill(0);
        self.history_pos = 0;
        self.counters.reset();
    }

    fn process(&mut self, output: &mut [u8], input: &[u8]) -> Result<Status> {
        let mut io = ByteCursor::new(input, output);
        if io.input_remaining() > 0 || matches!(self.state, LzssState::Run { .. }) {
            self.decode(&mut io);
        }
        self.counters.record(&io);

        let status = if io.output_remaining() > 0 {
            Status::DataStarvation
        } else if io.input_remaining() > 0 || matches!(self.state, LzssState::Run { .. }) {
            Status::BufferTooSmall
        } else {
            Status::Done
        };
        Ok(status)
    }

    fn counters(&self) -> &ByteCounters {
        &self.counters
    }

    fn signature(&self) -> Signature {
        Self::SIGNATURE
    }

    fn is_finished(&self) -> bool {
        self.state == LzssState::Init
    }
}
