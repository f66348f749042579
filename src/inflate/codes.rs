//! Huffman code layer: literals, lengths, distances and window copies

use super::state::{CodesState, DeflateDecoder};
use super::tables::WINDOW_SIZE;
use crate::common::{DecompressError, Result};
use crate::decompress::ByteCursor;

impl DeflateDecoder {
    /// Decode codes of the current block
    ///
    /// Returns true after the end of block code once the window is drained.
    pub(super) fn process_codes(&mut self, io: &mut ByteCursor<'_>) -> Result<bool> {
        let result = self.run_codes(io);
        if result.is_err() {
            self.codes.state = CodesState::Abort;
        }
        result
    }

    fn run_codes(&mut self, io: &mut ByteCursor<'_>) -> Result<bool> {
        loop {
            match self.codes.state {
                CodesState::Start => {
                    self.codes.need = self.codes.literal_bits;
                    self.codes.table = self.codes.literal_root;
                    self.codes.state = CodesState::Length;
                }

                CodesState::Length => {
                    let need = self.codes.need;
                    if !self.need_bits(io, need) {
                        return Ok(false);
                    }
                    let index = self.codes.table + self.peek_bits(need) as usize;
                    let entry = self.huft[index];
                    self.drop_bits(u32::from(entry.bits));

                    let op = entry.op;
                    if op == 0 {
                        self.codes.state = CodesState::Literal(entry.base as u8);
                    } else if op & 16 != 0 {
                        self.codes.length = usize::from(entry.base);
                        self.codes.state = CodesState::LengthExtra {
                            extra: u32::from(op & 15),
                        };
                    } else if op & 64 == 0 {
                        self.codes.need = u32::from(op);
                        self.codes.table = index + usize::from(entry.base);
                    } else if op & 32 != 0 {
                        self.codes.state = CodesState::Wash;
                    } else {
                        return Err(DecompressError::InvalidLiteralLength);
                    }
                }

                CodesState::LengthExtra { extra } => {
                    if !self.need_bits(io, extra) {
                        return Ok(false);
                    }
                    self.codes.length += self.peek_bits(extra) as usize;
                    self.drop_bits(extra);

                    let Some(root) = self.codes.distance_root else {
                        return Err(DecompressError::InvalidDistance);
                    };
                    self.codes.need = self.codes.distance_bits;
                    self.codes.table = root;
                    self.codes.state = CodesState::Distance;
                }

                CodesState::Distance => {
                    let need = self.codes.need;
                    if !self.need_bits(io, need) {
                        return Ok(false);
                    }
                    let index = self.codes.table + self.peek_bits(need) as usize;
                    let entry = self.huft[index];
                    self.drop_bits(u32::from(entry.bits));

                    let op = entry.op;
                    if op & 16 != 0 {
                        self.codes.distance = usize::from(entry.base);
                        self.codes.state = CodesState::DistanceExtra {
                            extra: u32::from(op & 15),
                        };
                    } else if op & 64 == 0 {
                        self.codes.need = u32::from(op);
                        self.codes.table = index + usize::from(entry.base);
                    } else {
                        return Err(DecompressError::InvalidDistance);
                    }
                }

                CodesState::DistanceExtra { extra } => {
                    if !self.need_bits(io, extra) {
                        return Ok(false);
                    }
                    self.codes.distance += self.peek_bits(extra) as usize;
                    self.drop_bits(extra);
                    self.codes.state = CodesState::Copy;
                }

                CodesState::Copy => {
                    let distance = self.codes.distance;
                    let mut source = if self.window_write < distance {
                        WINDOW_SIZE - (distance - self.window_write)
                    } else {
                        self.window_write - distance
                    };
                    while self.codes.length > 0 {
                        if !self.make_room(io) {
                            return Ok(false);
                        }
                        self.window[self.window_write] = self.window[source];
                        self.window_write += 1;
                        source += 1;
                        if source == WINDOW_SIZE {
                            source = 0;
                        }
                        self.codes.length -= 1;
                    }
                    self.codes.state = CodesState::Start;
                }

                CodesState::Literal(byte) => {
                    if !self.make_room(io) {
                        return Ok(false);
                    }
                    self.window[self.window_write] = byte;
                    self.window_write += 1;
                    self.codes.state = CodesState::Start;
                }

                CodesState::Wash => {
                    self.flush(io);
                    if !self.window_drained() {
                        return Ok(false);
                    }
                    self.codes.state = CodesState::End;
                }

                CodesState::End => return Ok(true),

                CodesState::Abort => return Err(DecompressError::Aborted),
            }
        }
    }
}
