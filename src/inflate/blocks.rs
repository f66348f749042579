//! DEFLATE block layer: block headers, stored blocks and dynamic tables

use super::huffman::{build_table, BuildError, SymbolMap, OP_INVALID};
use super::state::{BlockState, Codes, DeflateDecoder, DYNAMIC_ROOT};
use super::tables::{
    BIT_LENGTH_BITS, BIT_LENGTH_CODES, BIT_LENGTH_ORDER, COPY_LENGTHS, DISTANCE_BASES,
    DISTANCE_EXTRA_BITS, DYNAMIC_DISTANCE_BITS, DYNAMIC_LITERAL_BITS, LENGTH_EXTRA_BITS,
    MAX_DYNAMIC_LENGTHS,
};
use crate::common::{DecompressError, Result};
use crate::decompress::ByteCursor;
use log::{debug, trace};

/// Code length symbols that repeat a previous length or zero
const REPEAT_PREVIOUS: u16 = 16;
const REPEAT_ZERO_SHORT: u16 = 17;
const REPEAT_ZERO_LONG: u16 = 18;

impl DeflateDecoder {
    /// Decode blocks until the input or output runs out
    ///
    /// Returns true once the final block has been decoded and every byte of
    /// it has left the window.
    pub(super) fn process_blocks(&mut self, io: &mut ByteCursor<'_>) -> Result<bool> {
        let result = self.run_blocks(io);
        if result.is_err() {
            self.block = BlockState::Abort;
        }
        self.flush(io);
        result
    }

    fn run_blocks(&mut self, io: &mut ByteCursor<'_>) -> Result<bool> {
        loop {
            match self.block {
                BlockState::Type => {
                    if !self.need_bits(io, 3) {
                        return Ok(false);
                    }
                    let header = self.peek_bits(3);
                    self.drop_bits(3);
                    self.last_block = header & 1 != 0;

                    match header >> 1 {
                        0 => {
                            debug!("stored block (last: {})", self.last_block);
                            let padding = self.bit_count & 7;
                            self.drop_bits(padding);
                            self.block = BlockState::Lens;
                        }
                        1 => {
                            debug!("fixed block (last: {})", self.last_block);
                            self.codes = Codes::fixed();
                            self.block = BlockState::Codes;
                        }
                        2 => {
                            debug!("dynamic block (last: {})", self.last_block);
                            self.block = BlockState::Table;
                        }
                        _ => return Err(DecompressError::InvalidBlockType),
                    }
                }

                BlockState::Lens => {
                    if !self.need_bits(io, 32) {
                        return Ok(false);
                    }
                    let len = (self.bit_bucket & 0xFFFF) as u16;
                    let nlen = (self.bit_bucket >> 16) as u16;
                    if !nlen != len {
                        return Err(DecompressError::StoredLengthMismatch { len, nlen });
                    }
                    self.bit_bucket = 0;
                    self.bit_count = 0;

                    self.block = if len != 0 {
                        BlockState::Stored {
                            remaining: usize::from(len),
                        }
                    } else {
                        self.next_block()
                    };
                }

                BlockState::Stored { remaining } => {
                    if io.input_remaining() == 0 || !self.make_room(io) {
                        return Ok(false);
                    }
                    let count = remaining
                        .min(io.input_remaining())
                        .min(self.window_room());
                    let data = io.take_input(count);
                    self.window[self.window_write..self.window_write + count].copy_from_slice(data);
                    self.window_write += count;

                    self.block = if remaining > count {
                        BlockState::Stored {
                            remaining: remaining - count,
                        }
                    } else {
                        self.next_block()
                    };
                }

                BlockState::Table => {
                    if !self.need_bits(io, 14) {
                        return Ok(false);
                    }
                    let header = self.peek_bits(14);
                    if header & 0x1F > 29 || (header >> 5) & 0x1F > 29 {
                        return Err(DecompressError::InvalidTableCounts);
                    }
                    self.header = header;
                    self.drop_bits(14);
                    self.lengths.fill(0);
                    self.block = BlockState::BitLengths { index: 0 };
                }

                BlockState::BitLengths { index } => {
                    let count = 4 + (self.header >> 10) as usize;
                    let mut index = index;
                    while index < count {
                        if !self.need_bits(io, 3) {
                            self.block = BlockState::BitLengths { index };
                            return Ok(false);
                        }
                        self.lengths[BIT_LENGTH_ORDER[index]] = self.peek_bits(3) as u8;
                        self.drop_bits(3);
                        index += 1;
                    }
                    for &symbol in &BIT_LENGTH_ORDER[count..] {
                        self.lengths[symbol] = 0;
                    }
                    self.build_bit_length_table()?;
                    self.block = BlockState::CodeLengths { index: 0 };
                }

                BlockState::CodeLengths { index } => {
                    let total = self.dynamic_length_count();
                    let mut index = index;
                    while index < total {
                        let bits = self.bit_length_bits;
                        if !self.need_bits(io, bits) {
                            self.block = BlockState::CodeLengths { index };
                            return Ok(false);
                        }
                        let entry =
                            self.huft[self.bit_length_root + self.peek_bits(bits) as usize];
                        if entry.op == OP_INVALID {
                            return Err(DecompressError::InvalidCodeLengths);
                        }
                        let entry_bits = u32::from(entry.bits);
                        let symbol = entry.base;

                        if symbol < REPEAT_PREVIOUS {
                            self.drop_bits(entry_bits);
                            self.lengths[index] = symbol as u8;
                            index += 1;
                            continue;
                        }

                        let (extra, base) = match symbol {
                            REPEAT_ZERO_LONG => (7, 11),
                            REPEAT_ZERO_SHORT => (3, 3),
                            _ => (2, 3),
                        };
                        if !self.need_bits(io, entry_bits + extra) {
                            self.block = BlockState::CodeLengths { index };
                            return Ok(false);
                        }
                        self.drop_bits(entry_bits);
                        let repeat = base + self.peek_bits(extra) as usize;
                        self.drop_bits(extra);

                        if index + repeat > total || (symbol == REPEAT_PREVIOUS && index == 0) {
                            return Err(DecompressError::InvalidRepeat);
                        }
                        let value = if symbol == REPEAT_PREVIOUS {
                            self.lengths[index - 1]
                        } else {
                            0
                        };
                        self.lengths[index..index + repeat].fill(value);
                        index += repeat;
                    }
                    self.build_dynamic_tables()?;
                    self.block = BlockState::Codes;
                }

                BlockState::Codes => {
                    if !self.process_codes(io)? {
                        return Ok(false);
                    }
                    self.block = if self.last_block {
                        BlockState::Dry
                    } else {
                        BlockState::Type
                    };
                }

                BlockState::Dry => {
                    self.flush(io);
                    if !self.window_drained() {
                        return Ok(false);
                    }
                    self.block = BlockState::Completed;
                }

                BlockState::Completed => return Ok(true),

                BlockState::Abort => return Err(DecompressError::Aborted),
            }
        }
    }

    fn next_block(&self) -> BlockState {
        if self.last_block {
            BlockState::Dry
        } else {
            BlockState::Type
        }
    }

    /// Literal/length plus distance code lengths announced by the header
    fn dynamic_length_count(&self) -> usize {
        258 + (self.header & 0x1F) as usize + ((self.header >> 5) & 0x1F) as usize
    }

    fn build_bit_length_table(&mut self) -> Result<()> {
        let mut used = 0;
        let mut work = [0u16; BIT_LENGTH_CODES];
        let symbols = SymbolMap {
            literals: BIT_LENGTH_CODES,
            bases: &[],
            extra: &[],
        };
        let built = build_table(
            &self.lengths[..BIT_LENGTH_CODES],
            symbols,
            BIT_LENGTH_BITS,
            &mut self.huft[DYNAMIC_ROOT..],
            &mut used,
            &mut work,
        )
        .map_err(table_error)?;

        match built.root {
            Some(root) if built.complete => {
                self.bit_length_root = DYNAMIC_ROOT + root;
                self.bit_length_bits = built.bits;
                Ok(())
            }
            _ => Err(DecompressError::InvalidCodeLengths),
        }
    }

    fn build_dynamic_tables(&mut self) -> Result<()> {
        let literal_count = 257 + (self.header & 0x1F) as usize;
        let total = self.dynamic_length_count();
        let mut used = 0;
        let mut work = [0u16; MAX_DYNAMIC_LENGTHS];
        let lengths = self.lengths;
        let table = &mut self.huft[DYNAMIC_ROOT..];

        let literal = build_table(
            &lengths[..literal_count],
            SymbolMap {
                literals: 257,
                bases: &COPY_LENGTHS,
                extra: &LENGTH_EXTRA_BITS,
            },
            DYNAMIC_LITERAL_BITS,
            table,
            &mut used,
            &mut work,
        )
        .map_err(table_error)?;
        let literal_root = match literal.root {
            Some(root) if literal.complete => root,
            _ => return Err(DecompressError::InvalidCodeLengths),
        };

        let distance = build_table(
            &lengths[literal_count..total],
            SymbolMap {
                literals: 0,
                bases: &DISTANCE_BASES,
                extra: &DISTANCE_EXTRA_BITS,
            },
            DYNAMIC_DISTANCE_BITS,
            table,
            &mut used,
            &mut work,
        )
        .map_err(table_error)?;
        if !distance.complete || (distance.root.is_none() && literal_count > 257) {
            return Err(DecompressError::InvalidCodeLengths);
        }

        trace!(
            "dynamic tables: {} literal/length, {} distance codes, {} entries",
            literal_count,
            total - literal_count,
            used
        );
        self.codes = Codes::new(
            DYNAMIC_ROOT + literal_root,
            literal.bits,
            distance.root.map(|root| DYNAMIC_ROOT + root),
            distance.bits,
        );
        Ok(())
    }
}

fn table_error(error: BuildError) -> DecompressError {
    match error {
        BuildError::OverSubscribed => DecompressError::InvalidCodeLengths,
        BuildError::Overflow => DecompressError::TableOverflow,
    }
}
