//! Multi-level Huffman decoding tables
//!
//! Tables are built into a flat array of [`Huft`] entries. A root table is
//! indexed by the low `bits` of the bit bucket; codes longer than the root
//! spill into sub-tables linked from root entries. Every entry says how many
//! bits to drop and what to do next through its `op` field:
//!
//! - `0`: `base` is a literal byte
//! - `op & 16`: `base` is a length or distance base, `op & 15` extra bits follow
//! - `op & 64 == 0`: link to a sub-table at `entry + base` indexed by `op` bits
//! - `op & 32`: end of block
//! - anything else: invalid code

use super::tables::MAX_CODE_BITS;

/// One decoding table entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Huft {
    /// Operation, see the module documentation
    pub op: u8,
    /// Bits consumed by this entry
    pub bits: u8,
    /// Literal, length/distance base or sub-table offset
    pub base: u16,
}

/// `op` marking an entry no code maps to
pub const OP_INVALID: u8 = 128 + 64;

/// `op` marking end of block
pub const OP_END_OF_BLOCK: u8 = 32 + 64;

/// Result of a successful table build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltTable {
    /// Index of the root table in the destination, `None` when every length was zero
    pub root: Option<usize>,
    /// Bits used to index the root table
    pub bits: u32,
    /// False when the code does not use every bit pattern
    pub complete: bool,
}

/// Why a table could not be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// More codes of some length than the bit patterns allow
    OverSubscribed,
    /// The destination ran out of entries
    Overflow,
}

/// Symbol values and extra bits for codes at or above the literal range
#[derive(Debug, Clone, Copy)]
pub struct SymbolMap<'a> {
    /// Symbols below this value decode to themselves
    pub literals: usize,
    /// Base values for the remaining symbols
    pub bases: &'a [u16],
    /// Extra bit counts for the remaining symbols
    pub extra: &'a [u8],
}

/// Build decoding tables for the code described by `lengths`
///
/// Entries are appended to `table` starting at `*used`, which is advanced
/// past whatever the build consumed. `work` must hold at least
/// `lengths.len()` entries.
pub fn build_table(
    lengths: &[u8],
    symbols: SymbolMap<'_>,
    requested_bits: u32,
    table: &mut [Huft],
    used: &mut usize,
    work: &mut [u16],
) -> Result<BuiltTable, BuildError> {
    // Count codes of each length
    let mut count = [0u32; MAX_CODE_BITS + 1];
    for &len in lengths {
        count[usize::from(len)] += 1;
    }
    if count[0] as usize == lengths.len() {
        return Ok(BuiltTable {
            root: None,
            bits: 0,
            complete: true,
        });
    }

    // Shortest and longest code lengths bound the root size
    let shortest = (1..=MAX_CODE_BITS).find(|&len| count[len] != 0).unwrap_or(1);
    let longest = (1..=MAX_CODE_BITS)
        .rev()
        .find(|&len| count[len] != 0)
        .unwrap_or(1);
    let root_bits = (requested_bits as usize).clamp(shortest, longest);

    // Check for an over-subscribed set and pad the longest length with dummies
    let mut slack: i32 = 1 << shortest;
    for len in shortest..longest {
        slack -= count[len] as i32;
        if slack < 0 {
            return Err(BuildError::OverSubscribed);
        }
        slack <<= 1;
    }
    slack -= count[longest] as i32;
    if slack < 0 {
        return Err(BuildError::OverSubscribed);
    }
    count[longest] += slack as u32;

    // Offsets of each length in the sorted symbol list
    let mut offset = [0usize; MAX_CODE_BITS + 1];
    let mut next = 0usize;
    for len in 2..=longest {
        next += count[len - 1] as usize;
        offset[len] = next;
    }

    // Symbols sorted by code length
    for (symbol, &len) in lengths.iter().enumerate() {
        if len != 0 {
            let len = usize::from(len);
            work[offset[len]] = symbol as u16;
            offset[len] += 1;
        }
    }
    let real_codes = offset[longest];

    // Walk the codes in order, creating tables as the lengths demand
    let mut table_start = [0usize; MAX_CODE_BITS];
    let mut code: usize = 0;
    offset[0] = 0;
    let mut sorted = 0usize;
    let mut level: i32 = -1;
    let mut covered: i32 = -(root_bits as i32);
    let mut current = 0usize;
    let mut span = 0usize;
    let mut root = 0usize;
    let mut entry = Huft::default();

    for len in shortest..=longest {
        let mut remaining = count[len];
        while remaining > 0 {
            remaining -= 1;

            // Open tables until this code fits
            while len as i32 > covered + root_bits as i32 {
                level += 1;
                covered += root_bits as i32;

                let mut sub_bits = len - covered as usize;
                let limit = (longest - covered as usize).min(root_bits);
                let mut fill = 1u32 << sub_bits;
                if fill > remaining + 1 {
                    // Not enough codes of this length, see whether longer ones fit
                    fill -= remaining + 1;
                    let mut probe = len;
                    if sub_bits < limit {
                        loop {
                            sub_bits += 1;
                            if sub_bits >= limit {
                                break;
                            }
                            fill <<= 1;
                            probe += 1;
                            if fill <= count[probe] {
                                break;
                            }
                            fill -= count[probe];
                        }
                    }
                }
                span = 1 << sub_bits;

                if *used + span > table.len() {
                    return Err(BuildError::Overflow);
                }
                current = *used;
                table_start[level as usize] = current;
                *used += span;

                if level > 0 {
                    // Link the new sub-table from its parent
                    offset[level as usize] = code;
                    let parent = table_start[level as usize - 1];
                    let slot = parent + (code >> (covered as usize - root_bits));
                    entry = Huft {
                        op: sub_bits as u8,
                        bits: root_bits as u8,
                        base: (current - slot) as u16,
                    };
                    table[slot] = entry;
                } else {
                    root = current;
                }
            }

            // Describe the code
            entry.bits = (len as i32 - covered) as u8;
            if sorted >= real_codes {
                entry.op = OP_INVALID;
            } else {
                let symbol = usize::from(work[sorted]);
                sorted += 1;
                if symbol < symbols.literals {
                    entry.op = if symbol < 256 { 0 } else { OP_END_OF_BLOCK };
                    entry.base = symbol as u16;
                } else {
                    let index = symbol - symbols.literals;
                    entry.op = symbols.extra[index] + 16 + 64;
                    entry.base = symbols.bases[index];
                }
            }

            // Replicate the entry across every slot ending in this code
            let step = 1usize << (len - covered as usize);
            let mut slot = code >> covered as usize;
            while slot < span {
                table[current + slot] = entry;
                slot += step;
            }

            // Increment the bit reversed code
            let mut bit = 1usize << (len - 1);
            while code & bit != 0 {
                code ^= bit;
                bit >>= 1;
            }
            code ^= bit;

            // Close tables the next code no longer belongs to
            while code & ((1usize << covered as usize) - 1) != offset[level as usize] {
                level -= 1;
                covered -= root_bits as i32;
            }
        }
    }

    Ok(BuiltTable {
        root: Some(root),
        bits: root_bits as u32,
        complete: slack == 0 || longest == 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflate::tables::{
        COPY_LENGTHS, DISTANCE_BASES, DISTANCE_EXTRA_BITS, FIXED_DISTANCE, FIXED_DISTANCE_BITS,
        FIXED_LITERAL, FIXED_LITERAL_BITS, LENGTH_EXTRA_BITS,
    };

    fn build(lengths: &[u8], symbols: SymbolMap<'_>, bits: u32, size: usize) -> (Vec<Huft>, Result<BuiltTable, BuildError>) {
        let mut table = vec![Huft::default(); size];
        let mut used = 0;
        let mut work = vec![0u16; lengths.len()];
        let result = build_table(lengths, symbols, bits, &mut table, &mut used, &mut work);
        table.truncate(used);
        (table, result)
    }

    #[test]
    fn test_fixed_literal_table_matches() {
        let mut lengths = [8u8; 288];
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        let symbols = SymbolMap {
            literals: 257,
            bases: &COPY_LENGTHS,
            extra: &LENGTH_EXTRA_BITS,
        };
        let (table, result) = build(&lengths, symbols, FIXED_LITERAL_BITS, 1024);
        let built = result.unwrap();
        assert_eq!(built.root, Some(0));
        assert_eq!(built.bits, 9);
        assert!(built.complete);
        assert_eq!(table.as_slice(), &FIXED_LITERAL[..]);
        assert_eq!(table[0], Huft { op: 96, bits: 7, base: 256 });
    }

    #[test]
    fn test_fixed_distance_table_matches() {
        let lengths = [5u8; 30];
        let symbols = SymbolMap {
            literals: 0,
            bases: &DISTANCE_BASES,
            extra: &DISTANCE_EXTRA_BITS,
        };
        let (table, result) = build(&lengths, symbols, FIXED_DISTANCE_BITS, 64);
        let built = result.unwrap();
        assert!(!built.complete);
        assert_eq!(table.as_slice(), &FIXED_DISTANCE[..]);
        assert_eq!(table[15].op, OP_INVALID);
    }

    #[test]
    fn test_all_zero_lengths() {
        let symbols = SymbolMap {
            literals: 0,
            bases: &DISTANCE_BASES,
            extra: &DISTANCE_EXTRA_BITS,
        };
        let (table, result) = build(&[0; 30], symbols, 6, 64);
        assert_eq!(result.unwrap().root, None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_over_subscribed() {
        let symbols = SymbolMap {
            literals: 19,
            bases: &[],
            extra: &[],
        };
        let (_, result) = build(&[1, 1, 1], symbols, 7, 128);
        assert_eq!(result, Err(BuildError::OverSubscribed));
    }

    #[test]
    fn test_sub_tables() {
        // Codes longer than the root spill into sub-tables
        let lengths = [1u8, 2, 3, 4, 5, 6, 6];
        let symbols = SymbolMap {
            literals: 7,
            bases: &[],
            extra: &[],
        };
        let (table, result) = build(&lengths, symbols, 3, 64);
        let built = result.unwrap();
        assert!(built.complete);
        assert_eq!(built.bits, 3);
        // Symbol 0 has code 0 and fills every even slot of the root
        assert_eq!(table[0], Huft { op: 0, bits: 1, base: 0 });
        assert_eq!(table[2], Huft { op: 0, bits: 1, base: 0 });
        // Code 111 (reversed) starts the sub-table for lengths 4 to 6
        let link = table[7];
        assert_eq!(link.op, 3);
        assert_eq!(link.bits, 3);
        let sub = 7 + usize::from(link.base);
        // Symbol 3 has code 1110, the sub-table sees the trailing 0
        assert_eq!(table[sub], Huft { op: 0, bits: 1, base: 3 });
        assert_eq!(table.len(), 8 + 8);
    }

    #[test]
    fn test_overflow() {
        let lengths = [1u8, 2, 3, 4, 5, 6, 6];
        let symbols = SymbolMap {
            literals: 7,
            bases: &[],
            extra: &[],
        };
        let (_, result) = build(&lengths, symbols, 3, 10);
        assert_eq!(result, Err(BuildError::Overflow));
    }
}
