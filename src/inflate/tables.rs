//! Constant tables for DEFLATE decoding

use super::huffman::Huft;

/// log2 of the sliding window size
pub const WINDOW_BITS: u32 = 15;

/// Sliding window size
pub const WINDOW_SIZE: usize = 1 << WINDOW_BITS;

/// Longest Huffman code
pub const MAX_CODE_BITS: usize = 15;

/// Table entries reserved for the trees of one dynamic block
pub const DYNAMIC_TABLE_SIZE: usize = 1440;

/// Root bits for fixed literal/length lookups
pub const FIXED_LITERAL_BITS: u32 = 9;

/// Root bits for fixed distance lookups
pub const FIXED_DISTANCE_BITS: u32 = 5;

/// Root bits requested for dynamic literal/length tables
pub const DYNAMIC_LITERAL_BITS: u32 = 9;

/// Root bits requested for dynamic distance tables
pub const DYNAMIC_DISTANCE_BITS: u32 = 6;

/// Root bits requested for the code length table
pub const BIT_LENGTH_BITS: u32 = 7;

/// Number of code length codes
pub const BIT_LENGTH_CODES: usize = 19;

/// Largest literal/length plus distance code count in a dynamic header
pub const MAX_DYNAMIC_LENGTHS: usize = 286 + 30;

/// `MASK[n]` keeps the low `n` bits
pub const MASK: [u32; 17] = [
    0x0000, 0x0001, 0x0003, 0x0007, 0x000F, 0x001F, 0x003F, 0x007F, 0x00FF, 0x01FF, 0x03FF,
    0x07FF, 0x0FFF, 0x1FFF, 0x3FFF, 0x7FFF, 0xFFFF,
];

/// Copy lengths for literal/length codes 257 to 287
pub const COPY_LENGTHS: [u16; 31] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258, 0, 0,
];

/// Extra bits for literal/length codes 257 to 287, 112 marks an invalid code
pub const LENGTH_EXTRA_BITS: [u8; 31] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0, 112, 112,
];

/// Base distances for distance codes 0 to 29
pub const DISTANCE_BASES: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes 0 to 29
pub const DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which code length code lengths are stored in a dynamic header
pub const BIT_LENGTH_ORDER: [usize; BIT_LENGTH_CODES] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

const fn h(op: u8, bits: u8, base: u16) -> Huft {
    Huft { op, bits, base }
}

/// Literal/length table for fixed Huffman blocks, 9 bit root
pub const FIXED_LITERAL: [Huft; 512] = [
    h(96, 7, 256), h(0, 8, 80), h(0, 8, 16), h(84, 8, 115),
    h(82, 7, 31), h(0, 8, 112), h(0, 8, 48), h(0, 9, 192),
    h(80, 7, 10), h(0, 8, 96), h(0, 8, 32), h(0, 9, 160),
    h(0, 8, 0), h(0, 8, 128), h(0, 8, 64), h(0, 9, 224),
    h(80, 7, 6), h(0, 8, 88), h(0, 8, 24), h(0, 9, 144),
    h(83, 7, 59), h(0, 8, 120), h(0, 8, 56), h(0, 9, 208),
    h(81, 7, 17), h(0, 8, 104), h(0, 8, 40), h(0, 9, 176),
    h(0, 8, 8), h(0, 8, 136), h(0, 8, 72), h(0, 9, 240),
    h(80, 7, 4), h(0, 8, 84), h(0, 8, 20), h(85, 8, 227),
    h(83, 7, 43), h(0, 8, 116), h(0, 8, 52), h(0, 9, 200),
    h(81, 7, 13), h(0, 8, 100), h(0, 8, 36), h(0, 9, 168),
    h(0, 8, 4), h(0, 8, 132), h(0, 8, 68), h(0, 9, 232),
    h(80, 7, 8), h(0, 8, 92), h(0, 8, 28), h(0, 9, 152),
    h(84, 7, 83), h(0, 8, 124), h(0, 8, 60), h(0, 9, 216),
    h(82, 7, 23), h(0, 8, 108), h(0, 8, 44), h(0, 9, 184),
    h(0, 8, 12), h(0, 8, 140), h(0, 8, 76), h(0, 9, 248),
    h(80, 7, 3), h(0, 8, 82), h(0, 8, 18), h(85, 8, 163),
    h(83, 7, 35), h(0, 8, 114), h(0, 8, 50), h(0, 9, 196),
    h(81, 7, 11), h(0, 8, 98), h(0, 8, 34), h(0, 9, 164),
    h(0, 8, 2), h(0, 8, 130), h(0, 8, 66), h(0, 9, 228),
    h(80, 7, 7), h(0, 8, 90), h(0, 8, 26), h(0, 9, 148),
    h(84, 7, 67), h(0, 8, 122), h(0, 8, 58), h(0, 9, 212),
    h(82, 7, 19), h(0, 8, 106), h(0, 8, 42), h(0, 9, 180),
    h(0, 8, 10), h(0, 8, 138), h(0, 8, 74), h(0, 9, 244),
    h(80, 7, 5), h(0, 8, 86), h(0, 8, 22), h(192, 8, 0),
    h(83, 7, 51), h(0, 8, 118), h(0, 8, 54), h(0, 9, 204),
    h(81, 7, 15), h(0, 8, 102), h(0, 8, 38), h(0, 9, 172),
    h(0, 8, 6), h(0, 8, 134), h(0, 8, 70), h(0, 9, 236),
    h(80, 7, 9), h(0, 8, 94), h(0, 8, 30), h(0, 9, 156),
    h(84, 7, 99), h(0, 8, 126), h(0, 8, 62), h(0, 9, 220),
    h(82, 7, 27), h(0, 8, 110), h(0, 8, 46), h(0, 9, 188),
    h(0, 8, 14), h(0, 8, 142), h(0, 8, 78), h(0, 9, 252),
    h(96, 7, 256), h(0, 8, 81), h(0, 8, 17), h(85, 8, 131),
    h(82, 7, 31), h(0, 8, 113), h(0, 8, 49), h(0, 9, 194),
    h(80, 7, 10), h(0, 8, 97), h(0, 8, 33), h(0, 9, 162),
    h(0, 8, 1), h(0, 8, 129), h(0, 8, 65), h(0, 9, 226),
    h(80, 7, 6), h(0, 8, 89), h(0, 8, 25), h(0, 9, 146),
    h(83, 7, 59), h(0, 8, 121), h(0, 8, 57), h(0, 9, 210),
    h(81, 7, 17), h(0, 8, 105), h(0, 8, 41), h(0, 9, 178),
    h(0, 8, 9), h(0, 8, 137), h(0, 8, 73), h(0, 9, 242),
    h(80, 7, 4), h(0, 8, 85), h(0, 8, 21), h(80, 8, 258),
    h(83, 7, 43), h(0, 8, 117), h(0, 8, 53), h(0, 9, 202),
    h(81, 7, 13), h(0, 8, 101), h(0, 8, 37), h(0, 9, 170),
    h(0, 8, 5), h(0, 8, 133), h(0, 8, 69), h(0, 9, 234),
    h(80, 7, 8), h(0, 8, 93), h(0, 8, 29), h(0, 9, 154),
    h(84, 7, 83), h(0, 8, 125), h(0, 8, 61), h(0, 9, 218),
    h(82, 7, 23), h(0, 8, 109), h(0, 8, 45), h(0, 9, 186),
    h(0, 8, 13), h(0, 8, 141), h(0, 8, 77), h(0, 9, 250),
    h(80, 7, 3), h(0, 8, 83), h(0, 8, 19), h(85, 8, 195),
    h(83, 7, 35), h(0, 8, 115), h(0, 8, 51), h(0, 9, 198),
    h(81, 7, 11), h(0, 8, 99), h(0, 8, 35), h(0, 9, 166),
    h(0, 8, 3), h(0, 8, 131), h(0, 8, 67), h(0, 9, 230),
    h(80, 7, 7), h(0, 8, 91), h(0, 8, 27), h(0, 9, 150),
    h(84, 7, 67), h(0, 8, 123), h(0, 8, 59), h(0, 9, 214),
    h(82, 7, 19), h(0, 8, 107), h(0, 8, 43), h(0, 9, 182),
    h(0, 8, 11), h(0, 8, 139), h(0, 8, 75), h(0, 9, 246),
    h(80, 7, 5), h(0, 8, 87), h(0, 8, 23), h(192, 8, 0),
    h(83, 7, 51), h(0, 8, 119), h(0, 8, 55), h(0, 9, 206),
    h(81, 7, 15), h(0, 8, 103), h(0, 8, 39), h(0, 9, 174),
    h(0, 8, 7), h(0, 8, 135), h(0, 8, 71), h(0, 9, 238),
    h(80, 7, 9), h(0, 8, 95), h(0, 8, 31), h(0, 9, 158),
    h(84, 7, 99), h(0, 8, 127), h(0, 8, 63), h(0, 9, 222),
    h(82, 7, 27), h(0, 8, 111), h(0, 8, 47), h(0, 9, 190),
    h(0, 8, 15), h(0, 8, 143), h(0, 8, 79), h(0, 9, 254),
    h(96, 7, 256), h(0, 8, 80), h(0, 8, 16), h(84, 8, 115),
    h(82, 7, 31), h(0, 8, 112), h(0, 8, 48), h(0, 9, 193),
    h(80, 7, 10), h(0, 8, 96), h(0, 8, 32), h(0, 9, 161),
    h(0, 8, 0), h(0, 8, 128), h(0, 8, 64), h(0, 9, 225),
    h(80, 7, 6), h(0, 8, 88), h(0, 8, 24), h(0, 9, 145),
    h(83, 7, 59), h(0, 8, 120), h(0, 8, 56), h(0, 9, 209),
    h(81, 7, 17), h(0, 8, 104), h(0, 8, 40), h(0, 9, 177),
    h(0, 8, 8), h(0, 8, 136), h(0, 8, 72), h(0, 9, 241),
    h(80, 7, 4), h(0, 8, 84), h(0, 8, 20), h(85, 8, 227),
    h(83, 7, 43), h(0, 8, 116), h(0, 8, 52), h(0, 9, 201),
    h(81, 7, 13), h(0, 8, 100), h(0, 8, 36), h(0, 9, 169),
    h(0, 8, 4), h(0, 8, 132), h(0, 8, 68), h(0, 9, 233),
    h(80, 7, 8), h(0, 8, 92), h(0, 8, 28), h(0, 9, 153),
    h(84, 7, 83), h(0, 8, 124), h(0, 8, 60), h(0, 9, 217),
    h(82, 7, 23), h(0, 8, 108), h(0, 8, 44), h(0, 9, 185),
    h(0, 8, 12), h(0, 8, 140), h(0, 8, 76), h(0, 9, 249),
    h(80, 7, 3), h(0, 8, 82), h(0, 8, 18), h(85, 8, 163),
    h(83, 7, 35), h(0, 8, 114), h(0, 8, 50), h(0, 9, 197),
    h(81, 7, 11), h(0, 8, 98), h(0, 8, 34), h(0, 9, 165),
    h(0, 8, 2), h(0, 8, 130), h(0, 8, 66), h(0, 9, 229),
    h(80, 7, 7), h(0, 8, 90), h(0, 8, 26), h(0, 9, 149),
    h(84, 7, 67), h(0, 8, 122), h(0, 8, 58), h(0, 9, 213),
    h(82, 7, 19), h(0, 8, 106), h(0, 8, 42), h(0, 9, 181),
    h(0, 8, 10), h(0, 8, 138), h(0, 8, 74), h(0, 9, 245),
    h(80, 7, 5), h(0, 8, 86), h(0, 8, 22), h(192, 8, 0),
    h(83, 7, 51), h(0, 8, 118), h(0, 8, 54), h(0, 9, 205),
    h(81, 7, 15), h(0, 8, 102), h(0, 8, 38), h(0, 9, 173),
    h(0, 8, 6), h(0, 8, 134), h(0, 8, 70), h(0, 9, 237),
    h(80, 7, 9), h(0, 8, 94), h(0, 8, 30), h(0, 9, 157),
    h(84, 7, 99), h(0, 8, 126), h(0, 8, 62), h(0, 9, 221),
    h(82, 7, 27), h(0, 8, 110), h(0, 8, 46), h(0, 9, 189),
    h(0, 8, 14), h(0, 8, 142), h(0, 8, 78), h(0, 9, 253),
    h(96, 7, 256), h(0, 8, 81), h(0, 8, 17), h(85, 8, 131),
    h(82, 7, 31), h(0, 8, 113), h(0, 8, 49), h(0, 9, 195),
    h(80, 7, 10), h(0, 8, 97), h(0, 8, 33), h(0, 9, 163),
    h(0, 8, 1), h(0, 8, 129), h(0, 8, 65), h(0, 9, 227),
    h(80, 7, 6), h(0, 8, 89), h(0, 8, 25), h(0, 9, 147),
    h(83, 7, 59), h(0, 8, 121), h(0, 8, 57), h(0, 9, 211),
    h(81, 7, 17), h(0, 8, 105), h(0, 8, 41), h(0, 9, 179),
    h(0, 8, 9), h(0, 8, 137), h(0, 8, 73), h(0, 9, 243),
    h(80, 7, 4), h(0, 8, 85), h(0, 8, 21), h(80, 8, 258),
    h(83, 7, 43), h(0, 8, 117), h(0, 8, 53), h(0, 9, 203),
    h(81, 7, 13), h(0, 8, 101), h(0, 8, 37), h(0, 9, 171),
    h(0, 8, 5), h(0, 8, 133), h(0, 8, 69), h(0, 9, 235),
    h(80, 7, 8), h(0, 8, 93), h(0, 8, 29), h(0, 9, 155),
    h(84, 7, 83), h(0, 8, 125), h(0, 8, 61), h(0, 9, 219),
    h(82, 7, 23), h(0, 8, 109), h(0, 8, 45), h(0, 9, 187),
    h(0, 8, 13), h(0, 8, 141), h(0, 8, 77), h(0, 9, 251),
    h(80, 7, 3), h(0, 8, 83), h(0, 8, 19), h(85, 8, 195),
    h(83, 7, 35), h(0, 8, 115), h(0, 8, 51), h(0, 9, 199),
    h(81, 7, 11), h(0, 8, 99), h(0, 8, 35), h(0, 9, 167),
    h(0, 8, 3), h(0, 8, 131), h(0, 8, 67), h(0, 9, 231),
    h(80, 7, 7), h(0, 8, 91), h(0, 8, 27), h(0, 9, 151),
    h(84, 7, 67), h(0, 8, 123), h(0, 8, 59), h(0, 9, 215),
    h(82, 7, 19), h(0, 8, 107), h(0, 8, 43), h(0, 9, 183),
    h(0, 8, 11), h(0, 8, 139), h(0, 8, 75), h(0, 9, 247),
    h(80, 7, 5), h(0, 8, 87), h(0, 8, 23), h(192, 8, 0),
    h(83, 7, 51), h(0, 8, 119), h(0, 8, 55), h(0, 9, 207),
    h(81, 7, 15), h(0, 8, 103), h(0, 8, 39), h(0, 9, 175),
    h(0, 8, 7), h(0, 8, 135), h(0, 8, 71), h(0, 9, 239),
    h(80, 7, 9), h(0, 8, 95), h(0, 8, 31), h(0, 9, 159),
    h(84, 7, 99), h(0, 8, 127), h(0, 8, 63), h(0, 9, 223),
    h(82, 7, 27), h(0, 8, 111), h(0, 8, 47), h(0, 9, 191),
    h(0, 8, 15), h(0, 8, 143), h(0, 8, 79), h(0, 9, 255),
];

/// Distance table for fixed Huffman blocks, 5 bit root
pub const FIXED_DISTANCE: [Huft; 32] = [
    h(80, 5, 1), h(87, 5, 257), h(83, 5, 17), h(91, 5, 4097),
    h(81, 5, 5), h(89, 5, 1025), h(85, 5, 65), h(93, 5, 16385),
    h(80, 5, 3), h(88, 5, 513), h(84, 5, 33), h(92, 5, 8193),
    h(82, 5, 9), h(90, 5, 2049), h(86, 5, 129), h(192, 5, 24577),
    h(80, 5, 2), h(87, 5, 385), h(83, 5, 25), h(91, 5, 6145),
    h(81, 5, 7), h(89, 5, 1537), h(85, 5, 97), h(93, 5, 24577),
    h(80, 5, 4), h(88, 5, 769), h(84, 5, 49), h(92, 5, 12289),
    h(82, 5, 13), h(90, 5, 3073), h(86, 5, 193), h(192, 5, 24577),
];
