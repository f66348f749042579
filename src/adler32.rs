//! Adler-32 checksum used by the zlib trailer and preset dictionary ids

/// Largest prime smaller than 65536
const ADLER_MOD: u32 = 65521;

/// Bytes that can be summed before the accumulators may overflow
const NMAX: usize = 5552;

/// Initial Adler-32 value
pub const ADLER32_INIT: u32 = 1;

/// Continue an Adler-32 checksum over more data
pub fn adler32_update(adler: u32, data: &[u8]) -> u32 {
    let mut a = adler & 0xFFFF;
    let mut b = adler >> 16;

    for chunk in data.chunks(NMAX) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }

    (b << 16) | a
}

/// Compute the Adler-32 checksum of a buffer
pub fn adler32(data: &[u8]) -> u32 {
    adler32_update(ADLER32_INIT, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adler32_empty() {
        assert_eq!(adler32(&[]), 1);
    }

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(b"abc"), 0x024D_0127);
        assert_eq!(adler32(b"xyzabc"), 0x0965_0292);
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_adler32_incremental() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 31 + 7) as u8).collect();
        let (head, tail) = data.split_at(7_001);
        assert_eq!(adler32_update(adler32(head), tail), adler32(&data));
    }

    #[test]
    fn test_adler32_large_run_reduces() {
        // 0xFF runs overflow the sums quickest
        let data = vec![0xFFu8; 100_000];
        let sum = adler32(&data);
        assert!(sum & 0xFFFF < ADLER_MOD);
        assert!(sum >> 16 < ADLER_MOD);
    }
}
