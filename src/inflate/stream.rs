//! zlib framing around the block layer

use super::state::{DeflateDecoder, StreamState};
use super::tables::{WINDOW_BITS, WINDOW_SIZE};
use crate::adler32::adler32;
use crate::common::{DecompressError, Result, Signature, Status};
use crate::decompress::{ByteCounters, ByteCursor, Decompress};
use log::{debug, trace, warn};

/// Compression method 8 in the CMF byte
const METHOD_DEFLATE: u8 = 8;

/// FLG bit announcing a preset dictionary id
const FLAG_PRESET_DICTIONARY: u8 = 0x20;

impl DeflateDecoder {
    /// Supply the preset dictionary the stream asked for
    ///
    /// Only valid after [`Decompress::process`] returned
    /// [`DecompressError::DictionaryRequired`]. The Adler-32 of `dictionary`
    /// must match the id in the stream header. On a mismatch the decoder keeps
    /// waiting, so another dictionary may be tried.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> Result<()> {
        if self.state != StreamState::NeedDictionary {
            return Err(DecompressError::UnexpectedDictionary);
        }
        let actual = adler32(dictionary);
        if actual != self.stream_check {
            return Err(DecompressError::DictionaryMismatch {
                expected: self.stream_check,
                actual,
            });
        }

        // Only the tail of a long dictionary can be referenced
        let keep = dictionary.len().min(WINDOW_SIZE - 1);
        let tail = &dictionary[dictionary.len() - keep..];
        self.window[..keep].copy_from_slice(tail);
        self.window_read = keep;
        self.window_write = keep;
        trace!("preset dictionary loaded ({} bytes)", keep);

        self.state = StreamState::Blocks;
        Ok(())
    }

    /// Id of the preset dictionary the stream is waiting for, if any
    pub fn dictionary_id(&self) -> Option<u32> {
        match self.state {
            StreamState::NeedDictionary => Some(self.stream_check),
            _ => None,
        }
    }

    fn run_stream(&mut self, io: &mut ByteCursor<'_>) -> Result<()> {
        loop {
            match self.state {
                StreamState::Method => {
                    let Some(cmf) = io.next_byte() else {
                        return Ok(());
                    };
                    self.method = cmf;
                    if cmf & 0x0F != METHOD_DEFLATE {
                        return Err(DecompressError::InvalidMethod(cmf & 0x0F));
                    }
                    let window_bits = (cmf >> 4) + 8;
                    if u32::from(window_bits) > WINDOW_BITS {
                        return Err(DecompressError::InvalidWindowSize(window_bits));
                    }
                    self.state = StreamState::Flag;
                }

                StreamState::Flag => {
                    let Some(flg) = io.next_byte() else {
                        return Ok(());
                    };
                    let cmf = self.method;
                    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
                        return Err(DecompressError::InvalidHeaderCheck { cmf, flg });
                    }
                    debug!(
                        "zlib header: window {} bytes, preset dictionary: {}",
                        1u32 << ((cmf >> 4) + 8),
                        flg & FLAG_PRESET_DICTIONARY != 0
                    );
                    self.state = if flg & FLAG_PRESET_DICTIONARY != 0 {
                        self.stream_check = 0;
                        StreamState::Dictionary { remaining: 4 }
                    } else {
                        StreamState::Blocks
                    };
                }

                StreamState::Dictionary { remaining } => {
                    let Some(byte) = io.next_byte() else {
                        return Ok(());
                    };
                    self.stream_check = (self.stream_check << 8) | u32::from(byte);
                    if remaining > 1 {
                        self.state = StreamState::Dictionary {
                            remaining: remaining - 1,
                        };
                    } else {
                        self.state = StreamState::NeedDictionary;
                    }
                }

                StreamState::NeedDictionary => {
                    return Err(DecompressError::DictionaryRequired(self.stream_check));
                }

                StreamState::Blocks => {
                    if !self.process_blocks(io)? {
                        return Ok(());
                    }
                    // The trailer starts on a byte boundary
                    let padding = self.bit_count & 7;
                    self.drop_bits(padding);
                    self.stream_check = 0;
                    self.state = StreamState::Checksum { remaining: 4 };
                }

                StreamState::Checksum { remaining } => {
                    let Some(byte) = self.next_aligned_byte(io) else {
                        return Ok(());
                    };
                    self.stream_check = (self.stream_check << 8) | u32::from(byte);
                    if remaining > 1 {
                        self.state = StreamState::Checksum {
                            remaining: remaining - 1,
                        };
                        continue;
                    }

                    if self.stream_check != self.adler {
                        return Err(DecompressError::ChecksumMismatch {
                            expected: self.stream_check,
                            actual: self.adler,
                        });
                    }
                    debug!("stream complete, Adler-32 {:08X}", self.adler);
                    self.reset_blocks();
                    self.bit_bucket = 0;
                    self.bit_count = 0;
                    self.state = StreamState::Complete;
                }

                StreamState::Complete => return Ok(()),

                StreamState::Abort => return Err(DecompressError::Aborted),
            }
        }
    }

    fn status(&self, io: &ByteCursor<'_>) -> Status {
        if io.output_remaining() > 0 {
            Status::DataStarvation
        } else if io.input_remaining() > 0 {
            Status::BufferTooSmall
        } else if self.state != StreamState::Complete {
            Status::DataStarvation
        } else {
            Status::Done
        }
    }
}

impl Decompress for DeflateDecoder {
    fn reset(&mut self) {
        self.state = StreamState::Method;
        self.reset_blocks();
        self.window.fill(0);
        self.method = 0;
        self.stream_check = 0;
        self.bit_bucket = 0;
        self.bit_count = 0;
        self.counters.reset();
    }

    fn process(&mut self, output: &mut [u8], input: &[u8]) -> Result<Status> {
        let mut io = ByteCursor::new(input, output);
        let result = self.run_stream(&mut io);
        self.counters.record(&io);

        match result {
            Ok(()) => Ok(self.status(&io)),
            Err(error @ DecompressError::DictionaryRequired(_)) => Err(error),
            Err(error) => {
                if self.state != StreamState::Abort {
                    warn!("zlib stream aborted: {}", error);
                    self.state = StreamState::Abort;
                }
                Err(error)
            }
        }
    }

    fn counters(&self) -> &ByteCounters {
        &self.counters
    }

    fn signature(&self) -> Signature {
        Self::SIGNATURE
    }

    fn is_finished(&self) -> bool {
        self.state == StreamState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// zlib stream of "hello hello hello" with fixed codes
    const HELLO: [u8; 16] = [
        0x78, 0xDA, 0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0xC8, 0x40, 0x90, 0x00, 0x3A, 0x2E, 0x06,
        0x7D,
    ];

    #[test]
    fn test_header_errors() {
        let mut decoder = DeflateDecoder::new();
        let mut output = [0u8; 4];
        assert!(matches!(
            decoder.process(&mut output, &[0x79, 0x9C]),
            Err(DecompressError::InvalidMethod(9))
        ));

        decoder.reset();
        assert!(matches!(
            decoder.process(&mut output, &[0x88, 0x1C]),
            Err(DecompressError::InvalidWindowSize(16))
        ));

        decoder.reset();
        assert!(matches!(
            decoder.process(&mut output, &[0x78, 0x9D]),
            Err(DecompressError::InvalidHeaderCheck { cmf: 0x78, flg: 0x9D })
        ));
    }

    #[test]
    fn test_abort_until_reset() {
        let mut decoder = DeflateDecoder::new();
        let mut output = [0u8; 4];
        // Block type 3 is reserved
        assert!(matches!(
            decoder.process(&mut output, &[0x78, 0x9C, 0x07]),
            Err(DecompressError::InvalidBlockType)
        ));
        assert!(matches!(
            decoder.process(&mut output, &HELLO),
            Err(DecompressError::Aborted)
        ));
        assert_eq!(decoder.processed_input_size(), 0);
        decoder.reset();
        assert!(decoder.process(&mut output, &[0x78]).is_ok());
    }

    #[test]
    fn test_header_split_across_calls() {
        let mut decoder = DeflateDecoder::new();
        let mut output = [0u8; 8];
        assert_eq!(
            decoder.process(&mut output, &[0x78]).unwrap(),
            Status::DataStarvation
        );
        assert_eq!(
            decoder.process(&mut output, &[]).unwrap(),
            Status::DataStarvation
        );
        assert_eq!(decoder.processed_input_size(), 0);
        assert_eq!(
            decoder.process(&mut output, &[0x9C]).unwrap(),
            Status::DataStarvation
        );
        assert_eq!(decoder.state, StreamState::Blocks);
    }

    #[test]
    fn test_set_dictionary_out_of_order() {
        let mut decoder = DeflateDecoder::new();
        assert!(matches!(
            decoder.set_dictionary(b"abc"),
            Err(DecompressError::UnexpectedDictionary)
        ));
        assert_eq!(decoder.dictionary_id(), None);
    }
}
