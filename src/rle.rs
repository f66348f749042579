//! ILBM style run length decoding
//!
//! Each token starts with a control byte `T`:
//!
//! - `T >= 128` is a fill run: the next byte is written `257 - T` times.
//! - `T < 128` is a literal run: the next `T + 1` bytes are copied verbatim.
//!
//! There is no end marker, so the stream ends wherever the input does.

use crate::common::{Result, Signature, Status};
use crate::decompress::{ByteCounters, ByteCursor, Decompress};

/// Where the decoder stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleState {
    /// Waiting for a control byte
    Init,
    /// Fill run control byte read, fill byte pending
    FillToken { run: usize },
    /// Writing the remainder of a fill run
    Fill { run: usize, value: u8 },
    /// Copying the remainder of a literal run
    Run { run: usize },
}

/// Step inside one call
enum Step {
    Token,
    FillByte(usize),
    Fill(usize, u8),
    Literal(usize),
}

/// Resumable ILBM RLE decoder
#[derive(Debug)]
pub struct RleDecoder {
    state: RleState,
    counters: ByteCounters,
}

impl RleDecoder {
    /// Signature of this algorithm
    pub const SIGNATURE: Signature = Signature::RLE;

    /// Create a decoder waiting for its first token
    pub fn new() -> Self {
        Self {
            state: RleState::Init,
            counters: ByteCounters::new(),
        }
    }

    fn decode(&mut self, io: &mut ByteCursor<'_>) {
        let mut step = match std::mem::replace(&mut self.state, RleState::Init) {
            RleState::Init => Step::Token,
            RleState::FillToken { run } => Step::FillByte(run),
            RleState::Fill { run, value } => Step::Fill(run, value),
            RleState::Run { run } => Step::Literal(run),
        };

        loop {
            step = match step {
                Step::Token => {
                    let Some(token) = io.next_byte() else {
                        return;
                    };
                    if token >= 128 {
                        Step::FillByte(257 - usize::from(token))
                    } else {
                        Step::Literal(usize::from(token) + 1)
                    }
                }
                Step::FillByte(run) => match io.next_byte() {
                    Some(value) => Step::Fill(run, value),
                    None => {
                        self.state = RleState::FillToken { run };
                        return;
                    }
                },
                Step::Fill(run, value) => {
                    let room = io.output_remaining();
                    if room < run {
                        io.fill(value, room);
                        self.state = RleState::Fill {
                            run: run - room,
                            value,
                        };
                        return;
                    }
                    io.fill(value, run);
                    Step::Token
                }
                Step::Literal(run) => {
                    let copied = io.copy_through(run);
                    if copied < run {
                        self.state = RleState::Run { run: run - copied };
                        return;
                    }
                    Step::Token
                }
            };
        }
    }
}

impl Default for RleDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompress for RleDecoder {
    fn reset(&mut self) {
        self.state = RleState::Init;
        self.counters.reset();
    }

    fn process(&mut self, output: &mut [u8], input: &[u8]) -> Result<Status> {
        let mut io = ByteCursor::new(input, output);
        if io.input_remaining() > 0 || self.state != RleState::Init {
            self.decode(&mut io);
        }
        self.counters.record(&io);

        let status = if io.output_remaining() > 0 {
            Status::DataStarvation
        } else if io.input_remaining() > 0 || self.state != RleState::Init {
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
        self.state == RleState::Init
    }
}
