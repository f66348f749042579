//! Async decompression module
//!
//! This module provides an `AsyncRead` adapter that drives any
//! [`Decompress`](crate::Decompress) implementation from an async byte source.

#[cfg(feature = "async")]
/// `AsyncRead` adapter over any decoder
pub mod reader {
    use crate::common::{DecompressError, Status, IN_BUFF_SIZE};
    use crate::decompress::Decompress;
    use pin_project::pin_project;
    use std::io;
    use std::pin::Pin;
    use std::task::{ready, Context, Poll};
    use tokio::io::{AsyncRead, ReadBuf};

    /// Async streaming decompressor
    #[pin_project]
    #[derive(Debug)]
    pub struct AsyncDecompressReader<R, D> {
        #[pin]
        reader: R,
        decoder: D,
        in_buff: Vec<u8>,
        in_pos: usize,
        in_len: usize,
        eof: bool,
        finished: bool,
    }

    impl<R: AsyncRead, D: Decompress> AsyncDecompressReader<R, D> {
        /// Create a new reader with the default 2K input buffer
        pub fn new(reader: R, decoder: D) -> Self {
            Self::with_buffer_size(reader, decoder, IN_BUFF_SIZE)
        }

        /// Create a new reader with a custom input buffer size
        pub fn with_buffer_size(reader: R, mut decoder: D, buffer_size: usize) -> Self {
            decoder.reset();
            Self {
                reader,
                decoder,
                in_buff: vec![0u8; buffer_size.max(1)],
                in_pos: 0,
                in_len: 0,
                eof: false,
                finished: false,
            }
        }

        /// The decoder being driven
        pub fn decoder(&self) -> &D {
            &self.decoder
        }

        /// Unwrap the underlying reader
        pub fn into_inner(self) -> R {
            self.reader
        }
    }

    impl<R: AsyncRead, D: Decompress> AsyncRead for AsyncDecompressReader<R, D> {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let mut this = self.project();
            if buf.remaining() == 0 || *this.finished {
                return Poll::Ready(Ok(()));
            }

            loop {
                if *this.in_pos == *this.in_len && !*this.eof {
                    let mut read_buf = ReadBuf::new(&mut this.in_buff[..]);
                    ready!(this.reader.as_mut().poll_read(cx, &mut read_buf))?;
                    let filled = read_buf.filled().len();
                    *this.in_pos = 0;
                    *this.in_len = filled;
                    if filled == 0 {
                        *this.eof = true;
                    }
                }

                let output = buf.initialize_unfilled();
                let result = this
                    .decoder
                    .process(output, &this.in_buff[*this.in_pos..*this.in_len]);
                let consumed = this.decoder.processed_input_size();
                let produced = this.decoder.processed_output_size();
                *this.in_pos += consumed;
                result.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

                if produced > 0 {
                    buf.advance(produced);
                    return Poll::Ready(Ok(()));
                }
                if consumed > 0 {
                    continue;
                }

                if *this.eof || *this.in_pos < *this.in_len {
                    if this.decoder.is_finished() {
                        *this.finished = true;
                        return Poll::Ready(Ok(()));
                    }
                    let error = if *this.eof {
                        io::Error::new(io::ErrorKind::UnexpectedEof, DecompressError::UnexpectedEof)
                    } else {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            DecompressError::Incomplete(Status::BufferTooSmall),
                        )
                    };
                    return Poll::Ready(Err(error));
                }
            }
        }
    }
}

#[cfg(feature = "async")]
pub use reader::AsyncDecompressReader;

#[cfg(all(test, feature = "async"))]
mod tests {
    use super::*;
    use crate::decompress::Decompress;
    use crate::rle::RleDecoder;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_async_reader_rle() {
        let packed: &[u8] = &[0xFE, 0xAA, 0x02, 1, 2, 3, 0xFF, 0x55];
        let mut reader = AsyncDecompressReader::with_buffer_size(packed, RleDecoder::new(), 3);
        let mut output = Vec::new();
        reader.read_to_end(&mut output).await.unwrap();
        assert_eq!(output, [0xAA, 0xAA, 0xAA, 1, 2, 3, 0x55, 0x55]);
        assert_eq!(reader.decoder().total_input_size(), 8);
    }

    #[tokio::test]
    async fn test_async_reader_truncated() {
        let packed: &[u8] = &[0x7F, 1, 2, 3];
        let mut reader = AsyncDecompressReader::new(packed, RleDecoder::new());
        let mut output = Vec::new();
        let err = reader.read_to_end(&mut output).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
