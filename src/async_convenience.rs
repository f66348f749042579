//! Async convenience functions
//!
//! This module provides easy-to-use async functions for common
//! decompression operations.

#[cfg(feature = "async")]
/// One-call async decompression helpers
pub mod functions {
    use crate::async_batch::AsyncBatchProcessor;
    use crate::async_reader::AsyncDecompressReader;
    use crate::decompress::Algorithm;
    use crate::Result;
    use bytes::Bytes;
    use std::path::{Path, PathBuf};
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};

    /// Decompress everything an async reader yields
    pub async fn decompress_async<R: AsyncRead + Unpin>(
        reader: R,
        algorithm: Algorithm,
    ) -> Result<Vec<u8>> {
        let mut decoder = AsyncDecompressReader::new(BufReader::new(reader), algorithm.new_decoder());
        let mut output = Vec::new();
        decoder.read_to_end(&mut output).await?;
        Ok(output)
    }

    /// Decompress data from bytes
    pub async fn decompress_bytes_async(data: &[u8], algorithm: Algorithm) -> Result<Vec<u8>> {
        decompress_async(data, algorithm).await
    }

    /// Decompress a file asynchronously
    ///
    /// Returns the number of bytes written to `output_path`.
    pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_path: P1,
        output_path: P2,
        algorithm: Algorithm,
    ) -> Result<u64> {
        let input = tokio::fs::File::open(input_path).await?;
        let mut output = tokio::fs::File::create(output_path).await?;
        let mut reader = AsyncDecompressReader::new(BufReader::new(input), algorithm.new_decoder());

        let written = tokio::io::copy(&mut reader, &mut output).await?;
        output.flush().await?;
        Ok(written)
    }

    /// Decompress multiple files concurrently with default settings
    pub async fn decompress_files<P: AsRef<Path> + Send + Sync>(
        files: Vec<P>,
        algorithm: Algorithm,
    ) -> Result<Vec<(PathBuf, Bytes)>> {
        AsyncBatchProcessor::new()
            .decompress_files(files, algorithm)
            .await
    }
}

#[cfg(feature = "async")]
pub use functions::*;
