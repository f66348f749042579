//! Async batch processing module
//!
//! This module decodes many independent packed resources concurrently, each
//! with its own decoder instance.

#[cfg(feature = "async")]
/// Concurrent decoding with a configurable concurrency limit
pub mod processor {
    use crate::async_reader::AsyncDecompressReader;
    use crate::decompress::Algorithm;
    use crate::{DecompressError, Result};
    use bytes::Bytes;
    use futures::stream::{self, StreamExt, TryStreamExt};
    use log::debug;
    use std::path::{Path, PathBuf};
    use tokio::fs::File;
    use tokio::io::{AsyncReadExt, BufReader};

    /// Concurrent resource decoder
    ///
    /// zlib streams that need a preset dictionary are not supported: each
    /// decoder is private to its task, so there is nowhere to supply one and
    /// such inputs fail with [`DecompressError::DictionaryRequired`].
    #[derive(Debug, Clone)]
    pub struct AsyncBatchProcessor {
        concurrency_limit: usize,
        chunk_size: usize,
    }

    impl AsyncBatchProcessor {
        /// Create a new batch processor with one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                chunk_size: 64 * 1024, // 64KB chunks
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Set the compressed read size used for files
        pub fn with_chunk_size(mut self, size: usize) -> Self {
            self.chunk_size = size.max(1);
            self
        }

        /// Decode in-memory buffers concurrently
        ///
        /// Results come back in the order of `inputs`.
        pub async fn decompress_buffers(
            &self,
            inputs: Vec<Bytes>,
            algorithm: Algorithm,
        ) -> Result<Vec<Bytes>> {
            let mut results: Vec<(usize, Bytes)> =
                stream::iter(inputs.into_iter().enumerate().map(|(index, input)| async move {
                    let output = tokio::task::spawn_blocking(move || {
                        decode_all(algorithm, &input)
                    })
                    .await
                    .map_err(|e| DecompressError::Io(std::io::Error::other(e)))??;
                    Ok::<_, DecompressError>((index, output))
                }))
                .buffer_unordered(self.concurrency_limit)
                .try_collect()
                .await?;

            results.sort_by_key(|(index, _)| *index);
            Ok(results.into_iter().map(|(_, output)| output).collect())
        }

        /// Decode multiple files concurrently
        ///
        /// Results arrive in completion order, tagged with their path.
        pub async fn decompress_files<P: AsRef<Path> + Send + Sync>(
            &self,
            files: Vec<P>,
            algorithm: Algorithm,
        ) -> Result<Vec<(PathBuf, Bytes)>> {
            let results = stream::iter(files.into_iter().map(|path| {
                let processor = self.clone();
                async move { processor.decompress_single_file(path, algorithm).await }
            }))
            .buffer_unordered(self.concurrency_limit)
            .try_collect()
            .await?;

            Ok(results)
        }

        /// Decode a single file
        async fn decompress_single_file<P: AsRef<Path>>(
            &self,
            path: P,
            algorithm: Algorithm,
        ) -> Result<(PathBuf, Bytes)> {
            let path = path.as_ref();
            let file = File::open(path).await?;
            let mut reader = AsyncDecompressReader::with_buffer_size(
                BufReader::new(file),
                algorithm.new_decoder(),
                self.chunk_size,
            );

            let mut output = Vec::new();
            reader.read_to_end(&mut output).await?;
            debug!("{}: {} bytes ({})", path.display(), output.len(), algorithm);
            Ok((path.to_path_buf(), Bytes::from(output)))
        }
    }

    impl Default for AsyncBatchProcessor {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Decode a whole buffer, growing the output until the decoder is done
    fn decode_all(algorithm: Algorithm, input: &[u8]) -> Result<Bytes> {
        let mut decoder = algorithm.new_decoder();
        let mut output = Vec::new();
        let mut chunk = vec![0u8; crate::MAX_CHUNK_SIZE];
        let mut in_pos = 0;

        loop {
            let status = decoder.process(&mut chunk, &input[in_pos..])?;
            in_pos += decoder.processed_input_size();
            output.extend_from_slice(&chunk[..decoder.processed_output_size()]);

            if decoder.processed_output_size() < chunk.len() {
                // Output space was left over, so the input is exhausted
                if !decoder.is_finished() {
                    return Err(DecompressError::Incomplete(status));
                }
                return Ok(Bytes::from(output));
            }
        }
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchProcessor;
