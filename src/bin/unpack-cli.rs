//! unpack-cli - Command-line interface for resumable-decompress
//!
//! A command-line tool for unpacking ILBM RLE, LZSS and zlib compressed files.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};
use resumable_decompress::{
    decompress_resource, inflate_zlib, Algorithm, Decompress, DecompressError, DecompressReader,
    DeflateDecoder, IN_BUFF_SIZE,
};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "unpack-cli")]
#[command(about = "A CLI tool for resumable RLE, LZSS and zlib decompression")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompress a packed file
    Decompress {
        /// Input compressed file
        input: PathBuf,

        /// Output decompressed file
        output: PathBuf,

        /// Compression algorithm of the input
        #[arg(short, long, value_enum, default_value_t = CliAlgorithm::Zlib)]
        algorithm: CliAlgorithm,

        /// Exact unpacked size, when known
        #[arg(short, long)]
        size: Option<usize>,

        /// Compressed bytes fed to the decoder per call
        #[arg(short, long, default_value_t = IN_BUFF_SIZE)]
        chunk_size: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Get information about a compressed file
    Info {
        /// Compressed file to analyze
        input: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum CliAlgorithm {
    /// ILBM run length encoding
    Rle,
    /// LZSS with a 4K window
    Lzss,
    /// zlib framed DEFLATE
    Zlib,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(algorithm: CliAlgorithm) -> Self {
        match algorithm {
            CliAlgorithm::Rle => Algorithm::Rle,
            CliAlgorithm::Lzss => Algorithm::Lzss,
            CliAlgorithm::Zlib => Algorithm::Deflate,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Decompress {
            input,
            output,
            algorithm,
            size,
            chunk_size,
            force,
        } => decompress_file(
            &input,
            &output,
            algorithm.into(),
            size,
            chunk_size,
            force,
            cli.verbose,
            cli.quiet,
        ),
        Commands::Info { input } => show_file_info(&input, cli.verbose).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // A logger may already be installed when running under the test harness
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

/// What `info` concluded about a zlib file
#[derive(Debug, Clone, PartialEq, Eq)]
enum StreamVerdict {
    /// Checksum verified, with the unpacked size
    Valid(usize),
    /// Needs the preset dictionary with this Adler-32 id
    NeedsDictionary(u32),
    /// Fails to decode
    Corrupt(String),
}

#[allow(clippy::too_many_arguments)]
fn decompress_file(
    input: &PathBuf,
    output: &PathBuf,
    algorithm: Algorithm,
    size: Option<usize>,
    chunk_size: usize,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Check if output file exists and force flag
    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    if verbose {
        println!(
            "Decompressing '{}' to '{}'",
            input.display(),
            output.display()
        );
        println!("Algorithm: {}, chunk size: {}", algorithm, chunk_size);
    }

    let start_time = Instant::now();
    let input_size = usize::try_from(fs::metadata(input)?.len())?;

    if verbose {
        println!("Compressed size: {} bytes", input_size);
    }

    // Show progress bar for large files
    let progress = if !quiet && input_size > 1024 * 1024 {
        let pb = ProgressBar::new(input_size as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}",
                )?
                .progress_chars("#>-"),
        );
        pb.set_message("Decompressing...");
        Some(pb)
    } else {
        None
    };

    let mut decoder = algorithm.new_decoder();
    let file = BufReader::new(File::open(input)?);
    let decompressed_data = match size {
        Some(unpacked_len) => {
            let mut source = match &progress {
                Some(pb) => Box::new(pb.wrap_read(file)) as Box<dyn Read>,
                None => Box::new(file),
            };
            decompress_resource(&mut decoder, &mut source, input_size, unpacked_len, chunk_size)
                .map_err(|e| format!("Decompression failed: {}", e))?
        }
        None => {
            let source = match &progress {
                Some(pb) => Box::new(pb.wrap_read(file)) as Box<dyn Read>,
                None => Box::new(file),
            };
            let mut reader = DecompressReader::with_buffer_size(source, decoder, chunk_size);
            let mut data = Vec::new();
            reader
                .read_to_end(&mut data)
                .map_err(|e| format!("Decompression failed: {}", e))?;
            data
        }
    };

    if let Some(ref pb) = progress {
        pb.finish_with_message("Decompression complete");
    }

    // Write output file
    fs::write(output, &decompressed_data)?;

    let decompression_time = start_time.elapsed();
    let output_size = decompressed_data.len();
    let compression_ratio = if output_size == 0 {
        0.0
    } else {
        (input_size as f64 / output_size as f64) * 100.0
    };

    if !quiet {
        println!("✓ Decompression successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", output_size);
        println!("  Ratio:  {:.1}%", compression_ratio);
        println!("  Time:   {:.2?}", decompression_time);
    }

    Ok(())
}

fn show_file_info(
    input: &PathBuf,
    verbose: bool,
) -> Result<StreamVerdict, Box<dyn std::error::Error>> {
    // Check if input file exists
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    // Read the file
    let data = fs::read(input)?;
    let file_size = data.len();

    if data.len() < 2 {
        return Err("File too small to be a zlib stream".into());
    }

    // Parse the zlib header
    let cmf = data[0];
    let flg = data[1];
    let method = cmf & 0x0F;
    let window_bits = u32::from(cmf >> 4) + 8;
    let check_ok = (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0;

    let level_str = match flg >> 6 {
        0 => "Fastest",
        1 => "Fast",
        2 => "Default",
        _ => "Maximum",
    };

    println!("zlib Stream Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", file_size);
    println!("  Method: {} ({})", if method == 8 { "Deflate" } else { "Unknown" }, method);
    println!("  Window: {} bytes ({} bits)", 1u32 << window_bits.min(31), window_bits);
    println!("  Level: {}", level_str);
    println!("  Header check: {}", if check_ok { "ok" } else { "bad" });

    if verbose {
        println!("  Header bytes: {:02x} {:02x}", cmf, flg);
    }

    let verdict = verify_stream(&data);
    match &verdict {
        StreamVerdict::Valid(decompressed_size) => {
            debug!("{} trailing bytes", file_size.saturating_sub(decoded_input(&data)));
            let compression_ratio = if *decompressed_size == 0 {
                0.0
            } else {
                (file_size as f64 / *decompressed_size as f64) * 100.0
            };
            println!("  Decompressed Size: {} bytes", decompressed_size);
            println!("  Compression Ratio: {:.1}%", compression_ratio);
            println!("  Status: ✓ Valid zlib stream");
        }
        StreamVerdict::NeedsDictionary(id) => {
            println!("  Preset dictionary: required (id {:08x})", id);
            println!("  Status: ? Cannot verify without the dictionary");
        }
        StreamVerdict::Corrupt(e) => {
            println!("  Status: ✗ Invalid or corrupted zlib stream");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(verdict)
}

/// Decode the whole stream to learn its size and verify the checksum
fn verify_stream(data: &[u8]) -> StreamVerdict {
    match inflate_zlib(data) {
        Ok(decompressed) => StreamVerdict::Valid(decompressed.len()),
        Err(DecompressError::DictionaryRequired(id)) => StreamVerdict::NeedsDictionary(id),
        Err(e) => StreamVerdict::Corrupt(e.to_string()),
    }
}

/// Count the compressed bytes that make up the stream
fn decoded_input(data: &[u8]) -> usize {
    let mut decoder = DeflateDecoder::new();
    let mut chunk = vec![0u8; resumable_decompress::MAX_CHUNK_SIZE];
    let mut in_pos = 0;
    while decoder.process(&mut chunk, &data[in_pos..]).is_ok() {
        in_pos += decoder.processed_input_size();
        if decoder.is_finished()
            || (decoder.processed_input_size() == 0 && decoder.processed_output_size() == 0)
        {
            break;
        }
    }
    in_pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    const HELLO: [u8; 16] = [
        0x78, 0xDA, 0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0xC8, 0x40, 0x90, 0x00, 0x3A, 0x2E, 0x06,
        0x7D,
    ];

    #[test]
    fn test_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("input.rle");
        let output_path = dir.path().join("output.bin");
        let sized_path = dir.path().join("sized.bin");

        // Three 0xAA, then the literals 1 2 3
        fs::write(&input_path, [0xFE, 0xAA, 0x02, 1, 2, 3])?;

        decompress_file(
            &input_path,
            &output_path,
            Algorithm::Rle,
            None,
            1,
            false,
            false,
            true,
        )?;
        assert_eq!(fs::read(&output_path)?, [0xAA, 0xAA, 0xAA, 1, 2, 3]);

        decompress_file(
            &input_path,
            &sized_path,
            Algorithm::Rle,
            Some(6),
            2,
            false,
            false,
            true,
        )?;
        assert_eq!(fs::read(&sized_path)?, [0xAA, 0xAA, 0xAA, 1, 2, 3]);

        // Refuses to overwrite without --force
        assert!(decompress_file(
            &input_path,
            &output_path,
            Algorithm::Rle,
            None,
            1,
            false,
            false,
            true,
        )
        .is_err());

        Ok(())
    }

    #[test]
    fn test_info_zlib() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let input_path = dir.path().join("hello.zlib");
        fs::write(&input_path, HELLO)?;
        assert_eq!(show_file_info(&input_path, true)?, StreamVerdict::Valid(17));
        assert_eq!(decoded_input(&fs::read(&input_path)?), 16);

        let reference_path =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/reference.zlib");
        assert_eq!(
            show_file_info(&reference_path, false)?,
            StreamVerdict::Valid(437)
        );
        Ok(())
    }

    #[test]
    fn test_info_verdicts() {
        let mut corrupt = HELLO;
        corrupt[15] ^= 0x01;
        assert!(matches!(verify_stream(&corrupt), StreamVerdict::Corrupt(_)));

        // Bad block type right after the header
        assert!(matches!(
            verify_stream(&[0x78, 0x01, 0x07]),
            StreamVerdict::Corrupt(_)
        ));

        let dictionary = include_bytes!("../../tests/data/dictionary.zlib");
        assert_eq!(
            verify_stream(dictionary),
            StreamVerdict::NeedsDictionary(0x602E_4065)
        );
    }
}
