//! Streaming reader and resource loader tests

use resumable_decompress::{
    decompress_lzss, decompress_resource, decompress_rle, decompress_zlib, Algorithm,
    Decompress, DecompressError, DecompressReader, DeflateDecoder, LzssDecoder, RleDecoder,
    Status,
};
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

const RAW: &[u8] = include_bytes!("data/reference.raw");
const RLE: &[u8] = include_bytes!("data/reference.rle");
const LZSS: &[u8] = include_bytes!("data/reference.lzss");
const ZLIB: &[u8] = include_bytes!("data/reference.zlib");
const TEXT_RAW: &[u8] = include_bytes!("data/text.raw");
const DICTIONARY_ZLIB: &[u8] = include_bytes!("data/dictionary.zlib");

/// Test data directory containing the packed fixtures
const TEST_DATA_DIR: &str = "tests/data";

fn open_fixture(name: &str) -> io::Result<(File, usize)> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(TEST_DATA_DIR)
        .join(name);
    let file = File::open(&path)?;
    let len = file.metadata()?.len() as usize;
    Ok((file, len))
}

fn read_all<D: Decompress>(packed: &[u8], decoder: D, buffer_size: usize) -> io::Result<Vec<u8>> {
    let mut reader = DecompressReader::with_buffer_size(packed, decoder, buffer_size);
    let mut output = Vec::new();
    reader.read_to_end(&mut output)?;
    Ok(output)
}

#[test]
fn test_reader_all_algorithms() {
    for buffer_size in [1, 7, 64, 0x800] {
        assert_eq!(read_all(RLE, RleDecoder::new(), buffer_size).unwrap(), RAW);
        assert_eq!(read_all(LZSS, LzssDecoder::new(), buffer_size).unwrap(), RAW);
        assert_eq!(read_all(ZLIB, DeflateDecoder::new(), buffer_size).unwrap(), RAW);
    }
}

#[test]
fn test_reader_small_reads() {
    let mut reader = DecompressReader::new(ZLIB, DeflateDecoder::new());
    let mut output = Vec::new();
    let mut buf = [0u8; 3];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        output.extend_from_slice(&buf[..n]);
    }
    assert_eq!(output, RAW);
    assert_eq!(reader.total_in(), ZLIB.len());
    assert_eq!(reader.total_out(), RAW.len());
    assert!(reader.decoder().is_finished());

    // Finished readers keep returning end of stream
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_reader_stops_after_zlib_trailer() {
    let mut packed = ZLIB.to_vec();
    packed.extend_from_slice(b"next resource");

    let mut reader = DecompressReader::new(Cursor::new(packed), DeflateDecoder::new());
    let mut output = Vec::new();
    reader.read_to_end(&mut output).unwrap();
    assert_eq!(output, RAW);
    assert_eq!(reader.total_in(), ZLIB.len());
}

#[test]
fn test_reader_errors() {
    // Cut off in the middle of the stream
    let err = read_all(&ZLIB[..100], DeflateDecoder::new(), 16).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    let err = read_all(&RLE[..RLE.len() - 1], RleDecoder::new(), 16).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    // Corrupt data
    let mut packed = ZLIB.to_vec();
    packed[0] = 0x79;
    let err = read_all(&packed, DeflateDecoder::new(), 16).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let inner = err
        .get_ref()
        .and_then(|e| e.downcast_ref::<DecompressError>());
    assert!(matches!(inner, Some(DecompressError::InvalidMethod(9))));
}

#[test]
fn test_reader_preset_dictionary() {
    let dictionary = b"the quick brown fox jumps over the lazy dog ".repeat(4);
    let mut reader = DecompressReader::new(DICTIONARY_ZLIB, DeflateDecoder::new());
    let mut output = Vec::new();

    let err = reader.read_to_end(&mut output).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let id = match err.get_ref().and_then(|e| e.downcast_ref::<DecompressError>()) {
        Some(DecompressError::DictionaryRequired(id)) => *id,
        other => panic!("unexpected error: {other:?}"),
    };
    assert_eq!(Some(id), reader.decoder().dictionary_id());

    reader.decoder_mut().set_dictionary(&dictionary).unwrap();
    reader.read_to_end(&mut output).unwrap();
    assert_eq!(
        output,
        b"the lazy dog jumps over the quick brown fox ".repeat(10)
    );
}

#[test]
fn test_resource_from_files() {
    for (name, id) in [("reference.zlib", 1), ("reference.lzss", 2), ("reference.rle", 3)] {
        let mut decoder = Algorithm::from_compress_id(id).unwrap().new_decoder();
        for chunk_size in [1, 100, 0x800] {
            let (mut file, packed_len) = open_fixture(name).unwrap();
            let output =
                decompress_resource(&mut decoder, &mut file, packed_len, RAW.len(), chunk_size)
                    .unwrap();
            assert_eq!(output, RAW, "{name} in {chunk_size} byte chunks");
        }
    }

    let (mut file, packed_len) = open_fixture("text.zlib").unwrap();
    let mut decoder = DeflateDecoder::new();
    let output =
        decompress_resource(&mut decoder, &mut file, packed_len, TEXT_RAW.len(), 0x800).unwrap();
    assert_eq!(output, TEXT_RAW);
}

#[test]
fn test_resource_size_mismatch() {
    let mut decoder = DeflateDecoder::new();

    // Packed length too short: output never completes
    let result = decompress_resource(&mut decoder, &mut &ZLIB[..], 200, RAW.len(), 64);
    assert!(matches!(
        result,
        Err(DecompressError::Incomplete(Status::DataStarvation))
    ));

    // Unpacked length too short: packed data is left over
    let result = decompress_resource(&mut decoder, &mut &ZLIB[..], ZLIB.len(), 400, 64);
    assert!(matches!(
        result,
        Err(DecompressError::Incomplete(Status::BufferTooSmall))
    ));

    // The reader itself runs dry
    let result = decompress_resource(&mut decoder, &mut &ZLIB[..10], ZLIB.len(), RAW.len(), 64);
    assert!(matches!(result, Err(DecompressError::Io(_))));
}

#[test]
fn test_one_shot_helpers() {
    assert_eq!(decompress_rle(RLE, RAW.len()).unwrap(), RAW);
    assert_eq!(decompress_lzss(LZSS, RAW.len()).unwrap(), RAW);
    assert_eq!(decompress_zlib(ZLIB, RAW.len()).unwrap(), RAW);

    assert!(matches!(
        decompress_zlib(ZLIB, RAW.len() + 1),
        Err(DecompressError::Incomplete(Status::DataStarvation))
    ));
}
