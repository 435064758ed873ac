use std::fs;
use std::io;
use std::path::PathBuf;

use text_huffman::{compress, decompress, CodecError};

/// Scratch directory unique to one test, removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("text_huffman-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        Scratch(dir)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.0.join(file)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_file_roundtrip() {
    let scratch = Scratch::new("roundtrip");
    let original_text = "It was the best of times, it was the worst of times,\n\
                         it was the age of wisdom, it was the age of foolishness...\n";

    let compressed_path = scratch.path("text.huff");
    let dest_path = scratch.path("text_decompressed.txt");

    compress(original_text, &compressed_path).unwrap();
    assert!(fs::metadata(&compressed_path).unwrap().len() < original_text.len() as u64);

    decompress(&compressed_path, &dest_path).unwrap();
    assert_eq!(fs::read_to_string(&dest_path).unwrap(), original_text);
}

#[test]
fn single_character_file() {
    let scratch = Scratch::new("single");
    let compressed_path = scratch.path("a.huff");
    let dest_path = scratch.path("a.txt");

    compress("aaaaaaaaaa", &compressed_path).unwrap();
    decompress(&compressed_path, &dest_path).unwrap();
    assert_eq!(fs::read_to_string(&dest_path).unwrap(), "aaaaaaaaaa");
}

#[test]
fn truncated_file_is_rejected_without_output() {
    let scratch = Scratch::new("truncated");
    let compressed_path = scratch.path("t.huff");
    let dest_path = scratch.path("t.txt");

    compress("mississippi river", &compressed_path).unwrap();
    let bytes = fs::read(&compressed_path).unwrap();
    fs::write(&compressed_path, &bytes[..bytes.len() - 1]).unwrap();

    let err = decompress(&compressed_path, &dest_path).unwrap_err();
    assert!(matches!(err, CodecError::TruncatedFile(_)), "{err}");
    assert!(!dest_path.exists());
}

#[test]
fn missing_input_surfaces_io_error() {
    let scratch = Scratch::new("missing");
    let err = decompress(scratch.path("nope.huff"), scratch.path("out.txt")).unwrap_err();
    assert!(matches!(err, CodecError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
}

#[test]
fn empty_content_creates_nothing() {
    let scratch = Scratch::new("empty");
    let compressed_path = scratch.path("empty.huff");
    assert!(matches!(compress("", &compressed_path), Err(CodecError::EmptyInput)));
    assert!(!compressed_path.exists());
}
