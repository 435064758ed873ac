use std::fs;

use text_huffman::report::CompressionReport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir();
    let compressed_path = dir.join("sample.txt.huff");
    let decompressed_path = dir.join("sample_decompressed.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    println!("Sample text: {} bytes", sample_text.len());

    let start = std::time::Instant::now();
    text_huffman::compress(sample_text, &compressed_path)?;
    let compressed_size = fs::metadata(&compressed_path)?.len();

    let report = CompressionReport::new(sample_text.len() as u64, compressed_size, start.elapsed());
    println!("{report}");

    text_huffman::decompress(&compressed_path, &decompressed_path)?;
    let decompressed_text = fs::read_to_string(&decompressed_path)?;

    if sample_text == decompressed_text {
        println!("Decompression successful, data matches exactly.");
    } else {
        println!("Decompression failed, data mismatch.");
        return Err("Decompression verification failed".into());
    }

    fs::remove_file(&compressed_path)?;
    fs::remove_file(&decompressed_path)?;

    Ok(())
}
