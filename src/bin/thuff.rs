//! thuff – Huffman compression for text files.
//!
//!   thuff compress notes.txt            → notes.txt.huff
//!   thuff decompress notes.txt.huff     → notes.txt_decompressed.txt
//!   thuff -v compress notes.txt --tree  → also print stages and the tree
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};

use text_huffman::report::{format_size, CompressionReport};
use text_huffman::{CodecError, CompressedFile, HuffmanCodec};

const EXTENSION: &str = "huff";

#[derive(Subcommand)]
enum Command {
    /// Compress a text file
    #[clap(visible_alias = "c")]
    Compress {
        /// Text file to compress
        input: PathBuf,
        /// Output path (default: INPUT.huff)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the Huffman tree
        #[arg(long, default_value_t = false)]
        tree: bool,
    },
    /// Decompress a .huff file
    #[clap(visible_alias = "d")]
    Decompress {
        /// Compressed file, must end in .huff
        input: PathBuf,
        /// Output path (default: INPUT with .huff replaced by _decompressed.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the rebuilt Huffman tree
        #[arg(long, default_value_t = false)]
        tree: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, infer_subcommands = true)]
/// Lossless Huffman compression for text files.
struct Conf {
    #[command(subcommand)]
    command: Command,

    /// Print per-stage diagnostics to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("'{}' is a directory, not a file", .0.display())]
    IsDirectory(PathBuf),
    #[error("file '{}' is empty", .0.display())]
    EmptyFile(PathBuf),
    #[error("file '{}' must have the .huff extension", .0.display())]
    WrongExtension(PathBuf),
    #[error("'{}' is not valid UTF-8 text", .0.display())]
    NotText(PathBuf),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Codec(CodecError::Io(e))
    }
}

fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

fn decompressed_path(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    let stem = name.strip_suffix(&format!(".{EXTENSION}")).unwrap_or(&name);
    PathBuf::from(format!("{stem}_decompressed.txt"))
}

fn check_input(input: &Path) -> Result<u64, CliError> {
    let meta = fs::metadata(input).map_err(|_| CliError::NotFound(input.to_path_buf()))?;
    if meta.is_dir() {
        return Err(CliError::IsDirectory(input.to_path_buf()));
    }
    Ok(meta.len())
}

fn describe(label: &str, path: &Path) {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    println!("{label}: {} ({} bytes, {})", path.display(), size, format_size(size));
}

fn run_compress(input: &Path, output: Option<PathBuf>, tree: bool, verbose: bool) -> Result<(), CliError> {
    if check_input(input)? == 0 {
        return Err(CliError::EmptyFile(input.to_path_buf()));
    }
    let output = output.unwrap_or_else(|| compressed_path(input));
    describe("Input", input);

    let start = Instant::now();
    let bytes = fs::read(input)?;
    let content = String::from_utf8(bytes).map_err(|_| CliError::NotText(input.to_path_buf()))?;

    let codec = HuffmanCodec::for_content(&content)?;
    if verbose {
        eprintln!("  distinct characters: {}", codec.frequencies().len());
        eprintln!("  characters:          {}", codec.frequencies().total());
        for (unit, code) in codec.code_table().iter() {
            eprintln!("  {unit:#06x} x{:<8} {code}", codec.frequencies().get(unit).unwrap_or(0));
        }
    }
    if tree {
        print!("{}", codec.tree());
    }

    let compressed = codec.into_compressed(&content)?;
    if verbose {
        eprintln!("  encoded bits:        {}", compressed.bits.bit_count());
        eprintln!("  container bytes:     {}", compressed.encoded_len());
    }
    fs::write(&output, compressed.to_bytes()?)?;
    let elapsed = start.elapsed();

    describe("Output", &output);
    let report = CompressionReport::new(content.len() as u64, fs::metadata(&output)?.len(), elapsed);
    println!("{report}");
    Ok(())
}

fn run_decompress(input: &Path, output: Option<PathBuf>, tree: bool, verbose: bool) -> Result<(), CliError> {
    check_input(input)?;
    if input.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        return Err(CliError::WrongExtension(input.to_path_buf()));
    }
    let output = output.unwrap_or_else(|| decompressed_path(input));
    describe("Input", input);

    let start = Instant::now();
    if tree || verbose {
        let file = CompressedFile::from_bytes(&fs::read(input)?)?;
        if verbose {
            eprintln!("  distinct characters: {}", file.frequencies.len());
            eprintln!("  encoded bits:        {}", file.bits.bit_count());
        }
        let codec = HuffmanCodec::new(file.frequencies.clone())?;
        if tree {
            print!("{}", codec.tree());
        }
        fs::write(&output, codec.decode(&file.bits)?)?;
    } else {
        text_huffman::decompress(input, &output)?;
    }
    let elapsed = start.elapsed();

    describe("Output", &output);
    println!("Time: {} ms", elapsed.as_millis());
    Ok(())
}

fn main() -> ExitCode {
    let conf = Conf::parse();
    let result = match conf.command {
        Command::Compress { input, output, tree } => run_compress(&input, output, tree, conf.verbose),
        Command::Decompress { input, output, tree } => run_decompress(&input, output, tree, conf.verbose),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("thuff: {e}");
            ExitCode::FAILURE
        }
    }
}
