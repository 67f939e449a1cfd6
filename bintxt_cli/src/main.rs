use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};

use bintxt_codecs::{compressor_by_name, DEFAULT_COMPRESSOR};
use bintxt_core::{PackError, SelectedFile, Session, DEFAULT_CHUNK_SIZE};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "bintxt",
    about = "Pack any file into a compressed, text-safe payload and restore it again",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file and write it as a `.compressed.txt` payload
    Pack {
        /// File to pack ("-" reads stdin). Nothing happens when omitted.
        input: Option<PathBuf>,
        /// Destination payload ("-" writes to stdout). Defaults to
        /// `<input>.compressed.txt` next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compressor to use: gzip | zstd
        #[arg(short, long, default_value = DEFAULT_COMPRESSOR)]
        codec: String,
        /// Raw bytes encoded per chunk (does not change the payload)
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Decode and decompress a payload back into the original file
    Unpack {
        /// Payload to restore ("-" reads stdin). Nothing happens when omitted.
        input: Option<PathBuf>,
        /// Destination file ("-" writes to stdout). Defaults to the payload
        /// name with `.compressed.txt` stripped.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compressor the payload was packed with: gzip | zstd
        #[arg(short, long, default_value = DEFAULT_COMPRESSOR)]
        codec: String,
        /// Raw bytes decoded per chunk (does not change the output)
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Pack and restore a file in memory and check the bytes survive
    Verify {
        /// File to verify ("-" reads stdin). Nothing happens when omitted.
        input: Option<PathBuf>,
        /// Compressor to use: gzip | zstd
        #[arg(short, long, default_value = DEFAULT_COMPRESSOR)]
        codec: String,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn is_dash(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn select(input: Option<PathBuf>) -> anyhow::Result<Option<SelectedFile>> {
    match input {
        None => Ok(None),
        Some(path) if is_dash(&path) => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(Some(SelectedFile::from_bytes("stdin", buf)))
        }
        Some(path) => Ok(Some(SelectedFile::from_path(path))),
    }
}

/// Default artifact location: the derived name next to the input file.
fn default_output(input: Option<&Path>, file_name: &str) -> PathBuf {
    match input.and_then(Path::parent) {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if is_dash(path) {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()?;
    } else {
        let mut file =
            File::create(path).with_context(|| format!("creating output file {:?}", path))?;
        file.write_all(bytes)
            .with_context(|| format!("writing output file {:?}", path))?;
    }
    Ok(())
}

/// `NoFileSelected` is a silent no-op; everything else becomes a CLI error.
fn skip_unselected<T>(result: Result<T, PackError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if !e.is_user_visible() => {
            debug!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_pack(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    codec_name: &str,
    chunk_size: usize,
) -> anyhow::Result<()> {
    let compressor = compressor_by_name(codec_name)?;
    let mut session = Session::new(compressor).with_chunk_size(chunk_size);
    let codec = session.compressor_name();
    let source_path = input.clone().filter(|p| !is_dash(p));

    let t0 = Instant::now();
    let Some(packed) = skip_unselected(session.compress(select(input)?))? else {
        return Ok(());
    };
    let elapsed = t0.elapsed();

    let dest = output.unwrap_or_else(|| default_output(source_path.as_deref(), &packed.file_name));
    write_artifact(&dest, packed.text.as_bytes())?;

    let compressed = packed.compressed_len();
    eprintln!("  codec       : {}", codec);
    eprintln!("  raw size    : {}", human_bytes(packed.raw_len));
    eprintln!("  compressed  : {}", human_bytes(compressed));
    eprintln!("  payload     : {}", human_bytes(packed.text.len() as u64));
    eprintln!(
        "  ratio       : {:.2}x",
        packed.raw_len as f64 / (packed.text.len() as f64).max(1.0)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    if !is_dash(&dest) {
        eprintln!("  written to  : {:?}", dest);
    }
    Ok(())
}

fn run_unpack(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    codec_name: &str,
    chunk_size: usize,
) -> anyhow::Result<()> {
    let compressor = compressor_by_name(codec_name)?;
    let mut session = Session::new(compressor).with_chunk_size(chunk_size);
    let codec = session.compressor_name();
    let source_path = input.clone().filter(|p| !is_dash(p));

    let t0 = Instant::now();
    let Some(restored) = skip_unselected(session.restore(select(input)?))? else {
        return Ok(());
    };
    let elapsed = t0.elapsed();

    let dest =
        output.unwrap_or_else(|| default_output(source_path.as_deref(), &restored.file_name));
    write_artifact(&dest, &restored.bytes)?;

    eprintln!("  codec       : {}", codec);
    eprintln!("  restored    : {}", human_bytes(restored.bytes.len() as u64));
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((restored.bytes.len() as f64 / elapsed.as_secs_f64().max(1e-9)) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    if !is_dash(&dest) {
        eprintln!("  written to  : {:?}", dest);
    }
    Ok(())
}

fn run_verify(input: Option<PathBuf>, codec_name: &str) -> anyhow::Result<()> {
    let Some(file) = select(input)? else {
        debug!("verify: no file selected");
        return Ok(());
    };
    let mut session = Session::new(compressor_by_name(codec_name)?);
    let codec = session.compressor_name();
    let expected = file
        .clone()
        .into_bytes()
        .with_context(|| format!("reading {}", file.name()))?;

    let t0 = Instant::now();
    let packed = session.compress(Some(file))?.clone();
    let pack_elapsed = t0.elapsed();

    let t1 = Instant::now();
    let payload = SelectedFile::from_bytes(packed.file_name.clone(), packed.text.clone().into_bytes());
    let restored = session.restore(Some(payload))?;
    let restore_elapsed = t1.elapsed();

    println!("=== Round trip: {} ({}) ===", restored.file_name, codec);
    println!();
    println!("  raw size       : {}", human_bytes(packed.raw_len));
    println!("  compressed     : {}", human_bytes(packed.compressed_len()));
    println!("  payload        : {}", human_bytes(packed.text.len() as u64));
    println!("  pack time      : {:.3}s", pack_elapsed.as_secs_f64());
    println!("  restore time   : {:.3}s", restore_elapsed.as_secs_f64());

    if restored.bytes != expected {
        anyhow::bail!(
            "round trip mismatch: restored {} bytes, original has {}",
            restored.bytes.len(),
            expected.len()
        );
    }
    println!("  result         : identical");
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Pack {
            input,
            output,
            codec,
            chunk_size,
        } => run_pack(input, output, &codec, chunk_size),
        Commands::Unpack {
            input,
            output,
            codec,
            chunk_size,
        } => run_unpack(input, output, &codec, chunk_size),
        Commands::Verify { input, codec } => run_verify(input, &codec),
    }
}
