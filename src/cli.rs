// Command-line front end for chunkpress.
//
// Explicit subcommands with long-form options; every command reads its
// whole input into memory and runs a single transform.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::codec::{self, Algorithm, CodecFault};
use crate::engine::{self, DEFAULT_BUFFER_SIZE, Options as EngineOptions};
use crate::error::CompressionError;
use crate::io::{FileStats, hex_digest, stats};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const DEFAULT_BENCH_ITERATIONS: u32 = 100;
const DEFAULT_BENCH_BUFFER_SIZES: [usize; 3] = [4096, 8192, 16384];

// ---------------------------------------------------------------------------
// Byte size parsing (supports K, M suffixes)
// ---------------------------------------------------------------------------

fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024usize),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1usize),
    };
    let num: usize = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    let size = num
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))?;
    if size == 0 {
        return Err("buffer size must be at least one byte".into());
    }
    Ok(size)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Chunked streaming compressor (LZ4, zlib, LZMA, LZFSE).
#[derive(Parser, Debug)]
#[command(
    name = "chunkpress",
    version,
    about = "Chunked streaming compressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress an input stream.
    Compress(TransformArgs),
    /// Decompress an input stream.
    Decompress(TransformArgs),
    /// List supported algorithms.
    Algorithms,
    /// Time compress/decompress round trips per algorithm and buffer size.
    Bench(BenchArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Lz4,
    Zlib,
    Lzma,
    Lzfse,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Lz4 => Algorithm::Fast,
            AlgorithmArg::Zlib => Algorithm::Balanced,
            AlgorithmArg::Lzma => Algorithm::HighRatio,
            AlgorithmArg::Lzfse => Algorithm::PlatformOptimized,
        }
    }
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Compression algorithm.
    #[arg(long, short = 'a', value_enum, default_value_t = AlgorithmArg::Lzfse)]
    algorithm: AlgorithmArg,

    /// Intermediate buffer size (supports K/M suffix).
    #[arg(long = "buffer-size", short = 'b', value_parser = parse_byte_size, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (default: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BenchArgs {
    /// Algorithms to measure (repeat; default: all).
    #[arg(long = "algorithm", short = 'a', value_enum, action = ArgAction::Append)]
    algorithms: Vec<AlgorithmArg>,

    /// Buffer sizes to measure (repeat; default: 4K, 8K, 16K).
    #[arg(long = "buffer-size", short = 'b', value_parser = parse_byte_size, action = ArgAction::Append)]
    buffer_sizes: Vec<usize>,

    /// Round trips per measurement.
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..), default_value_t = DEFAULT_BENCH_ITERATIONS)]
    iterations: u32,

    /// File to compress.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Decompress,
    Algorithms,
    Bench,
    Config,
}

struct RunOptions {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    engine: EngineOptions,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    bench_algorithms: Vec<Algorithm>,
    bench_buffer_sizes: Vec<usize>,
    bench_iterations: u32,
}

impl RunOptions {
    fn base(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            use_stdout: false,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            engine: EngineOptions::default(),
            input_file: None,
            output_file: None,
            bench_algorithms: Vec::new(),
            bench_buffer_sizes: Vec::new(),
            bench_iterations: DEFAULT_BENCH_ITERATIONS,
        }
    }
}

fn resolve_options(cli: Cli) -> RunOptions {
    match &cli.command {
        Cmd::Compress(args) | Cmd::Decompress(args) => {
            let command = if matches!(cli.command, Cmd::Compress(_)) {
                Command::Compress
            } else {
                Command::Decompress
            };
            RunOptions {
                use_stdout: args.stdout,
                engine: EngineOptions::new(args.algorithm.into())
                    .with_buffer_size(args.buffer_size),
                input_file: args.input.clone(),
                output_file: args.output.clone(),
                ..RunOptions::base(command, &cli)
            }
        }
        Cmd::Algorithms => RunOptions::base(Command::Algorithms, &cli),
        Cmd::Config => RunOptions::base(Command::Config, &cli),
        Cmd::Bench(args) => {
            let bench_algorithms = if args.algorithms.is_empty() {
                Algorithm::ALL.to_vec()
            } else {
                args.algorithms.iter().copied().map(Algorithm::from).collect()
            };
            let bench_buffer_sizes = if args.buffer_sizes.is_empty() {
                DEFAULT_BENCH_BUFFER_SIZES.to_vec()
            } else {
                args.buffer_sizes.clone()
            };
            RunOptions {
                input_file: Some(args.input.clone()),
                bench_algorithms,
                bench_buffer_sizes,
                bench_iterations: args.iterations,
                ..RunOptions::base(Command::Bench, &cli)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Input / output helpers
// ---------------------------------------------------------------------------

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    match path {
        Some(path) => File::open(path)?.read_to_end(&mut data)?,
        None => io::stdin().lock().read_to_end(&mut data)?,
    };
    Ok(data)
}

fn open_output(opts: &RunOptions) -> Result<Box<dyn Write>, String> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                return Err(format!(
                    "output file exists, use -f to overwrite: {}",
                    path.display()
                ));
            }
            File::create(path)
                .map(|f| Box::new(BufWriter::new(f)) as Box<dyn Write>)
                .map_err(|e| format!("output file: {}: {e}", path.display()))
        }
    }
}

// ---------------------------------------------------------------------------
// Compress / decompress commands
// ---------------------------------------------------------------------------

fn cmd_transform(opts: &RunOptions) -> i32 {
    let verb = match opts.command {
        Command::Compress => "compress",
        _ => "decompress",
    };

    let input = match read_input(opts.input_file.as_deref()) {
        Ok(data) => data,
        Err(e) => {
            match &opts.input_file {
                Some(path) => eprintln!("chunkpress: input file: {}: {e}", path.display()),
                None => eprintln!("chunkpress: stdin: {e}"),
            }
            return 1;
        }
    };

    let started = Instant::now();
    let result = if opts.command == Command::Compress {
        engine::compress_with_options(&input, &opts.engine)
    } else {
        engine::decompress_with_options(&input, &opts.engine)
    };
    let elapsed = started.elapsed();

    let output = match result {
        Ok(data) => data,
        Err(e) => {
            eprintln!("chunkpress: {verb}: {e}");
            if matches!(e, CompressionError::InitError { .. }) && !opts.quiet {
                eprintln!(
                    "chunkpress: hint: decompression needs the algorithm that compressed the data"
                );
            }
            return 1;
        }
    };

    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("chunkpress: {msg}");
            return 1;
        }
    };
    if let Err(e) = writer.write_all(&output).and_then(|()| writer.flush()) {
        eprintln!("chunkpress: write error: {e}");
        return 1;
    }

    let file_stats = stats(opts.engine.algorithm, &input, &output);
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "chunkpress: {verb}: {} -> {} bytes ({:.1}%) with {} in {:.3} ms",
            file_stats.input_size,
            file_stats.output_size,
            file_stats.ratio() * 100.0,
            file_stats.algorithm,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    if opts.json_output {
        print_json_stats(verb, opts, &file_stats, elapsed);
    }

    0
}

fn print_json_stats(verb: &str, opts: &RunOptions, file_stats: &FileStats, elapsed: Duration) {
    let json = serde_json::json!({
        "command": verb,
        "algorithm": file_stats.algorithm.name(),
        "buffer_size": opts.engine.buffer_size,
        "input_size": file_stats.input_size,
        "output_size": file_stats.output_size,
        "ratio": file_stats.ratio(),
        "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
        "input_sha256": file_stats.input_sha256.as_ref().map(hex_digest),
        "output_sha256": file_stats.output_sha256.as_ref().map(hex_digest),
    });
    match serde_json::to_string_pretty(&json) {
        Ok(text) => eprintln!("{text}"),
        Err(e) => eprintln!("chunkpress: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Algorithms command
// ---------------------------------------------------------------------------

fn cmd_algorithms(opts: &RunOptions) -> i32 {
    if opts.json_output {
        let list: Vec<_> = Algorithm::ALL
            .into_iter()
            .map(|a| {
                serde_json::json!({
                    "name": a.name(),
                    "class": a.class(),
                    "codec_id": codec::resolve(a).raw(),
                    "default": a == Algorithm::default(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&list) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("chunkpress: json: {e}");
                return 1;
            }
        }
        return 0;
    }

    for a in Algorithm::ALL {
        let marker = if a == Algorithm::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<6} {:<11} codec {}{marker}",
            a.name(),
            a.class(),
            codec::resolve(a)
        );
    }
    0
}

// ---------------------------------------------------------------------------
// Bench command
// ---------------------------------------------------------------------------

struct BenchRow {
    algorithm: Algorithm,
    buffer_size: usize,
    compressed_size: usize,
    compress: Duration,
    decompress: Duration,
}

/// Fails unless `restored` reproduces `input` byte for byte.
fn verify_roundtrip(
    algorithm: Algorithm,
    input: &[u8],
    restored: &[u8],
) -> Result<(), CompressionError> {
    if restored == input {
        return Ok(());
    }
    let reason = match input.iter().zip(restored).position(|(a, b)| a != b) {
        Some(offset) => format!("round trip differs at byte {offset}"),
        None => format!(
            "round trip produced {} bytes, expected {}",
            restored.len(),
            input.len()
        ),
    };
    Err(CompressionError::ProcessError {
        algorithm,
        reason: CodecFault::new(reason),
    })
}

fn bench_one(
    input: &[u8],
    algorithm: Algorithm,
    buffer_size: usize,
    iterations: u32,
) -> Result<BenchRow, CompressionError> {
    let compressed = engine::compress(input, algorithm, buffer_size)?;
    let restored = engine::decompress(&compressed, algorithm, buffer_size)?;
    verify_roundtrip(algorithm, input, &restored)?;

    let started = Instant::now();
    for _ in 0..iterations {
        engine::compress(input, algorithm, buffer_size)?;
    }
    let compress = started.elapsed() / iterations;

    let started = Instant::now();
    for _ in 0..iterations {
        engine::decompress(&compressed, algorithm, buffer_size)?;
    }
    let decompress = started.elapsed() / iterations;

    Ok(BenchRow {
        algorithm,
        buffer_size,
        compressed_size: compressed.len(),
        compress,
        decompress,
    })
}

fn cmd_bench(opts: &RunOptions) -> i32 {
    let input = match read_input(opts.input_file.as_deref()) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("chunkpress: bench: input: {e}");
            return 1;
        }
    };

    let mut rows = Vec::new();
    for &algorithm in &opts.bench_algorithms {
        for &buffer_size in &opts.bench_buffer_sizes {
            log::info!("bench {algorithm} buffer {buffer_size} x{}", opts.bench_iterations);
            match bench_one(&input, algorithm, buffer_size, opts.bench_iterations) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    eprintln!("chunkpress: bench: {e}");
                    return 1;
                }
            }
        }
    }

    if opts.json_output {
        let list: Vec<_> = rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "algorithm": r.algorithm.name(),
                    "buffer_size": r.buffer_size,
                    "input_size": input.len(),
                    "compressed_size": r.compressed_size,
                    "compress_us": r.compress.as_secs_f64() * 1e6,
                    "decompress_us": r.decompress.as_secs_f64() * 1e6,
                })
            })
            .collect();
        match serde_json::to_string_pretty(&list) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("chunkpress: json: {e}");
                return 1;
            }
        }
        return 0;
    }

    if !opts.quiet {
        println!(
            "{:<6} {:>8} {:>10} {:>7} {:>14} {:>14}",
            "algo", "buffer", "size", "ratio", "compress us", "decompress us"
        );
    }
    for r in &rows {
        println!(
            "{:<6} {:>8} {:>10} {:>6.1}% {:>14.1} {:>14.1}",
            r.algorithm.name(),
            r.buffer_size,
            r.compressed_size,
            r.compressed_size as f64 * 100.0 / input.len() as f64,
            r.compress.as_secs_f64() * 1e6,
            r.decompress.as_secs_f64() * 1e6
        );
    }
    0
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("chunkpress version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;

    eprintln!("FILE_IO={file_io}");
    eprintln!("DEFAULT_ALGORITHM={}", Algorithm::default());
    eprintln!("DEFAULT_BUFFER_SIZE={DEFAULT_BUFFER_SIZE}");
    eprintln!("ZLIB_LEVEL={}", codec::zlib::DEFAULT_LEVEL);

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    let default_filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && !opts.quiet
        && let Some(path) = opts.output_file.take()
    {
        eprintln!(
            "chunkpress: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Compress | Command::Decompress => cmd_transform(&opts),
        Command::Algorithms => cmd_algorithms(&opts),
        Command::Bench => cmd_bench(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
