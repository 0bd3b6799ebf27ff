use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use brc::{Engine, EngineConfig, ReadMode, Strategy};

/// Computes min/mean/max per key over a `key;value` measurements file.
#[derive(Parser, Debug)]
#[command(name = "brc", version, about)]
struct Cli {
    /// Measurements file, one `key;value` record per line.
    #[arg(default_value = "data/measurements.txt")]
    input: PathBuf,

    /// How chunks are handed to workers.
    #[arg(long, value_enum, env = "BRC_STRATEGY", default_value_t = Strategy::WorkerPool)]
    strategy: Strategy,

    /// Worker threads. Defaults to the number of logical CPUs.
    #[arg(long, env = "BRC_WORKERS")]
    workers: Option<usize>,

    /// Lines per chunk.
    #[arg(long, env = "BRC_CHUNK_LINES", default_value_t = brc::config::DEFAULT_CHUNK_LINES)]
    chunk_lines: usize,

    /// Memory-map the input instead of reading it through a buffer.
    #[arg(long, env = "BRC_MMAP")]
    mmap: bool,

    /// Logging verbosity (trace, debug, info, warn, error).
    #[arg(long, env = "BRC_LOG", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default()
            .with_strategy(self.strategy)
            .with_chunk_lines(self.chunk_lines);
        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }

    fn read_mode(&self) -> ReadMode {
        if self.mmap {
            ReadMode::Mapped
        } else {
            ReadMode::Buffered
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log level: {}", cli.log_level))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let engine = Engine::new(cli.engine_config()).context("invalid configuration")?;
    let summary = engine
        .run_path(&cli.input, cli.read_mode())
        .with_context(|| format!("aggregating {}", cli.input.display()))?;

    let mut out = io::stdout().lock();
    writeln!(out, "{} ", summary.mapping).context("writing result")?;
    out.flush().context("writing result")?;
    Ok(())
}
