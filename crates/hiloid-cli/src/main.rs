#![doc = include_str!("../README.md")]

mod config;
mod counter;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{AppConfig, CliArgs};
use counter::FileCounterSource;
use hiloid::{HiLoGenerator, TokioSpawner, TracingLogger};
use telemetry::init_tracing;

type Generator = HiLoGenerator<TracingLogger, TokioSpawner>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_tracing()?;

    let generator = Generator::with_spawner(config.generator.clone(), TokioSpawner::current());
    let source = FileCounterSource::new(&config.counter_file);

    // The initial load touches the file system; keep it off the async workers.
    let loader = generator.clone();
    tokio::task::spawn_blocking(move || loader.load_epoch(source)).await??;

    if cfg!(debug_assertions) {
        tracing::info!("generator ready: {:#?}", generator);
    } else {
        tracing::info!(
            generator = generator.name(),
            epoch = generator.current_epoch(),
            "generator ready"
        );
    }

    let mut out = BufWriter::new(std::io::stdout().lock());
    for _ in 0..config.count {
        writeln!(out, "{}", generator.try_next()?)?;
    }
    out.flush()?;

    let stats = generator.stats();
    tracing::info!(
        renew_attempts = stats.renew_attempts,
        renewed = stats.renewed,
        "done"
    );
    Ok(())
}
