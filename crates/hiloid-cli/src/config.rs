use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use hiloid::GeneratorConfig;

/// Command-line options of the `hiloid` binary.
///
/// Every option can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hiloid",
    version,
    about = "Prints hi/lo sequential 64-bit IDs backed by a file counter"
)]
pub struct CliArgs {
    /// Generator name attached to every log record.
    ///
    /// Environment variable: `HILOID_NAME`
    #[arg(long, env = "HILOID_NAME", default_value_t = String::from("hiloid"))]
    pub name: String,

    /// Section tag stamped into bits 60..=62, 0 for none.
    ///
    /// Generators with different sections may share one counter without
    /// colliding. A section limits epochs to 24 bits.
    ///
    /// Environment variable: `HILOID_SECTION`
    #[arg(long, env = "HILOID_SECTION", default_value_t = 0)]
    pub section: u8,

    /// Increment per ID: 1, 2, 4, ..., 1024.
    ///
    /// Environment variable: `HILOID_STEP`
    #[arg(long, env = "HILOID_STEP", default_value_t = 1)]
    pub step: u32,

    /// Round every ID down to a multiple of this value. Must be below the
    /// step; 0 and 1 disable flooring.
    ///
    /// Environment variable: `HILOID_FLOOR`
    #[arg(long, env = "HILOID_FLOOR", default_value_t = 0)]
    pub floor: u32,

    /// Non-zero seed scrambling the sequence bits.
    ///
    /// Environment variable: `HILOID_OBFUSCATION_SEED`
    #[arg(long, env = "HILOID_OBFUSCATION_SEED")]
    pub obfuscation_seed: Option<u64>,

    /// Number of IDs to print.
    ///
    /// Environment variable: `HILOID_COUNT`
    #[arg(short = 'n', long, env = "HILOID_COUNT", default_value_t = 10)]
    pub count: u64,

    /// File holding the last epoch handed out. Created on first use.
    ///
    /// Environment variable: `HILOID_COUNTER_FILE`
    #[arg(long, env = "HILOID_COUNTER_FILE", default_value = "hiloid.counter")]
    pub counter_file: PathBuf,
}

/// Validated settings of one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub count: u64,
    pub counter_file: PathBuf,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("HILOID_COUNT must be greater than 0");
        }
        if args.counter_file.as_os_str().is_empty() {
            bail!("HILOID_COUNTER_FILE cannot be empty");
        }

        let mut builder = GeneratorConfig::builder(args.name)
            .section(args.section)
            .step(args.step, args.floor);
        if let Some(seed) = args.obfuscation_seed {
            builder = builder.obfuscation(seed);
        }
        let generator = builder.build().context("invalid generator options")?;

        Ok(Self {
            generator,
            count: args.count,
            counter_file: args.counter_file,
        })
    }
}
