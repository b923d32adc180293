use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info};

use pitchside::data;
use pitchside::synth::{generate, GeneratorConfig};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to write the generated dataset to
    out: Option<PathBuf>,

    /// RNG seed
    #[clap(short, long, default_value = "42")]
    seed: u64,

    /// number of clubs to include (defaults to the full league)
    #[clap(short, long)]
    clubs: Option<usize>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.out
            .as_ref()
            .ok_or(anyhow!("output file must be specified"))?;
        if let Some(clubs) = self.clubs {
            if clubs == 0 {
                return Err(anyhow!("at least one club must be included"));
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let mut config = GeneratorConfig::default();
    if let Some(clubs) = args.clubs {
        config.clubs.truncate(clubs);
    }
    let mut rand = StdRand::seed(args.seed);
    let records = generate(&config, &mut rand);

    let out = args.out.unwrap();
    data::write_to_file(&out, &records)?;
    info!(
        "wrote {} players across {} clubs to {} (seed {})",
        records.len(),
        config.clubs.len(),
        out.to_str().unwrap(),
        args.seed
    );
    Ok(())
}
