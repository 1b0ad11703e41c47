//! CLI for tscjitter — dump RDTSC jitter entropy to stdout.
//!
//! Pipe the output into a statistical test suite, e.g.
//! `tscjitter-dump -l 16 | RNG_test stdin64`.

mod dump;

use clap::Parser;
use clap::error::ErrorKind;
use tscjitter_core::{ConfigError, DEFAULT_K, RunConfig};

const BIN_NAME: &str = "tscjitter-dump";

#[derive(Parser, Debug)]
#[command(name = BIN_NAME)]
#[command(about = "Dump RDTSC jitter entropy to stdout.")]
#[command(long_about = "Dump RDTSC jitter entropy to stdout.\n\n\
    Nothing is written if stdout is a terminal. The output is raw native-endian \
    64-bit words, suitable for PractRand (`RNG_test stdin64`).")]
#[command(version = tscjitter_core::VERSION)]
#[command(args_override_self = true)]
struct Cli {
    /// Limit the output to no more than MAX gibibytes (0 = unlimited)
    #[arg(short = 'l', value_name = "MAX", default_value = "0", allow_hyphen_values = true)]
    limit: String,

    /// Entropy function to use: rdtsc, rdtscp, rdseed
    #[arg(short = 'f', value_name = "FUNC", default_value = "rdtsc")]
    function: String,

    /// Estimated minimum entropy bits per sample (clamped to 1..=63)
    #[arg(short = 'k', value_name = "K", default_value_t = DEFAULT_K.to_string(), allow_hyphen_values = true)]
    k: String,

    /// Issue a pause hint between counter reads
    #[arg(short = 'p')]
    pause: bool,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, ConfigError> {
        let limit_gib = tscjitter_core::parse_limit_gib(&self.limit)?;
        let k = tscjitter_core::parse_entropy_estimate(&self.k)?;
        tscjitter_core::build_config(limit_gib, &self.function, k, self.pause)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{BIN_NAME}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = dump::run(&config) {
        eprintln!("{BIN_NAME}: {e}");
        std::process::exit(1);
    }
}
