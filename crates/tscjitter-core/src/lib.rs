//! # tscjitter-core
//!
//! **Entropy from the jitter between cycle-counter readings.**
//!
//! Consecutive reads of the CPU time-stamp counter are separated by a number of
//! cycles that varies with pipeline state, cache behavior, interrupts, and
//! frequency scaling. Given an estimate `k` of how many bits of that variation
//! each reading carries, the sampler folds just enough readings into a 64-bit
//! word (rotate-left, then XOR) for the word to collect 64 bits of estimated
//! entropy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tscjitter_core::{EntropyEstimate, rdtsc_jitter_entropy};
//!
//! let k = EntropyEstimate::new(3).unwrap();
//! let word = rdtsc_jitter_entropy(k, false);
//! println!("{word:016x}");
//! ```
//!
//! ## Architecture
//!
//! Configuration → Dump engine → Sampler → Capability (RDTSC / RDTSCP / RDSEED) → sink
//!
//! The dump engine streams raw native-endian words in 32 KiB buffers so the
//! output can be piped straight into a statistical test suite such as
//! PractRand (`RNG_test stdin64`). `RDRAND` and `RDSEED` are exposed as
//! baselines for comparison.
//!
//! The mixing transform is exploratory. It is designed to pass external
//! statistical test batteries, nothing stronger is claimed.

pub mod capability;
pub mod config;
pub mod dump;
pub mod params;
pub mod sampler;

pub use config::{
    BYTES_PER_GIBIBYTE, ByteLimit, ConfigError, MAX_LIMIT_GIB, RunConfig, Sampler, build_config,
    parse_entropy_estimate, parse_limit_gib,
};
pub use dump::{BUFFER_BYTES, BUFFER_WORDS, DumpError, DumpSink, DumpSummary, WORD_BYTES, run};
pub use params::{DEFAULT_K, EntropyEstimate, MAX_K, MIN_K, WORD_BITS};
pub use sampler::{
    SamplerFn, SamplingFunction, UnknownFunction, rdrand_sample, rdseed_sample,
    rdtsc_jitter_entropy, rdtscp_jitter_entropy, sample,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
