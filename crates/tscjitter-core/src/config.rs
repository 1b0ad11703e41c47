//! Run configuration: validated once at startup, immutable afterwards.

use crate::dump::BUFFER_BYTES;
use crate::params::EntropyEstimate;
use crate::sampler::{SamplerFn, SamplingFunction};

/// Bytes per gibibyte (2^30). The limit option is binary, not decimal.
pub const BYTES_PER_GIBIBYTE: u64 = 1 << 30;

/// Largest gibibyte count whose byte size fits in a `u64`.
pub const MAX_LIMIT_GIB: u64 = u64::MAX / BYTES_PER_GIBIBYTE;

const _: () = assert!(BYTES_PER_GIBIBYTE % BUFFER_BYTES as u64 == 0);

/// Reasons a [`RunConfig`] could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid argument: \"{value}\" is not a valid {what}")]
    InvalidNumber { what: &'static str, value: String },
    #[error("arithmetic overflow: {gib} * {}", BYTES_PER_GIBIBYTE)]
    LimitOverflow { gib: u64 },
    #[error("limit of {bytes} bytes is not a positive multiple of the {}-byte buffer", BUFFER_BYTES)]
    InvalidLimit { bytes: u64 },
    #[error("invalid option value: \"{0}\"")]
    InvalidFunction(String),
    #[error("{0} is not supported on this CPU")]
    Unsupported(SamplingFunction),
}

/// Total output size for a bounded dump, always a positive whole number of
/// buffers. An unbounded dump is `Option::<ByteLimit>::None`, not a zero limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteLimit(u64);

impl ByteLimit {
    /// Convert a gibibyte count, refusing zero and counts whose byte size
    /// overflows.
    pub fn from_gib(gib: u64) -> Result<Self, ConfigError> {
        if gib > MAX_LIMIT_GIB {
            return Err(ConfigError::LimitOverflow { gib });
        }
        if gib == 0 {
            return Err(ConfigError::InvalidLimit { bytes: 0 });
        }
        Ok(Self(gib * BYTES_PER_GIBIBYTE))
    }

    /// Use an exact byte count, which must be a positive multiple of the buffer.
    pub fn from_bytes(bytes: u64) -> Result<Self, ConfigError> {
        if bytes == 0 || bytes % BUFFER_BYTES as u64 != 0 {
            return Err(ConfigError::InvalidLimit { bytes });
        }
        Ok(Self(bytes))
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Number of full buffers this limit covers.
    pub const fn fills(self) -> u64 {
        self.0 / BUFFER_BYTES as u64
    }
}

/// The sampling strategy a dump calls once per output word.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    name: &'static str,
    func: SamplerFn,
}

impl Sampler {
    /// A caller-supplied strategy, e.g. a deterministic counter for testing.
    pub const fn custom(name: &'static str, func: SamplerFn) -> Self {
        Self { name, func }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn call(&self, k: EntropyEstimate, use_pause: bool) -> u64 {
        (self.func)(k, use_pause)
    }
}

impl From<SamplingFunction> for Sampler {
    fn from(f: SamplingFunction) -> Self {
        Self::custom(f.name(), f.sampler())
    }
}

/// Everything a dump needs, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub sampler: Sampler,
    pub k: EntropyEstimate,
    pub use_pause: bool,
    /// `None` streams forever.
    pub limit: Option<ByteLimit>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sampler: SamplingFunction::default().into(),
            k: EntropyEstimate::default(),
            use_pause: false,
            limit: None,
        }
    }
}

/// Parse the `-l` argument (gibibytes) as an unsigned 64-bit integer.
pub fn parse_limit_gib(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        what: "gibibyte limit",
        value: raw.to_string(),
    })
}

/// Parse the `-k` argument as a signed 64-bit integer (clamped later).
pub fn parse_entropy_estimate(raw: &str) -> Result<i64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        what: "entropy estimate",
        value: raw.to_string(),
    })
}

/// Validate raw option values into a [`RunConfig`].
///
/// - `raw_limit_gib` of `0` means unbounded; otherwise it is scaled by 2^30
///   with an overflow check.
/// - `raw_function_name` must name one of [`SamplingFunction::ALL`].
/// - `raw_k` is clamped into `[1, 63]`, never rejected.
pub fn build_config(
    raw_limit_gib: u64,
    raw_function_name: &str,
    raw_k: i64,
    raw_pause: bool,
) -> Result<RunConfig, ConfigError> {
    let limit = match raw_limit_gib {
        0 => None,
        gib => Some(ByteLimit::from_gib(gib)?),
    };

    let function: SamplingFunction = raw_function_name
        .parse()
        .map_err(|_| ConfigError::InvalidFunction(raw_function_name.to_string()))?;
    if !function.is_available() {
        return Err(ConfigError::Unsupported(function));
    }

    let k = EntropyEstimate::clamped(raw_k);
    if i64::from(k.get()) != raw_k {
        log::debug!("entropy estimate {raw_k} clamped to {k}");
    }

    Ok(RunConfig {
        sampler: function.into(),
        k,
        use_pause: raw_pause,
        limit,
    })
}
