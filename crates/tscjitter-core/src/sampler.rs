//! Jitter-entropy sampling.
//!
//! One output word is built by reading a cycle counter `N` times and folding
//! each reading into an accumulator with a rotate-left by `r` followed by XOR
//! (see [`crate::params`] for how `r` and `N` follow from the entropy
//! estimate). Because `r` is co-prime to 64, every bit position of every
//! reading is spread over the word before it is returned.
//!
//! References: Dodis et al., *No Time to Hash: On Super-Efficient Entropy
//! Accumulation*; Ferguson, *The Windows 10 random number generation
//! infrastructure*.

use std::hint::black_box;
use std::str::FromStr;

use crate::capability;
use crate::params::{EntropyEstimate, MAX_K, MIN_K, WORD_BITS, gcd};

/// Signature shared by every selectable sampling function.
///
/// Functions that do not use the estimate or the pause flag (the hardware RNG
/// baselines) still take them so they can be swapped in anywhere.
pub type SamplerFn = fn(EntropyEstimate, bool) -> u64;

/// Fold `k`-derived many readings from `read` into one 64-bit word.
///
/// Calls `read` exactly [`EntropyEstimate::sample_count`] times. When
/// `use_pause` is set, a spin-wait hint is issued before every reading after
/// the first. Holds no state between calls and never allocates, so it is safe
/// to run from any number of threads at once.
#[inline(always)]
pub fn sample<R>(k: EntropyEstimate, mut read: R, use_pause: bool) -> u64
where
    R: FnMut() -> u64,
{
    debug_assert!((MIN_K..=MAX_K).contains(&k.get()));

    let r = k.mix_shift();
    debug_assert!(r > 0 && r <= k.get());
    debug_assert!(r % 2 != 0);
    debug_assert_eq!(gcd(WORD_BITS, r), 1);

    let n = k.sample_count();
    debug_assert!(n > 0);

    let mut entropy = black_box(read());

    for _ in 1..n {
        if use_pause {
            capability::pause();
        }
        let tsc = black_box(read());
        entropy = entropy.rotate_left(r) ^ tsc;
    }

    entropy
}

/// Jitter entropy from the non-serializing `RDTSC` counter.
#[inline(never)]
pub fn rdtsc_jitter_entropy(k: EntropyEstimate, use_pause: bool) -> u64 {
    sample(k, capability::rdtsc, use_pause)
}

/// Jitter entropy from the serializing `RDTSCP` counter.
#[inline(never)]
pub fn rdtscp_jitter_entropy(k: EntropyEstimate, use_pause: bool) -> u64 {
    sample(k, capability::rdtscp, use_pause)
}

/// `RDSEED` baseline with the [`SamplerFn`] signature. Ignores both arguments.
pub fn rdseed_sample(_k: EntropyEstimate, _use_pause: bool) -> u64 {
    capability::rdseed64()
}

/// `RDRAND` baseline with the [`SamplerFn`] signature. Ignores both arguments.
pub fn rdrand_sample(_k: EntropyEstimate, _use_pause: bool) -> u64 {
    capability::rdrand64()
}

/// The closed set of sampling functions selectable for a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingFunction {
    /// Jitter entropy over `RDTSC`.
    #[default]
    Rdtsc,
    /// Jitter entropy over `RDTSCP`.
    Rdtscp,
    /// Raw `RDSEED` words, for comparison.
    Rdseed,
}

impl SamplingFunction {
    /// Every selectable function, in help-text order.
    pub const ALL: [SamplingFunction; 3] = [Self::Rdtsc, Self::Rdtscp, Self::Rdseed];

    /// Name accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rdtsc => "rdtsc",
            Self::Rdtscp => "rdtscp",
            Self::Rdseed => "rdseed",
        }
    }

    /// The function pointer to call per output word.
    pub const fn sampler(self) -> SamplerFn {
        match self {
            Self::Rdtsc => rdtsc_jitter_entropy,
            Self::Rdtscp => rdtscp_jitter_entropy,
            Self::Rdseed => rdseed_sample,
        }
    }

    /// Whether the running CPU can execute this function.
    pub fn is_available(self) -> bool {
        match self {
            Self::Rdtsc | Self::Rdtscp => true,
            Self::Rdseed => capability::has_rdseed(),
        }
    }
}

impl std::fmt::Display for SamplingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name is not one of [`SamplingFunction::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sampling function \"{0}\"")]
pub struct UnknownFunction(pub String);

impl FromStr for SamplingFunction {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownFunction(s.to_string()))
    }
}
