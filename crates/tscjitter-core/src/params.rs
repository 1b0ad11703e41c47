//! Entropy estimate and the mixing parameters derived from it.
//!
//! The caller supplies `k`, an estimate of the minimum entropy (in bits) that a
//! single counter reading contributes. From it we derive the rotation `r` (the
//! largest odd number ≤ `k`, hence co-prime to the 64-bit word width) and the
//! number of readings `N = ceil(64 / r)` folded into one output word.

/// Word width of the accumulator, in bits.
pub const WORD_BITS: u32 = u64::BITS;

/// Smallest accepted entropy estimate (bits per sample).
pub const MIN_K: u32 = 1;

/// Largest accepted entropy estimate (bits per sample).
pub const MAX_K: u32 = 63;

/// Entropy estimate used when none is given.
pub const DEFAULT_K: u32 = 3;

const _: () = assert!(MIN_K > 0);
const _: () = assert!(MAX_K < WORD_BITS);
const _: () = assert!(MIN_K <= MAX_K);
const _: () = assert!(MIN_K <= DEFAULT_K && DEFAULT_K <= MAX_K);
// Any odd rotation is co-prime to a power-of-two width.
const _: () = assert!(WORD_BITS.is_power_of_two());

/// Estimated minimum entropy bits per raw counter sample, always in
/// `[MIN_K, MAX_K]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntropyEstimate(u32);

impl EntropyEstimate {
    /// Build an estimate, rejecting values outside `[MIN_K, MAX_K]`.
    pub const fn new(k: u32) -> Option<Self> {
        if k >= MIN_K && k <= MAX_K {
            Some(Self(k))
        } else {
            None
        }
    }

    /// Build an estimate, clamping out-of-range values to the nearest bound.
    ///
    /// The value is an estimate, not a contract, so `0` becomes `1` and
    /// anything above 63 becomes 63.
    pub const fn clamped(raw: i64) -> Self {
        if raw < MIN_K as i64 {
            Self(MIN_K)
        } else if raw > MAX_K as i64 {
            Self(MAX_K)
        } else {
            Self(raw as u32)
        }
    }

    /// The raw `k` value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Rotation amount `r`: the largest odd number ≤ `k`.
    pub const fn mix_shift(self) -> u32 {
        let k = self.0;
        k - (k % 2 == 0) as u32
    }

    /// Number of counter readings per output word: `ceil(64 / r)`.
    pub const fn sample_count(self) -> u32 {
        WORD_BITS.div_ceil(self.mix_shift())
    }
}

impl Default for EntropyEstimate {
    fn default() -> Self {
        Self(DEFAULT_K)
    }
}

impl std::fmt::Display for EntropyEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Greatest common divisor, used to check the co-primality invariant.
pub(crate) const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
