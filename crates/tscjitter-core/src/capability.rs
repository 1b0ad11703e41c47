//! Raw hardware primitives: cycle-counter reads, hardware random words, and
//! the spin-wait hint used to perturb timing between samples.
//!
//! Everything here is a thin wrapper over a compiler intrinsic. The x86_64
//! implementations are the real thing; other targets get a monotonic-clock
//! stand-in for the counters and report the hardware generators as absent.

// ---------------------------------------------------------------------------
// Cycle counter
// ---------------------------------------------------------------------------

/// Read the time-stamp counter (non-serializing `RDTSC`).
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub fn rdtsc() -> u64 {
    // SAFETY: RDTSC is available on every x86_64 CPU and has no side effects.
    unsafe { core::arch::x86_64::_rdtsc() }
}

/// Read the time-stamp counter with `RDTSCP`, which waits for all prior
/// instructions to retire before reading.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub fn rdtscp() -> u64 {
    let mut aux = 0u32;
    // SAFETY: `aux` is a valid out-pointer for the TSC_AUX value. RDTSCP is
    // present on every x86_64 CPU this crate targets.
    unsafe { core::arch::x86_64::__rdtscp(&mut aux) }
}

#[cfg(not(target_arch = "x86_64"))]
fn monotonic_nanos() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_nanos() as u64
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub fn rdtsc() -> u64 {
    monotonic_nanos()
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
pub fn rdtscp() -> u64 {
    std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    monotonic_nanos()
}

/// Spin-wait hint between counter reads (`PAUSE` on x86).
#[inline(always)]
pub fn pause() {
    std::hint::spin_loop();
}

// ---------------------------------------------------------------------------
// Hardware random number generators
// ---------------------------------------------------------------------------

/// Whether the CPU implements `RDRAND`.
pub fn has_rdrand() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("rdrand")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Whether the CPU implements `RDSEED`.
pub fn has_rdseed() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("rdseed")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "rdrand")]
unsafe fn rdrand64_retry() -> u64 {
    let mut val = 0u64;
    // SAFETY: caller guarantees RDRAND support; `val` is a valid out-pointer.
    while unsafe { core::arch::x86_64::_rdrand64_step(&mut val) } == 0 {
        pause();
    }
    val
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "rdseed")]
unsafe fn rdseed64_retry() -> u64 {
    let mut val = 0u64;
    // SAFETY: caller guarantees RDSEED support; `val` is a valid out-pointer.
    while unsafe { core::arch::x86_64::_rdseed64_step(&mut val) } == 0 {
        pause();
    }
    val
}

/// One 64-bit word from the DRBG-backed `RDRAND` instruction.
///
/// Retries until the instruction reports success. Callers must have checked
/// [`has_rdrand`]; on a CPU without it this function panics.
#[inline]
pub fn rdrand64() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        assert!(has_rdrand(), "RDRAND is not supported on this CPU");
        // SAFETY: support was verified just above.
        unsafe { rdrand64_retry() }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        panic!("RDRAND is only available on x86_64")
    }
}

/// One 64-bit word from the entropy-source-backed `RDSEED` instruction.
///
/// `RDSEED` fails transiently when the conditioner is drained, so this spins
/// until a word is delivered. Callers must have checked [`has_rdseed`].
#[inline]
pub fn rdseed64() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        assert!(has_rdseed(), "RDSEED is not supported on this CPU");
        // SAFETY: support was verified just above.
        unsafe { rdseed64_retry() }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        panic!("RDSEED is only available on x86_64")
    }
}
