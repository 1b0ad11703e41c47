//! Integration tests for tscjitter-core.
//!
//! These tests drive the public pipeline end to end:
//! raw options → build_config → dump::run → sink.

use std::io::{Read, Seek, SeekFrom};

use tscjitter_core::{
    BUFFER_BYTES, ByteLimit, ConfigError, EntropyEstimate, MAX_LIMIT_GIB, RunConfig, Sampler,
    SamplingFunction, build_config, run, sample,
};

const PATTERN: u64 = 0xAAAA_AAAA_AAAA_AAAA;

fn fixed(k: EntropyEstimate, use_pause: bool) -> u64 {
    sample(k, || PATTERN, use_pause)
}

#[test]
fn dump_to_file_writes_exact_byte_count() {
    let mut file = tempfile::tempfile().unwrap();
    let config = RunConfig {
        sampler: Sampler::custom("fixed", fixed),
        k: EntropyEstimate::new(63).unwrap(),
        use_pause: false,
        limit: Some(ByteLimit::from_bytes(65_536).unwrap()),
    };

    let summary = run(&config, &mut file).unwrap();
    assert_eq!(summary.fills, 2);
    assert_eq!(summary.bytes_written, 65_536);

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    assert_eq!(data.len(), 65_536);

    // k=63 folds two readings: rotl(pattern, 63) ^ pattern.
    let expected = PATTERN.rotate_left(63) ^ PATTERN;
    assert_eq!(expected, u64::MAX);
    assert!(
        data.chunks_exact(8)
            .all(|w| w == expected.to_ne_bytes().as_slice())
    );
}

#[test]
fn dump_with_real_counter_is_not_constant() {
    let mut file = tempfile::tempfile().unwrap();
    let mut config = build_config(0, "rdtsc", 3, false).unwrap();
    config.limit = Some(ByteLimit::from_bytes(BUFFER_BYTES as u64).unwrap());

    run(&config, &mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    assert_eq!(data.len(), BUFFER_BYTES);

    let first = &data[..8];
    assert!(
        data.chunks_exact(8).any(|w| w != first),
        "every word in the buffer was identical"
    );
}

#[test]
fn dump_with_serializing_counter_and_pause() {
    let mut file = tempfile::tempfile().unwrap();
    let mut config = build_config(0, "rdtscp", 7, true).unwrap();
    config.limit = Some(ByteLimit::from_bytes(BUFFER_BYTES as u64).unwrap());

    let summary = run(&config, &mut file).unwrap();
    assert_eq!(summary.bytes_written, BUFFER_BYTES as u64);
    assert_eq!(file.metadata().unwrap().len(), BUFFER_BYTES as u64);
}

#[test]
fn config_errors_are_detected_before_any_output() {
    assert!(matches!(
        build_config(0, "foo", 3, false),
        Err(ConfigError::InvalidFunction(_))
    ));
    assert!(matches!(
        build_config(MAX_LIMIT_GIB + 1, "rdtsc", 3, false),
        Err(ConfigError::LimitOverflow { .. })
    ));
}

#[test]
fn limit_scaling_is_binary() {
    let config = build_config(1, "rdtsc", 3, false).unwrap();
    assert_eq!(config.limit.map(ByteLimit::bytes), Some(1_073_741_824));
    assert_eq!(config.limit.map(ByteLimit::fills), Some(32_768));
}

#[test]
fn every_selectable_function_resolves() {
    for f in SamplingFunction::ALL {
        let result = build_config(0, f.name(), 3, false);
        if f.is_available() {
            assert_eq!(result.unwrap().sampler.name(), f.name());
        } else {
            assert_eq!(result.unwrap_err(), ConfigError::Unsupported(f));
        }
    }
}
