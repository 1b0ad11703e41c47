//! Stream dump engine.
//!
//! Fills a fixed 32 KiB buffer with sampled words and writes it to a sink,
//! forever or for a whole number of buffers. The buffer size matches the
//! chunk PractRand reads from stdin, so each write lands as one unit on the
//! consumer side.
//!
//! Nothing is written when the sink is a terminal.

use std::io::{IsTerminal, Write};

use crate::config::RunConfig;

/// Size of one output buffer in bytes.
pub const BUFFER_BYTES: usize = 32768;

/// Bytes per sampled word.
pub const WORD_BYTES: usize = std::mem::size_of::<u64>();

/// Sampled words per buffer.
pub const BUFFER_WORDS: usize = BUFFER_BYTES / WORD_BYTES;

const _: () = assert!(BUFFER_BYTES % WORD_BYTES == 0);
const _: () = assert!(BUFFER_WORDS == 4096);

/// Destination for the binary stream.
pub trait DumpSink: Write {
    /// Whether the sink is an interactive terminal.
    fn is_interactive(&self) -> bool;
}

impl DumpSink for std::fs::File {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl DumpSink for std::io::Stdout {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

impl DumpSink for std::io::StdoutLock<'_> {
    fn is_interactive(&self) -> bool {
        self.is_terminal()
    }
}

/// A buffer of at least [`BUFFER_BYTES`] passes each full buffer straight
/// through to the inner sink as a single write.
impl<W: DumpSink> DumpSink for std::io::BufWriter<W> {
    fn is_interactive(&self) -> bool {
        self.get_ref().is_interactive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("write failed after {fills} buffers: {source}")]
    Io {
        fills: u64,
        #[source]
        source: std::io::Error,
    },
}

/// What a finished dump did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpSummary {
    /// Buffers filled and written.
    pub fills: u64,
    /// Total bytes handed to the sink.
    pub bytes_written: u64,
    /// The sink was a terminal, so nothing was written.
    pub refused_terminal: bool,
}

/// Stream sampled words into `sink` as configured.
///
/// Returns immediately with `refused_terminal` set if the sink is a terminal.
/// Without a limit this only returns on a write error. A failed write aborts
/// the dump; a short or resumed write would break the framing the consumer
/// expects.
pub fn run<S>(config: &RunConfig, sink: &mut S) -> Result<DumpSummary, DumpError>
where
    S: DumpSink + ?Sized,
{
    if sink.is_interactive() {
        log::debug!("refusing to write binary data to a terminal");
        return Ok(DumpSummary {
            refused_terminal: true,
            ..DumpSummary::default()
        });
    }

    let mut buf = [0u8; BUFFER_BYTES];

    match config.limit {
        None => {
            log::debug!(
                "dumping {} (k={}, pause={}) without limit",
                config.sampler.name(),
                config.k,
                config.use_pause
            );
            let mut fills = 0u64;
            loop {
                fill_and_write(config, &mut buf, sink, fills)?;
                fills = fills.wrapping_add(1);
            }
        }
        Some(limit) => {
            debug_assert_eq!(limit.bytes() % BUFFER_BYTES as u64, 0);
            let num_fills = limit.fills();
            log::debug!(
                "dumping {} (k={}, pause={}) for {num_fills} buffers",
                config.sampler.name(),
                config.k,
                config.use_pause
            );
            for fills in 0..num_fills {
                fill_and_write(config, &mut buf, sink, fills)?;
            }
            let summary = DumpSummary {
                fills: num_fills,
                bytes_written: num_fills * BUFFER_BYTES as u64,
                refused_terminal: false,
            };
            log::info!("wrote {} bytes", summary.bytes_written);
            Ok(summary)
        }
    }
}

#[inline]
fn fill_and_write<S>(
    config: &RunConfig,
    buf: &mut [u8; BUFFER_BYTES],
    sink: &mut S,
    fills: u64,
) -> Result<(), DumpError>
where
    S: DumpSink + ?Sized,
{
    for word in buf.chunks_exact_mut(WORD_BYTES) {
        let value = config.sampler.call(config.k, config.use_pause);
        word.copy_from_slice(&value.to_ne_bytes());
    }
    sink.write_all(buf)
        .and_then(|()| sink.flush())
        .map_err(|source| DumpError::Io { fills, source })
}
