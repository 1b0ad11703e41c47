use std::io::BufWriter;

use tscjitter_core::{BUFFER_BYTES, DumpError, DumpSink, RunConfig};

/// Dump to stdout until the limit is reached (or forever).
pub fn run(config: &RunConfig) -> Result<(), DumpError> {
    restore_sigpipe();

    let mut sink = match stdout_sink() {
        Ok(sink) => sink,
        Err(e) => {
            log::warn!("cannot duplicate stdout ({e}), falling back to locked stdout");
            locked_stdout_sink()
        }
    };

    let summary = tscjitter_core::run(config, &mut *sink)?;
    if summary.refused_terminal {
        log::info!("stdout is a terminal; nothing written");
    }
    Ok(())
}

/// An unbuffered handle on fd 1, so each 32 KiB buffer is a single `write(2)`.
#[cfg(unix)]
fn stdout_sink() -> std::io::Result<Box<dyn DumpSink>> {
    dup_sink(std::io::stdout())
}

#[cfg(not(unix))]
fn stdout_sink() -> std::io::Result<Box<dyn DumpSink>> {
    Ok(locked_stdout_sink())
}

/// Duplicate `fd` into an owned `File`. Writes go straight to the descriptor.
#[cfg(unix)]
fn dup_sink(fd: impl std::os::fd::AsFd) -> std::io::Result<Box<dyn DumpSink>> {
    let fd = fd.as_fd().try_clone_to_owned()?;
    Ok(Box::new(std::fs::File::from(fd)))
}

/// Std's stdout is line-buffered; a buffer as large as one fill sends every
/// fill through as one write instead.
fn locked_stdout_sink() -> Box<dyn DumpSink> {
    Box::new(BufWriter::with_capacity(BUFFER_BYTES, std::io::stdout().lock()))
}

/// Let a closed downstream pipe terminate the process quietly instead of
/// surfacing as `EPIPE` on the next write.
#[cfg(unix)]
fn restore_sigpipe() {
    // SAFETY: resetting SIGPIPE to its default disposition before any other
    // thread exists. No handler function is involved.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn restore_sigpipe() {}
