//! Windowed throughput estimation.
//!
//! Bytes are accumulated until at least [`EMISSION_INTERVAL_MS`] has passed
//! since the last emission; the accumulated total is then divided by the real
//! elapsed time and scaled to one second. Bursts inside a window are smoothed
//! away. Nothing is emitted for a window that is still open when the producer
//! stops calling.

pub mod clock;
pub mod format;

pub use clock::*;
pub use format::*;

use std::io::{self, ErrorKind, Read};

use tracing::trace;

pub const EMISSION_INTERVAL_MS: f64 = 1000.0;

/// Accumulates byte counts and reports bytes/sec once per window.
///
/// Methods take `&mut self`: the accumulate-then-reset step is not atomic, so
/// several producers feeding one sampler must serialize access themselves,
/// e.g. through [`crate::common::Shared`].
pub struct RateSampler<C, F> {
    clock: C,
    callback: F,
    accumulated_bytes: u64,
    window_start_ms: f64,
}

impl<C: Clock, F> RateSampler<C, F> {
    /// The first window opens now.
    pub fn new(clock: C, callback: F) -> Self {
        let window_start_ms = clock.now_ms();
        Self {
            clock,
            callback,
            accumulated_bytes: 0,
            window_start_ms,
        }
    }

    /// Adds `bytes` and returns the rate if this call closed a window.
    pub fn sample(&mut self, bytes: u64) -> Option<f64> {
        self.accumulated_bytes = self.accumulated_bytes.saturating_add(bytes);

        let now = self.clock.now_ms();
        let elapsed = now - self.window_start_ms;
        if elapsed < EMISSION_INTERVAL_MS {
            return None;
        }

        let rate = (self.accumulated_bytes as f64 / elapsed) * 1000.0;
        trace!(
            "window closed: {} bytes over {:.0}ms",
            self.accumulated_bytes, elapsed
        );
        self.accumulated_bytes = 0;
        self.window_start_ms = now;
        Some(rate)
    }

    /// Bytes seen in the currently open window.
    pub fn accumulated_bytes(&self) -> u64 {
        self.accumulated_bytes
    }

    pub fn window_start_ms(&self) -> f64 {
        self.window_start_ms
    }
}

impl<C: Clock, F: FnMut(f64)> RateSampler<C, F> {
    /// Adds `bytes`; invokes the callback at most once.
    pub fn observe(&mut self, bytes: u64) {
        if let Some(rate) = self.sample(bytes) {
            (self.callback)(rate);
        }
    }
}

/// Feeds everything `reader` yields into `sampler`, `chunk` bytes at a time.
///
/// Interrupted reads are retried. Returns the total byte count at end of
/// stream; the still-open window is left in the sampler.
pub fn observe_reader<C, F, R>(
    sampler: &mut RateSampler<C, F>,
    mut reader: R,
    chunk: usize,
) -> io::Result<u64>
where
    C: Clock,
    F: FnMut(f64),
    R: Read,
{
    let mut buf = vec![0u8; chunk.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        total += n as u64;
        sampler.observe(n as u64);
    }
}
