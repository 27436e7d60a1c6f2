//! Frame Driver
//!
//! Host-driven tick loop. The host (a `requestAnimationFrame` callback in
//! the browser, a plain loop in tests) calls [`FrameDriver::frame`] once
//! per frame with its timestamp; the driver hands the tick closure a
//! [`FrameTime`] and the closure writes signals. Every write resolves all
//! of its bindings before `frame` returns.

use tracing::trace;

use crate::error::Result;

/// Timing of one frame, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Host timestamp for this frame.
    pub timestamp_ms: f64,
    /// Time since the previous frame; zero on the first frame or if the
    /// host clock went backwards.
    pub delta_ms: f64,
    /// Zero-based frame index.
    pub frame: u64,
}

/// Drives a tick closure once per host frame.
pub struct FrameDriver<F> {
    tick: F,
    frames: u64,
    last_timestamp_ms: Option<f64>,
}

impl<F> FrameDriver<F>
where
    F: FnMut(FrameTime) -> Result<()>,
{
    pub fn new(tick: F) -> Self {
        Self {
            tick,
            frames: 0,
            last_timestamp_ms: None,
        }
    }

    /// Deliver one frame. An error from the tick is returned unchanged.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<()> {
        let delta_ms = self
            .last_timestamp_ms
            .map_or(0.0, |last| (timestamp_ms - last).max(0.0));
        let time = FrameTime {
            timestamp_ms,
            delta_ms,
            frame: self.frames,
        };

        self.last_timestamp_ms = Some(timestamp_ms);
        self.frames += 1;
        trace!(frame = time.frame, timestamp_ms, delta_ms, "frame");
        (self.tick)(time)
    }

    /// Deliver a frame per timestamp, stopping at the first error.
    pub fn run<I>(&mut self, timestamps: I) -> Result<()>
    where
        I: IntoIterator<Item = f64>,
    {
        for timestamp_ms in timestamps {
            self.frame(timestamp_ms)?;
        }
        Ok(())
    }

    /// Frames delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Seconds with two decimals, e.g. `1234.0` -> `"1.23"`.
///
/// Rounds like `Number.prototype.toFixed(2)`: an exact tie goes to the
/// larger magnitude, and non-finite values print as `Infinity`/`NaN`.
pub fn seconds_label(timestamp_ms: f64) -> String {
    to_fixed_2(timestamp_ms / 1000.0)
}

fn to_fixed_2(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    // A double can only sit exactly halfway between two hundredths when its
    // fraction is an odd number of eighths (.125, .375, .625, .875).
    let magnitude = value.abs();
    let eighths = magnitude * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths % 2.0 == 1.0;
    if is_tie && magnitude < 1e15 {
        let hundredths = (magnitude * 100.0).ceil() as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:02}", hundredths / 100, hundredths % 100);
    }

    format!("{value:.2}")
}
