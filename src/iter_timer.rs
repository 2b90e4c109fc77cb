//! Lightweight iteration timing utilities.
//!
//! This module provides helpers to measure and report iteration times in the
//! roll-angle loop when combined with a progress bar (see the `progress`
//! feature).
//!
//! Components
//! -----------------
//! * [`IterTimer`] – Tracks per-iteration durations and computes a smoothed
//!   **exponential moving average** (EMA), giving a stable estimate of the
//!   per-angle time even when individual angles fluctuate with the number of
//!   in-FOV stars.
//!
//! * [`fmt_dur`] – Human-readable formatter for [`Duration`] values,
//!   producing strings like `"253µs"`, `"42ms"`, or `"3.14s"` depending on
//!   the scale.
//!
//! Design notes
//! -----------------
//! * The EMA update rule is `ema ← α·dt + (1–α)·ema` with `α ∈ (0,1]`.
//!   `α = 1.0` means no smoothing; small `α` adapts slowly.
//! * [`IterTimer::tick`] must be called at each iteration boundary. The
//!   first tick initializes the average to the first duration.

use std::time::{Duration, Instant};

pub struct IterTimer {
    last: Instant,
    ema_ns: f64,
    alpha: f64,
    count: u64,
}

impl IterTimer {
    pub fn new(alpha: f64) -> Self {
        Self {
            last: Instant::now(),
            ema_ns: 0.0,
            alpha,
            count: 0,
        }
    }

    #[inline]
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.count += 1;

        let dt_ns = dt.as_nanos() as f64;
        self.ema_ns = if self.count == 1 {
            dt_ns
        } else {
            self.alpha * dt_ns + (1.0 - self.alpha) * self.ema_ns
        };

        dt
    }

    #[inline]
    pub fn avg(&self) -> Duration {
        if self.count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.ema_ns as u64)
        }
    }
}

#[inline]
pub fn fmt_dur(d: Duration) -> String {
    let us = d.as_micros();
    if us < 1_000 {
        format!("{us}µs")
    } else {
        let ms = d.as_millis();
        if ms < 1_000 {
            format!("{ms}ms")
        } else {
            let s = d.as_secs_f32();
            format!("{s:.2}s")
        }
    }
}
