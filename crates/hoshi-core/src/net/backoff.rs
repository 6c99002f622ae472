//! Backoff policy: a finite, lazy sequence of wait durations.
//!
//! Each iteration step corresponds to one retry; the sequence exhausts after
//! `max_retries` steps, at which point the caller must stop. A rate-limited
//! response can inject a server-dictated delay that takes priority over the
//! computed value for exactly one step.

use std::time::Duration;

use crate::config::RetryConfig;

/// Per-call retry state. Lives for one logical `request()` and is discarded
/// once the call resolves.
#[derive(Debug, Clone)]
pub struct Backoff {
    max_retries: u32,
    attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    next_override: Option<Duration>,
}

impl Backoff {
    /// Policy with the default delay curve and the given retry budget.
    pub fn new(max_retries: u32) -> Self {
        Self::from_config(&RetryConfig {
            max_retries,
            ..RetryConfig::default()
        })
    }

    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            attempts: 0,
            base_delay: Duration::from_secs_f64(cfg.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(cfg.max_delay_secs),
            next_override: None,
        }
    }

    /// Override the next delay with a server-supplied value (e.g. the
    /// `Retry-After` of a 429). Applies to exactly one step.
    pub fn set_next_backoff(&mut self, delay: Duration) {
        self.next_override = Some(delay);
    }

    /// Retries taken so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_retries
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_retries {
            return None;
        }
        self.attempts += 1;

        if let Some(delay) = self.next_override.take() {
            return Some(delay);
        }

        // base * 2^(n-1), capped. The shift is clamped so huge budgets
        // can't overflow the multiplier.
        let exp = 1u32 << self.attempts.saturating_sub(1).min(8);
        Some(self.base_delay.saturating_mul(exp).min(self.max_delay))
    }
}
