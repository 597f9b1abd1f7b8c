// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy for order API requests.
//!
//! Three classes of failure:
//! - transient network errors: retried with linear backoff
//!   (`attempt * base_delay`) up to `max_attempts` tries, then fatal
//! - HTTP 429: wait the fixed cool-down and reissue the same request;
//!   never counted against the attempt budget
//! - everything else: fatal on first sight

use std::time::{Duration, Instant};

use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;

/// HTTP status the order API uses for rate limiting.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// How a failed attempt should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryClass {
    Transient,
    RateLimited,
    Fatal,
}

/// Blocking sleep used between attempts.
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`, failing with [`Error::Interrupted`] if cut short.
    fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Sleeps on the current thread in short slices, waking early on interrupt.
pub struct ThreadSleeper {
    interrupt: Interrupt,
    slice: Duration,
}

impl ThreadSleeper {
    pub fn new(interrupt: Interrupt) -> Self {
        ThreadSleeper {
            interrupt,
            slice: Duration::from_millis(200),
        }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<()> {
        let deadline = Instant::now() + duration;
        loop {
            self.interrupt.check()?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            std::thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// Bounded retry with linear backoff and uncounted rate-limit cool-downs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub rate_limit_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        RetryPolicy {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay,
            rate_limit_cooldown: config.rate_limit_cooldown,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    pub fn classify(error: &Error) -> RetryClass {
        match error {
            Error::Transport(e) if e.is_transient() => RetryClass::Transient,
            Error::HttpStatus { status, .. } if *status == STATUS_TOO_MANY_REQUESTS => {
                RetryClass::RateLimited
            }
            _ => RetryClass::Fatal,
        }
    }

    /// Run `op` until it succeeds, fails fatally, or exhausts the attempt budget.
    ///
    /// `what` names the request in log lines.
    pub fn run<T>(
        &self,
        sleeper: &dyn Sleeper,
        what: &str,
        mut op: impl FnMut() -> Result<T>,
    ) -> Result<T> {
        let mut attempt = 1;
        loop {
            let error = match op() {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match RetryPolicy::classify(&error) {
                RetryClass::RateLimited => {
                    tracing::warn!(
                        what,
                        cooldown = %humantime::format_duration(self.rate_limit_cooldown),
                        "rate limited, cooling down"
                    );
                    sleeper.sleep(self.rate_limit_cooldown)?;
                }
                RetryClass::Transient if attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        what,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay = %humantime::format_duration(delay),
                        error = %error,
                        "transient failure, retrying"
                    );
                    sleeper.sleep(delay)?;
                    attempt += 1;
                }
                RetryClass::Transient => {
                    return Err(match error {
                        Error::Transport(last) => Error::RetriesExhausted { attempts: attempt, last },
                        other => other,
                    });
                }
                RetryClass::Fatal => return Err(error),
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
