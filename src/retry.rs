use std::time::Duration;

use crate::errors::{Error, RetryMetadata};
use crate::status::Code;

/// Status codes retried by default when the server signals them.
pub const DEFAULT_RETRY_CODES: &[Code] = &[
    Code::Unavailable,
    Code::DeadlineExceeded,
    Code::ResourceExhausted,
];

/// Retry policy applied around transport dispatch.
///
/// Delays grow by `multiplier` from `initial_delay` up to `max_delay`;
/// `total_timeout` bounds the sum of delays across all attempts. Timeouts
/// are per attempt and configured separately.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub total_timeout: Duration,
    pub codes: Vec<Code>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            multiplier: 1.3,
            total_timeout: Duration::from_secs(600),
            codes: DEFAULT_RETRY_CODES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Single-attempt policy: the first failure is final.
    pub fn disabled() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
            total_timeout: Duration::ZERO,
            codes: Vec::new(),
        }
    }

    pub fn with_codes(mut self, codes: impl Into<Vec<Code>>) -> Self {
        self.codes = codes.into();
        self
    }

    pub fn with_total_timeout(mut self, total_timeout: Duration) -> Self {
        self.total_timeout = total_timeout;
        self
    }

    /// Whether `error` may be reissued under this policy.
    ///
    /// Transport errors are always candidates; server statuses only when the
    /// code is in the configured set. Cancellation is never retried. The
    /// total-timeout budget is enforced by the envelope, not here.
    pub fn is_retryable(&self, error: &Error) -> bool {
        match error {
            Error::Transport(_) => true,
            Error::Service(err) => self.codes.contains(&err.code),
            _ => false,
        }
    }
}

/// Closed-form delay sequence for one call's envelope.
#[derive(Debug)]
pub(crate) struct Backoff {
    current: Duration,
    max_delay: Duration,
    multiplier: f64,
}

impl Backoff {
    pub(crate) fn new(policy: &RetryPolicy) -> Self {
        Self {
            current: policy.initial_delay,
            max_delay: policy.max_delay,
            multiplier: policy.multiplier,
        }
    }

    /// Delay to sleep before the next attempt, then advances the sequence.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let grown = self.current.mul_f64(self.multiplier.max(1.0));
        self.current = grown.min(self.max_delay);
        delay
    }
}

/// Tracks attempts across the envelope for both async and blocking builds.
#[derive(Default)]
pub(crate) struct RetryState {
    pub(crate) attempts: u32,
    pub(crate) last_code: Option<Code>,
    pub(crate) last_error: Option<String>,
}

impl RetryState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, error: &Error) {
        self.attempts += 1;
        self.last_code = error.code();
        self.last_error = Some(error.to_string());
    }

    pub(crate) fn metadata(&self) -> Option<RetryMetadata> {
        if self.attempts <= 1 {
            None
        } else {
            Some(RetryMetadata {
                attempts: self.attempts,
                last_code: self.last_code,
                last_error: self.last_error.clone(),
            })
        }
    }

    /// Stamps retry metadata onto the error that ends the envelope.
    pub(crate) fn finish(&self, mut error: Error) -> Error {
        if let Some(metadata) = self.metadata() {
            match &mut error {
                Error::Service(err) => err.retries = Some(metadata),
                Error::Transport(err) => err.retries = Some(metadata),
                _ => {}
            }
        }
        error
    }
}
