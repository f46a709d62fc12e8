use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::metadata::CallMetadata;
use crate::retry::RetryPolicy;

/// Per-call overrides applied on top of a method's defaults.
#[derive(Clone, Default)]
pub struct CallOptions {
    pub metadata: CallMetadata,
    /// Per-attempt timeout; the retry policy's total timeout bounds the call.
    pub timeout: Option<Duration>,
    pub retry: Option<RetryPolicy>,
    /// Cooperative cancellation; ignored by the blocking build.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(key, value);
        self
    }

    /// Override the per-attempt timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry policy for this call.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Disable retries for this call.
    pub fn disable_retry(mut self) -> Self {
        self.retry = Some(RetryPolicy::disabled());
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_overrides() {
        let options = CallOptions::new()
            .with_metadata("x-request-reason", "audit")
            .with_timeout(Duration::from_secs(5))
            .disable_retry();

        assert_eq!(options.metadata.get("x-request-reason"), Some("audit"));
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.retry, Some(RetryPolicy::disabled()));
        assert!(options.cancel.is_none());
    }
}
