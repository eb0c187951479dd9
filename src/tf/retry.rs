//! Retry policy for transient tool errors
//!
//! Terraform invocations can fail for reasons unrelated to the module under
//! test: provider plugin startup races, registry hiccups, state lock
//! contention. A retry policy classifies a failed invocation's output and
//! decides whether to try again.

use std::time::Duration;

use regex::Regex;

/// Output patterns treated as transient by [`RetryPolicy::transient`]
const TRANSIENT_PATTERNS: &[&str] = &[
    r"(?i)timeout while waiting for plugin to start",
    r"(?i)connection reset by peer",
    r"(?i)TLS handshake timeout",
    r"(?i)temporary failure in name resolution",
    r"(?i)error acquiring the state lock",
    r"(?i)registry service is unreachable",
    r"(?i)could not download module",
];

/// Decides whether a failed terraform invocation should be retried
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts per invocation (1 = no retries)
    pub max_attempts: u32,
    /// Sleep between attempts
    pub backoff: Duration,
    patterns: Vec<Regex>,
}

impl RetryPolicy {
    /// No retries: every failure is final
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
            patterns: Vec::new(),
        }
    }

    /// Retry on the default transient-error patterns
    pub fn transient(max_attempts: u32, backoff: Duration) -> Self {
        let patterns = TRANSIENT_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("builtin pattern must compile"))
            .collect();
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            patterns,
        }
    }

    /// Add a custom retryable pattern
    pub fn with_pattern(mut self, pattern: &str) -> crate::common::Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| crate::common::Error::Config(format!("bad retry pattern: {e}")))?;
        self.patterns.push(re);
        Ok(self)
    }

    /// Whether a failed invocation's combined output warrants a retry
    pub fn is_retryable(&self, output: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(output))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.is_retryable("Error: connection reset by peer"));
    }

    #[test]
    fn test_transient_patterns_match() {
        let policy = RetryPolicy::transient(3, Duration::from_secs(1));
        assert!(policy.is_retryable("Error: timeout while waiting for plugin to start"));
        assert!(policy.is_retryable("read tcp 10.0.0.1:443: Connection reset by peer"));
        assert!(policy.is_retryable("Error acquiring the state lock"));
        assert!(!policy.is_retryable(
            "Error: Invalid value for variable service_name"
        ));
    }

    #[test]
    fn test_custom_pattern() {
        let policy = RetryPolicy::none()
            .with_pattern(r"(?i)throttl")
            .unwrap();
        assert!(policy.is_retryable("Error: Throttling: rate exceeded"));
    }
}
