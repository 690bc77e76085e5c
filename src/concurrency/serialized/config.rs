use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`SerializedDeque`](super::SerializedDeque) worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Timeout applied by every method that does not take one explicitly.
    pub default_timeout: Duration,
    /// Name given to the worker thread.
    pub thread_name: String,
}

impl AccessConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default worker thread name.
    pub const DEFAULT_THREAD_NAME: &'static str = "keyed-deque-worker";

    /// Replaces the default request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Replaces the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            default_timeout: Self::DEFAULT_TIMEOUT,
            thread_name: Self::DEFAULT_THREAD_NAME.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = AccessConfig::default()
            .with_timeout(Duration::from_millis(250))
            .with_thread_name("orders");
        assert_eq!(config.default_timeout, Duration::from_millis(250));
        assert_eq!(config.thread_name, "orders");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AccessConfig =
            serde_json::from_str(r#"{"thread_name":"jobs"}"#).unwrap();
        assert_eq!(config.default_timeout, AccessConfig::DEFAULT_TIMEOUT);
        assert_eq!(config.thread_name, "jobs");
    }
}
