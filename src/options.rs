use serde::Deserialize;

/// Byte cap applied when draining a rejected response body.
pub const DEFAULT_DRAIN_LIMIT: u64 = 4096;

/// Configures how rejected attempts are cleaned up.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Maximum number of body bytes read and discarded from a rejected
    /// response so its connection can be reused.
    pub drain_limit: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            drain_limit: DEFAULT_DRAIN_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RetryOptions, DEFAULT_DRAIN_LIMIT};

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: RetryOptions = serde_json::from_str("{}").expect("empty object must parse");
        assert_eq!(options.drain_limit, DEFAULT_DRAIN_LIMIT);
    }

    #[test]
    fn drain_limit_is_configurable() {
        let options: RetryOptions =
            serde_json::from_str(r#"{"drain_limit": 512}"#).expect("options must parse");
        assert_eq!(options, RetryOptions { drain_limit: 512 });
    }
}
