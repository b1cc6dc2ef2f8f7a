/// Boxed error produced by policies and non-reqwest transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RetryError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Failure reported by a custom [`Transport`](crate::Transport).
    #[error("transport error: {0}")]
    Custom(BoxError),
    /// The request body is a stream and cannot be sent more than once.
    #[error("request body cannot be replayed")]
    UnreplayableRequest,
    /// Error returned by the decision policy together with `Abort`.
    #[error("{0}")]
    Policy(BoxError),
    /// The decision policy aborted without giving a reason.
    #[error("request aborted by retry policy")]
    Aborted,
}

impl RetryError {
    /// Wraps an arbitrary transport failure.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        Self::Custom(err.into())
    }

    /// Returns `true` if the error came from an `Abort` decision.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Policy(_) | Self::Aborted)
    }

    /// Returns the policy error surfaced by an `Abort` decision, if any.
    pub fn policy_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Policy(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryError;

    #[test]
    fn policy_error_displays_inner_message() {
        let err = RetryError::Policy("max attempts exceeded".into());
        assert_eq!(err.to_string(), "max attempts exceeded");
        assert!(err.is_abort());
        assert_eq!(
            err.policy_error().map(ToString::to_string).as_deref(),
            Some("max attempts exceeded")
        );
    }

    #[test]
    fn custom_error_is_not_an_abort() {
        let err = RetryError::custom("connection reset");
        assert_eq!(err.to_string(), "transport error: connection reset");
        assert!(!err.is_abort());
        assert!(err.policy_error().is_none());
    }
}
