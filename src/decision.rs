use std::fmt;

use reqwest::StatusCode;

use crate::{Attempt, BoxError, RetryError};

/// Intent signalled by a [`DecisionPolicy`] for one attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Decision {
    /// The attempt's outcome is final; return it unchanged.
    Ignore,
    /// Discard the attempt's response and send the request again.
    Retry,
    /// Stop and return the policy's error instead of the attempt's outcome.
    Abort,
}

/// A [`Decision`] plus the optional error that accompanies it.
///
/// The error is only surfaced on [`Decision::Abort`]. With any other
/// decision it is logged and dropped.
pub struct Verdict {
    decision: Decision,
    error: Option<BoxError>,
}

impl Verdict {
    pub fn ignore() -> Self {
        Decision::Ignore.into()
    }

    pub fn retry() -> Self {
        Decision::Retry.into()
    }

    /// Aborts with `err` as the error returned to the caller.
    pub fn abort(err: impl Into<BoxError>) -> Self {
        Self {
            decision: Decision::Abort,
            error: Some(err.into()),
        }
    }

    /// Aborts without a reason; the caller receives [`RetryError::Aborted`].
    pub fn abort_silently() -> Self {
        Decision::Abort.into()
    }

    pub fn with_error(mut self, err: impl Into<BoxError>) -> Self {
        self.error = Some(err.into());
        self
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    pub fn into_parts(self) -> (Decision, Option<BoxError>) {
        (self.decision, self.error)
    }
}

impl From<Decision> for Verdict {
    fn from(decision: Decision) -> Self {
        Self {
            decision,
            error: None,
        }
    }
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verdict")
            .field("decision", &self.decision)
            .field("error", &self.error.as_ref().map(ToString::to_string))
            .finish()
    }
}

/// Chooses whether an attempt is final, retried or aborted.
///
/// Implementations are consulted once per attempt and may keep their own
/// state; the retry loop assumes nothing about it. Bounding the number of
/// attempts is the policy's job.
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, attempt: &Attempt<'_>) -> Verdict;
}

impl<F> DecisionPolicy for F
where
    F: Fn(&Attempt<'_>) -> Verdict + Send + Sync,
{
    fn decide(&self, attempt: &Attempt<'_>) -> Verdict {
        self(attempt)
    }
}

/// Policy used when none is configured.
///
/// Retries rate limiting (429), 500, 502, 503 and 504 responses, reqwest
/// timeout, connect, request and body errors, and failures from custom
/// transports, until `max_attempts` attempts have been made. Anything else,
/// including the last exhausted attempt, is returned unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DefaultPolicy {
    max_attempts: u32,
}

impl DefaultPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// `max_attempts` counts the first attempt; values below 1 behave as 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

impl DecisionPolicy for DefaultPolicy {
    fn decide(&self, attempt: &Attempt<'_>) -> Verdict {
        let transient = match attempt.outcome() {
            Ok(response) => should_retry_status(response.status()),
            Err(err) => should_retry_error(err),
        };

        if transient && attempt.count() < u64::from(self.max_attempts) {
            Verdict::retry()
        } else {
            Verdict::ignore()
        }
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn should_retry_error(err: &RetryError) -> bool {
    match err {
        RetryError::Transport(err) => {
            err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
        }
        RetryError::Custom(_) => true,
        RetryError::UnreplayableRequest | RetryError::Policy(_) | RetryError::Aborted => false,
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use reqwest::{Method, Request, Response, Url};

    use super::{Decision, DecisionPolicy, DefaultPolicy, Verdict};
    use crate::{Attempt, Result, RetryError};

    fn request() -> Request {
        Request::new(
            Method::POST,
            Url::parse("http://localhost/orders").expect("valid url"),
        )
    }

    fn status(code: u16) -> Result<Response> {
        Ok(http::Response::builder()
            .status(code)
            .body("")
            .expect("valid response")
            .into())
    }

    fn decide(policy: &impl DecisionPolicy, count: u64, outcome: &Result<Response>) -> Decision {
        let request = request();
        let attempt = Attempt::new(SystemTime::UNIX_EPOCH, count, &request, outcome);
        policy.decide(&attempt).decision()
    }

    #[test]
    fn abort_carries_error() {
        let (decision, error) = Verdict::abort("max attempts exceeded").into_parts();
        assert_eq!(decision, Decision::Abort);
        assert_eq!(
            error.map(|err| err.to_string()).as_deref(),
            Some("max attempts exceeded")
        );
    }

    #[test]
    fn ignore_can_carry_informational_error() {
        let verdict = Verdict::ignore().with_error("unexpected status");
        assert_eq!(verdict.decision(), Decision::Ignore);
        assert!(verdict.error().is_some());
        assert!(Verdict::abort_silently().error().is_none());
    }

    #[test]
    fn closures_are_policies() {
        let policy = |attempt: &Attempt<'_>| {
            if attempt.count() < 2 {
                Verdict::retry()
            } else {
                Verdict::ignore()
            }
        };
        let outcome = status(200);
        assert_eq!(decide(&policy, 1, &outcome), Decision::Retry);
        assert_eq!(decide(&policy, 2, &outcome), Decision::Ignore);
    }

    #[test]
    fn default_policy_retries_transient_statuses() {
        let policy = DefaultPolicy::default();
        for code in [429, 500, 502, 503, 504] {
            assert_eq!(decide(&policy, 1, &status(code)), Decision::Retry, "{code}");
        }
        for code in [200, 301, 400, 404, 501] {
            assert_eq!(decide(&policy, 1, &status(code)), Decision::Ignore, "{code}");
        }
    }

    #[test]
    fn default_policy_stops_after_max_attempts() {
        let policy = DefaultPolicy::new(2);
        let outcome = status(503);
        assert_eq!(decide(&policy, 1, &outcome), Decision::Retry);
        assert_eq!(decide(&policy, 2, &outcome), Decision::Ignore);
    }

    #[test]
    fn default_policy_never_replays_unreplayable_requests() {
        let policy = DefaultPolicy::default();
        let outcome: Result<Response> = Err(RetryError::UnreplayableRequest);
        assert_eq!(decide(&policy, 1, &outcome), Decision::Ignore);

        let outcome: Result<Response> = Err(RetryError::custom("connection reset"));
        assert_eq!(decide(&policy, 1, &outcome), Decision::Retry);
    }

    #[test]
    fn zero_max_attempts_means_single_attempt() {
        let policy = DefaultPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(decide(&policy, 1, &status(500)), Decision::Ignore);
    }
}
