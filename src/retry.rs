use std::{fmt, sync::Arc};

use reqwest::{Request, Response};

use crate::{
    drain::{drain_body, release_body},
    Attempt, BoxFuture, Clock, Decision, DecisionPolicy, DefaultPolicy,
    DelayPolicy, Result, RetryError, RetryOptions, SystemClock, Transport,
};

#[derive(Clone)]
/// Transport decorator that re-issues requests according to a [`DecisionPolicy`].
///
/// Every attempt is handed to the decision policy. `Ignore` returns the
/// attempt's outcome as is, `Abort` returns the policy's error, and `Retry`
/// drains and releases the rejected response, runs the optional
/// [`DelayPolicy`] and sends the same request again. The delay policy sees
/// the rejected response's status and headers with an empty body. The loop itself never stops retrying; the decision
/// policy is responsible for ending it.
pub struct RetryTransport<T> {
    inner: T,
    decision: Arc<dyn DecisionPolicy>,
    delay: Option<Arc<dyn DelayPolicy>>,
    clock: Arc<dyn Clock>,
    options: RetryOptions,
}

impl<T> fmt::Debug for RetryTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTransport")
            .field("delay", &self.delay.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RetryTransport<T> {
    /// Wraps `inner` with the [`DefaultPolicy`], no delay and the system clock.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            decision: Arc::new(DefaultPolicy::default()),
            delay: None,
            clock: Arc::new(SystemClock),
            options: RetryOptions::default(),
        }
    }

    /// Replaces the policy consulted after every attempt.
    pub fn with_decision(mut self, policy: impl DecisionPolicy + 'static) -> Self {
        self.decision = Arc::new(policy);
        self
    }

    /// Waits with `policy` before each retry.
    pub fn with_delay(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.delay = Some(Arc::new(policy));
        self
    }

    /// Sets the clock used for [`Attempt::start`].
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Applies drain options.
    pub fn with_options(mut self, opts: RetryOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Sends `request`, retrying as the decision policy directs.
    ///
    /// The request is only borrowed by the wrapped transport. With
    /// `reqwest::Client` every attempt, including the first, sends a
    /// `try_clone` copy, so a request with a streaming body fails with
    /// [`RetryError::UnreplayableRequest`] before anything is sent. Buffer
    /// such bodies first if they need retries.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.round_trip(&request).await
    }

    async fn round_trip(&self, request: &Request) -> Result<Response> {
        let round_trip = self.retry_loop(request);

        #[cfg(feature = "tracing")]
        let round_trip = tracing::Instrument::instrument(
            round_trip,
            tracing::debug_span!("round_trip", method = %request.method(), url = %request.url()),
        );

        round_trip.await
    }

    async fn retry_loop(&self, request: &Request) -> Result<Response> {
        let start = self.clock.now();
        let mut count: u64 = 1;

        loop {
            #[cfg(feature = "tracing")]
            if count > 1 {
                tracing::debug!(attempt = count, "retrying request");
            }

            let mut outcome = self.inner.send(request).await;

            #[cfg(feature = "tracing")]
            if let Err(err) = &outcome {
                tracing::info!(attempt = count, error = %err, "request error");
            }

            let attempt = Attempt::new(start, count, request, &outcome);
            let (decision, policy_error) = self.decision.decide(&attempt).into_parts();

            #[cfg(feature = "tracing")]
            if let Some(err) = &policy_error {
                tracing::info!(attempt = count, error = %err, "retry policy error");
            }

            match decision {
                Decision::Ignore => return outcome,
                Decision::Abort => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(
                        attempt = count,
                        error = policy_error.as_ref().map(tracing::field::display),
                        "aborting request"
                    );

                    if let Ok(response) = &mut outcome {
                        self.discard(response).await;
                    }
                    return Err(policy_error.map_or(RetryError::Aborted, RetryError::Policy));
                }
                Decision::Retry => {}
            }

            if let Ok(response) = &mut outcome {
                self.discard(response).await;
            }
            let outcome = outcome.map(release_body);

            if let Some(delay) = &self.delay {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt = count, "delaying before retry");

                let attempt = Attempt::new(start, count, request, &outcome);
                delay.wait(&attempt).await;
            }

            drop(outcome);
            count += 1;
        }
    }

    /// Drains a response the caller will never see. Failures only cost
    /// connection reuse, so they are logged and otherwise ignored.
    async fn discard(&self, response: &mut Response) {
        if let Err(_err) = drain_body(response, self.options.drain_limit).await {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_err, "failed to drain response body");
        }
    }
}

impl<T: Transport> Transport for RetryTransport<T> {
    fn send<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Response>> {
        Box::pin(self.round_trip(request))
    }
}
