use std::time::{Duration, SystemTime};

use reqwest::{Request, Response};

use crate::{Result, RetryError};

/// Facts about one round trip, handed to the decision and delay policies.
///
/// An `Attempt` borrows the request and the transport outcome and is only
/// valid for the iteration that produced it.
#[derive(Clone, Copy, Debug)]
pub struct Attempt<'a> {
    start: SystemTime,
    count: u64,
    request: &'a Request,
    outcome: &'a Result<Response>,
}

impl<'a> Attempt<'a> {
    pub fn new(
        start: SystemTime,
        count: u64,
        request: &'a Request,
        outcome: &'a Result<Response>,
    ) -> Self {
        Self {
            start,
            count,
            request,
            outcome,
        }
    }

    /// When the first attempt of this operation was issued.
    pub fn start(&self) -> SystemTime {
        self.start
    }

    /// Attempt number, starting from 1.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.count == 1
    }

    /// The original request, shared by every attempt.
    pub fn request(&self) -> &'a Request {
        self.request
    }

    /// The response of this attempt, if the transport produced one.
    pub fn response(&self) -> Option<&'a Response> {
        self.outcome.as_ref().ok()
    }

    /// The transport error of this attempt, if any.
    pub fn error(&self) -> Option<&'a RetryError> {
        self.outcome.as_ref().err()
    }

    pub fn outcome(&self) -> &'a Result<Response> {
        self.outcome
    }

    /// Time spent on the operation as of `now`. Zero if `now` precedes the start.
    pub fn elapsed(&self, now: SystemTime) -> Duration {
        now.duration_since(self.start).unwrap_or_default()
    }
}
