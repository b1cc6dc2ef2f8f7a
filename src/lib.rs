//! `retry-transport` wraps an HTTP transport with a retry loop.
//!
//! The loop is pure mechanism. What happens after each attempt is up to
//! pluggable collaborators:
//! - [`DecisionPolicy`] chooses to keep, retry or abort an attempt
//! - [`DelayPolicy`] waits between attempts
//! - [`Transport`] performs the actual exchange (implemented for
//!   [`reqwest::Client`])
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use retry_transport::{delay_fn, Attempt, RetryTransport, Verdict};
//!
//! # async fn run() -> retry_transport::Result<()> {
//! let client = reqwest::Client::new();
//! let transport = RetryTransport::new(client.clone())
//!     .with_decision(|attempt: &Attempt<'_>| match attempt.response() {
//!         Some(response) if response.status().is_server_error() && attempt.count() < 5 => {
//!             Verdict::retry()
//!         }
//!         Some(_) => Verdict::ignore(),
//!         None if attempt.count() < 5 => Verdict::retry(),
//!         None => Verdict::abort("max attempts exceeded"),
//!     })
//!     .with_delay(delay_fn(|attempt| Duration::from_millis(50 * attempt.count())));
//!
//! let request = client.get("https://example.com/health").build()?;
//! let response = transport.execute(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

mod attempt;
mod clock;
mod decision;
mod delay;
mod drain;
mod error;
mod options;
mod retry;
mod transport;

pub use attempt::Attempt;
pub use clock::{Clock, SystemClock};
pub use decision::{Decision, DecisionPolicy, DefaultPolicy, Verdict};
pub use delay::{delay_fn, DelayFn, DelayPolicy};
pub use error::{BoxError, RetryError};
pub use options::{RetryOptions, DEFAULT_DRAIN_LIMIT};
pub use retry::RetryTransport;
pub use transport::{BoxFuture, Transport};

pub type Result<T> = std::result::Result<T, RetryError>;
