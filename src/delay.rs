use std::{fmt, time::Duration};

use crate::{Attempt, BoxFuture};

/// Waits between a retried attempt and the next one.
///
/// The returned future is awaited before the next attempt is issued, so no
/// two attempts of the same operation overlap.
pub trait DelayPolicy: Send + Sync {
    fn wait<'a>(&'a self, attempt: &'a Attempt<'_>) -> BoxFuture<'a, ()>;
}

/// Adapts a function computing the wait for each retried attempt into a
/// [`DelayPolicy`] that sleeps on the tokio timer.
#[derive(Clone)]
pub struct DelayFn<F> {
    delay: F,
}

/// Builds a [`DelayFn`] from `delay`.
///
/// ```
/// use std::time::Duration;
/// use retry_transport::delay_fn;
///
/// let delay = delay_fn(|attempt| Duration::from_millis(100 * attempt.count()));
/// ```
pub fn delay_fn<F>(delay: F) -> DelayFn<F>
where
    F: Fn(&Attempt<'_>) -> Duration + Send + Sync,
{
    DelayFn { delay }
}

impl<F> DelayPolicy for DelayFn<F>
where
    F: Fn(&Attempt<'_>) -> Duration + Send + Sync,
{
    fn wait<'a>(&'a self, attempt: &'a Attempt<'_>) -> BoxFuture<'a, ()> {
        let duration = (self.delay)(attempt);
        Box::pin(async move {
            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }
        })
    }
}

impl<F> fmt::Debug for DelayFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayFn").finish_non_exhaustive()
    }
}
