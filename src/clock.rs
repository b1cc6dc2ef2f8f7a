use std::time::SystemTime;

/// Source of the operation start timestamp recorded on every [`Attempt`](crate::Attempt).
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall clock backed by [`SystemTime::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime + Send + Sync,
{
    fn now(&self) -> SystemTime {
        self()
    }
}
