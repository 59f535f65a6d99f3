//! Retry-until-ready polling
//!
//! Mail services finish work after they answer: an account exists
//! before its mailbox accepts logins, a confirmation email lands
//! seconds after the form submit. [`until_ready`] re-runs an async
//! probe on a fixed delay until it reports [`Readiness::Ready`] or a
//! wall-clock budget runs out.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Outcome of a single readiness probe.
///
/// Keeps "not there yet" out of the error channel: a probe that
/// reaches the service but finds nothing returns `NotReady`, while a
/// probe that cannot reach the service at all returns `Err` through
/// the surrounding `Result` and aborts the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness<T> {
    /// The awaited value is available.
    Ready(T),
    /// Nothing yet; worth asking again later.
    NotReady,
}

impl<T> From<Option<T>> for Readiness<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotReady, Self::Ready)
    }
}

/// Tuning for [`until_ready`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total time budget. An attempt only starts while the remaining
    /// budget covers the delay before it.
    pub timeout: Duration,
    /// Pause between consecutive attempts.
    pub delay: Duration,
    /// Emit a debug event per retry.
    pub log: bool,
    /// Message reported when the budget runs out.
    pub error: String,
}

impl RetryPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    /// A policy with default timing and the given exhaustion message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            delay: Self::DEFAULT_DELAY,
            log: true,
            error: error.into(),
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }
}

/// Wait states of the polling loop.
enum State<T> {
    /// About to run the probe. `attempts` counts finished probes.
    Probing { attempts: u32 },
    /// Probe found nothing; deciding whether another fits the budget.
    Waiting { attempts: u32 },
    /// A probe produced the value.
    Succeeded(T),
    /// Budget spent without a value.
    Exhausted { attempts: u32 },
}

/// Run `probe` until it yields a value, pausing [`RetryPolicy::delay`]
/// between attempts.
///
/// The first attempt always runs. After a `NotReady` the loop sleeps
/// and probes again as long as the next attempt would still start
/// strictly inside [`RetryPolicy::timeout`]; a 20s budget with a 5s
/// delay yields attempts at 0s, 5s, 10s, and 15s. An attempt that
/// starts in time may finish after the deadline and still succeed.
///
/// # Errors
///
/// Returns [`Error::RetryExhausted`] with the policy's message and the
/// attempt count when the budget runs out. A probe `Err` is fatal and
/// propagates immediately.
pub async fn until_ready<T, F, Fut>(policy: &RetryPolicy, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Readiness<T>>>,
{
    let started = Instant::now();
    let mut state = State::Probing { attempts: 0 };

    loop {
        state = match state {
            State::Probing { attempts } => match probe().await? {
                Readiness::Ready(value) => State::Succeeded(value),
                Readiness::NotReady => State::Waiting {
                    attempts: attempts + 1,
                },
            },
            State::Waiting { attempts } => {
                if started.elapsed() + policy.delay >= policy.timeout {
                    State::Exhausted { attempts }
                } else {
                    if policy.log {
                        debug!(
                            "Attempt {} not ready, retrying in {:?}",
                            attempts, policy.delay
                        );
                    }
                    sleep(policy.delay).await;
                    State::Probing { attempts }
                }
            }
            State::Succeeded(value) => return Ok(value),
            State::Exhausted { attempts } => {
                warn!("Giving up after {} attempts: {}", attempts, policy.error);
                return Err(Error::RetryExhausted {
                    message: policy.error.clone(),
                    attempts,
                });
            }
        };
    }
}
