//! Clock abstraction — injectable time source for the transition state
//! machine and the assistant-note display window.
//!
//! Production code uses [`SystemClock`]; tests inject a [`VirtualClock`] and
//! advance it explicitly instead of waiting on real delays.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

/// A source of timestamps and delays.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock time backed by the tokio timer.
#[derive(Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

struct Sleeper {
    deadline: Duration,
    notify: Arc<Notify>,
}

struct VirtualState {
    elapsed: Duration,
    sleepers: Vec<Sleeper>,
}

/// Manually-advanced clock for deterministic tests.
///
/// `sleep` suspends until `advance` has moved virtual time past the sleeper's
/// deadline. Zero-duration sleeps complete immediately.
pub struct VirtualClock {
    epoch: DateTime<Utc>,
    state: Mutex<VirtualState>,
}

impl VirtualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            epoch: Utc::now(),
            state: Mutex::new(VirtualState {
                elapsed: Duration::ZERO,
                sleepers: Vec::new(),
            }),
        })
    }

    /// Move virtual time forward, waking every sleeper whose deadline passed.
    pub fn advance(&self, duration: Duration) {
        let due: Vec<Arc<Notify>> = {
            let mut state = self.state.lock().expect("virtual clock lock poisoned");
            state.elapsed += duration;
            let elapsed = state.elapsed;
            let (due, pending): (Vec<_>, Vec<_>) = state
                .sleepers
                .drain(..)
                .partition(|s| s.deadline <= elapsed);
            state.sleepers = pending;
            due.into_iter().map(|s| s.notify).collect()
        };
        // Notify outside the lock; a permit is stored if the sleeper has not
        // started waiting yet.
        for notify in due {
            notify.notify_one();
        }
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().expect("virtual clock lock poisoned").elapsed
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        self.epoch + chrono::Duration::from_std(self.elapsed()).unwrap_or_default()
    }

    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let notify = {
            let mut state = self.state.lock().expect("virtual clock lock poisoned");
            let notify = Arc::new(Notify::new());
            state.sleepers.push(Sleeper {
                deadline: state.elapsed + duration,
                notify: Arc::clone(&notify),
            });
            notify
        };
        notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_sleep_completes_immediately() {
        let clock = VirtualClock::new();
        clock.sleep(Duration::ZERO).await;
    }

    #[tokio::test]
    async fn sleep_wakes_after_advance() {
        let clock = VirtualClock::new();
        let sleeper = {
            let clock = Arc::clone(&clock);
            tokio::spawn(async move {
                clock.sleep(Duration::from_millis(600)).await;
            })
        };

        // Let the sleeper register, then release it.
        tokio::task::yield_now().await;
        clock.advance(Duration::from_millis(599));
        tokio::task::yield_now().await;
        assert!(!sleeper.is_finished());

        clock.advance(Duration::from_millis(1));
        sleeper.await.unwrap();
    }

    #[tokio::test]
    async fn advance_before_sleep_is_not_lost() {
        let clock = VirtualClock::new();

        // A sleeper registered and immediately released before it polls.
        let handle = {
            let clock = Arc::clone(&clock);
            tokio::spawn(async move {
                clock.sleep(Duration::from_millis(10)).await;
            })
        };
        tokio::task::yield_now().await;
        clock.advance(Duration::from_millis(10));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn now_tracks_virtual_time() {
        let clock = VirtualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(4));
        assert_eq!(clock.now() - start, chrono::Duration::seconds(4));
    }
}
