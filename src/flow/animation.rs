//! Animated transition state machine.
//!
//! Serializes visible step changes into two time-boxed phases so state
//! mutation (performed at the midpoint) is never visible mid-animation, and
//! rapid repeated input cannot overlap two transitions. A transition always
//! runs to completion once started; there is no cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use crate::clock::Clock;

/// Visible phase of a step transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPhase {
    Idle,
    Exiting,
    Entering,
}

/// Direction of a transition. Only the visual treatment differs; the phase
/// sequence is identical both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Timer-driven two-phase transition controller.
pub struct AnimationController {
    phase_tx: watch::Sender<AnimationPhase>,
    transitioning: AtomicBool,
    clock: Arc<dyn Clock>,
    phase_duration: Duration,
}

impl AnimationController {
    pub fn new(clock: Arc<dyn Clock>, phase_duration: Duration) -> Self {
        let (phase_tx, _) = watch::channel(AnimationPhase::Idle);
        Self {
            phase_tx,
            transitioning: AtomicBool::new(false),
            clock,
            phase_duration,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> AnimationPhase {
        *self.phase_tx.borrow()
    }

    /// True for the full exit-and-enter round trip.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::SeqCst)
    }

    /// Observe phase changes (for a rendering layer).
    pub fn subscribe(&self) -> watch::Receiver<AnimationPhase> {
        self.phase_tx.subscribe()
    }

    /// Run one two-phase transition, invoking `mutate` at the midpoint.
    /// Returns false without any effect when a transition is already running.
    pub async fn run<F: FnOnce()>(&self, direction: Direction, mutate: F) -> bool {
        if self
            .transitioning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        tracing::debug!(?direction, "Step transition started");
        self.phase_tx.send_replace(AnimationPhase::Exiting);
        self.clock.sleep(self.phase_duration).await;

        // Midpoint: the old step is fully hidden, the new one not yet shown.
        mutate();

        self.phase_tx.send_replace(AnimationPhase::Entering);
        self.clock.sleep(self.phase_duration).await;

        self.phase_tx.send_replace(AnimationPhase::Idle);
        self.transitioning.store(false, Ordering::SeqCst);
        true
    }

    pub async fn run_forward<F: FnOnce()>(&self, mutate: F) -> bool {
        self.run(Direction::Forward, mutate).await
    }

    pub async fn run_backward<F: FnOnce()>(&self, mutate: F) -> bool {
        self.run(Direction::Backward, mutate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;
    use std::sync::atomic::AtomicU32;

    const PHASE: Duration = Duration::from_millis(600);

    #[tokio::test]
    async fn transition_walks_exit_mutate_enter_idle() {
        let clock = VirtualClock::new();
        let animation = Arc::new(AnimationController::new(
            clock.clone() as Arc<dyn Clock>,
            PHASE,
        ));
        let mutated = Arc::new(AtomicBool::new(false));

        let handle = {
            let animation = Arc::clone(&animation);
            let mutated = Arc::clone(&mutated);
            tokio::spawn(async move {
                animation
                    .run_forward(|| mutated.store(true, Ordering::SeqCst))
                    .await
            })
        };

        tokio::task::yield_now().await;
        assert_eq!(animation.phase(), AnimationPhase::Exiting);
        assert!(animation.is_transitioning());
        assert!(!mutated.load(Ordering::SeqCst));

        clock.advance(PHASE);
        tokio::task::yield_now().await;
        assert_eq!(animation.phase(), AnimationPhase::Entering);
        assert!(mutated.load(Ordering::SeqCst));
        assert!(animation.is_transitioning());

        clock.advance(PHASE);
        assert!(handle.await.unwrap());
        assert_eq!(animation.phase(), AnimationPhase::Idle);
        assert!(!animation.is_transitioning());
    }

    #[tokio::test]
    async fn second_transition_is_rejected_while_running() {
        let clock = VirtualClock::new();
        let animation = Arc::new(AnimationController::new(
            clock.clone() as Arc<dyn Clock>,
            PHASE,
        ));
        let calls = Arc::new(AtomicU32::new(0));

        let first = {
            let animation = Arc::clone(&animation);
            let calls = Arc::clone(&calls);
            tokio::spawn(
                async move { animation.run_forward(|| { calls.fetch_add(1, Ordering::SeqCst); }).await },
            )
        };
        tokio::task::yield_now().await;

        // Mid-transition calls return false and never run their mutation.
        assert!(!animation.run_backward(|| { calls.fetch_add(10, Ordering::SeqCst); }).await);

        clock.advance(PHASE);
        tokio::task::yield_now().await;
        clock.advance(PHASE);
        assert!(first.await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_duration_phases_complete_inline() {
        let clock = VirtualClock::new();
        let animation = AnimationController::new(clock as Arc<dyn Clock>, Duration::ZERO);
        let mut ran = false;
        assert!(animation.run_backward(|| ran = true).await);
        assert!(ran);
        assert_eq!(animation.phase(), AnimationPhase::Idle);
    }
}
