//! Spin animation — a discrete sweep around the wheel that slows down and
//! lands on a pre-chosen segment.
//!
//! The animator does not choose anything.  It is told the target index and
//! the segment count, walks `rounds * segments + target` steps highlighting
//! `step % segments`, and suspends between steps for a delay that grows once
//! the first rotation is done and grows faster after the second.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

// ───────────────────────────────────────── timing ────────────

/// Tunable constants of the deceleration curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTiming {
    /// Full extra rotations before landing.
    pub rounds: usize,
    pub initial_delay: Duration,
    /// Added at every step after the first rotation.
    pub increment_phase1: Duration,
    /// Added on top of phase 1 at every step after the second rotation.
    pub increment_phase2: Duration,
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self {
            rounds: 3,
            initial_delay: Duration::from_millis(20),
            increment_phase1: Duration::from_millis(6),
            increment_phase2: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpinError {
    #[error("cannot spin a wheel with no segments")]
    NoSegments,
    #[error("target segment {target} is outside a {segments}-segment wheel")]
    TargetOutOfRange { target: usize, segments: usize },
}

// ───────────────────────────────────────── plan ──────────────

/// One step of the sweep: which segment lights up and how long it stays lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinStep {
    pub index: usize,
    pub highlight: usize,
    pub delay: Duration,
}

/// The full, deterministic step sequence for one spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    segments: usize,
    target: usize,
    steps: usize,
    timing: SpinTiming,
}

impl SpinPlan {
    pub fn new(segments: usize, target: usize, timing: SpinTiming) -> Result<Self, SpinError> {
        if segments == 0 {
            return Err(SpinError::NoSegments);
        }
        if target >= segments {
            return Err(SpinError::TargetOutOfRange { target, segments });
        }
        Ok(Self {
            segments,
            target,
            steps: timing.rounds * segments + target,
            timing,
        })
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Index of the last step; the sweep visits `0..=steps`.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn highlight_at(&self, step: usize) -> usize {
        step % self.segments
    }

    /// Iterate every step with the delay that follows it.
    pub fn iter(&self) -> impl Iterator<Item = SpinStep> + '_ {
        let mut delay = self.timing.initial_delay;
        (0..=self.steps).map(move |i| {
            let step = SpinStep {
                index: i,
                highlight: self.highlight_at(i),
                delay,
            };
            if i > self.segments {
                delay += self.timing.increment_phase1;
            }
            if i > 2 * self.segments {
                delay += self.timing.increment_phase2;
            }
            step
        })
    }

    /// Wall time the sweep takes, for status display.
    pub fn total_duration(&self) -> Duration {
        self.iter().map(|s| s.delay).sum()
    }
}

// ───────────────────────────────────────── scheduling ────────

/// Deferred-execution primitive: resolve after `delay`.
pub trait Scheduler {
    fn defer(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Real timer on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn defer(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinOutcome {
    Completed,
    Cancelled,
}

// ───────────────────────────────────────── run loop ──────────

/// Drive `plan`, calling `on_step` with each highlighted segment and
/// suspending once per step.
///
/// On [`SpinOutcome::Completed`] the final `on_step` call carried
/// `plan.target()`.  `cancel` is polled after each suspension; `None` means
/// the spin always runs to completion.
pub async fn run<S, F>(
    plan: &SpinPlan,
    scheduler: &S,
    mut on_step: F,
    cancel: Option<&AtomicBool>,
) -> SpinOutcome
where
    S: Scheduler,
    F: FnMut(usize),
{
    tracing::debug!(
        segments = plan.segments(),
        target_index = plan.target(),
        steps = plan.steps(),
        "spin started"
    );
    for step in plan.iter() {
        tracing::trace!(step = step.index, highlight = step.highlight, "spin step");
        on_step(step.highlight);
        scheduler.defer(step.delay).await;
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            tracing::debug!(step = step.index, "spin cancelled");
            return SpinOutcome::Cancelled;
        }
    }
    SpinOutcome::Completed
}

// ───────────────────────────────────────── tests ─────────────
