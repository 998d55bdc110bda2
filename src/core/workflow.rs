//! Selection workflow — candidates in, one winner out.
//!
//! Owns the candidate list for a session, the derived weight distribution
//! and the spin session state.  Only one spin may be in flight; a spin with
//! no candidates is refused.  Both refusals leave the state untouched.

use thiserror::Error;

use super::animator::{self, Scheduler, SpinOutcome, SpinPlan, SpinTiming};
use super::group::Candidate;
use super::selector::{RandomSource, WeightDistribution};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpinRejected {
    #[error("no candidates to spin")]
    NoCandidates,
    #[error("a spin is already running")]
    AlreadySpinning,
}

/// Where the session is in its `Idle → Running → Done` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Running,
    Done,
}

/// Everything needed to drive the animator for one accepted spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinTicket {
    pub plan: SpinPlan,
}

impl SpinTicket {
    pub fn target(&self) -> usize {
        self.plan.target()
    }
}

#[derive(Debug, Clone)]
pub struct SelectionWorkflow {
    candidates: Vec<Candidate>,
    distribution: WeightDistribution,
    timing: SpinTiming,
    phase: SpinPhase,
    target: Option<usize>,
    highlighted: Option<usize>,
    outcome: Option<usize>,
}

impl SelectionWorkflow {
    pub fn new(candidates: Vec<Candidate>, timing: SpinTiming) -> Self {
        let distribution = WeightDistribution::from_declared(candidates.iter().map(|c| c.weight));
        Self {
            candidates,
            distribution,
            timing,
            phase: SpinPhase::Idle,
            target: None,
            highlighted: None,
            outcome: None,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn distribution(&self) -> &WeightDistribution {
        &self.distribution
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Running
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The winner, once a spin has finished.
    pub fn outcome(&self) -> Option<&Candidate> {
        self.outcome.and_then(|i| self.candidates.get(i))
    }

    // ── lifecycle ───────────────────────────────────────────────

    /// Draw the target and enter `Running`.
    pub fn begin_spin(&mut self, random: &mut impl RandomSource) -> Result<SpinTicket, SpinRejected> {
        if self.is_spinning() {
            return Err(SpinRejected::AlreadySpinning);
        }
        if self.candidates.is_empty() {
            return Err(SpinRejected::NoCandidates);
        }

        let target = self.distribution.sample(random);
        // Non-empty candidates and an in-range target make this infallible.
        let plan = SpinPlan::new(self.candidates.len(), target, self.timing)
            .map_err(|_| SpinRejected::NoCandidates)?;

        self.phase = SpinPhase::Running;
        self.target = Some(target);
        self.highlighted = None;
        self.outcome = None;
        tracing::info!(
            target_index = target,
            candidate = %self.candidates[target].name,
            steps = plan.steps(),
            "spin accepted"
        );
        Ok(SpinTicket { plan })
    }

    /// Animator progress.  Ignored unless a spin is running.
    pub fn apply_step(&mut self, highlight: usize) {
        if self.is_spinning() {
            self.highlighted = Some(highlight);
        }
    }

    /// Land on the drawn target and expose it as the outcome.
    pub fn finish_spin(&mut self) -> Option<&Candidate> {
        if !self.is_spinning() {
            return None;
        }
        let target = self.target.take()?;
        self.highlighted = Some(target);
        self.outcome = Some(target);
        self.phase = SpinPhase::Done;
        tracing::info!(target_index = target, "spin finished");
        self.outcome()
    }

    /// Clear outcome and highlight.  A running spin is left alone.
    pub fn reset(&mut self) -> bool {
        if self.is_spinning() {
            return false;
        }
        self.phase = SpinPhase::Idle;
        self.target = None;
        self.highlighted = None;
        self.outcome = None;
        true
    }

    /// Drop the current winner from this session's candidates (they are
    /// not here today) and reset, ready for another spin.  Every entry with
    /// the winner's name leaves.
    pub fn remove_outcome(&mut self) -> Option<Candidate> {
        if self.is_spinning() {
            return None;
        }
        let removed = self.candidates.get(self.outcome?)?.clone();
        self.candidates.retain(|c| c.name != removed.name);
        self.distribution =
            WeightDistribution::from_declared(self.candidates.iter().map(|c| c.weight));
        self.reset();
        tracing::debug!(name = %removed.name, remaining = self.candidates.len(), "candidate marked absent");
        Some(removed)
    }

    /// Whole spin in one call: draw, animate on `scheduler`, land.
    pub async fn spin<S, F>(
        &mut self,
        random: &mut impl RandomSource,
        scheduler: &S,
        on_step: F,
    ) -> Result<Candidate, SpinRejected>
    where
        S: Scheduler,
        F: FnMut(usize),
    {
        let ticket = self.begin_spin(random)?;
        let outcome = animator::run(&ticket.plan, scheduler, on_step, None).await;
        debug_assert_eq!(outcome, SpinOutcome::Completed);
        let winner = self.finish_spin().cloned();
        winner.ok_or(SpinRejected::NoCandidates)
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::animator::tests::RecordingScheduler;
    use crate::core::selector::tests::SequenceSource;

    fn people(spec: &[(&str, f64)]) -> Vec<Candidate> {
        spec.iter()
            .map(|&(name, weight)| Candidate {
                name: name.to_string(),
                weight,
            })
            .collect()
    }

    fn workflow() -> SelectionWorkflow {
        SelectionWorkflow::new(
            people(&[("ana", 1.0), ("bo", 1.0), ("cy", 2.0)]),
            SpinTiming::default(),
        )
    }

    #[tokio::test]
    async fn spin_lands_on_drawn_candidate() {
        let mut wf = workflow();
        let mut src = SequenceSource::new(vec![0.625]);
        let mut steps = Vec::new();

        let winner = wf
            .spin(&mut src, &RecordingScheduler::default(), |i| steps.push(i))
            .await
            .unwrap();

        assert_eq!(winner.name, "cy");
        assert_eq!(steps.len(), 3 * 3 + 2 + 1);
        assert_eq!(steps.last(), Some(&2));
        assert_eq!(wf.highlighted(), Some(2));
        assert_eq!(wf.phase(), SpinPhase::Done);
        assert_eq!(wf.outcome().map(|c| c.name.as_str()), Some("cy"));
    }

    #[test]
    fn second_spin_while_running_is_refused() {
        let mut wf = workflow();
        let mut src = SequenceSource::new(vec![0.1, 0.9]);

        let first = wf.begin_spin(&mut src).unwrap();
        assert_eq!(first.target(), 0);
        wf.apply_step(1);

        assert_eq!(wf.begin_spin(&mut src), Err(SpinRejected::AlreadySpinning));
        // The active spin is unaffected.
        assert_eq!(wf.highlighted(), Some(1));
        assert_eq!(wf.finish_spin().map(|c| c.name.clone()), Some("ana".into()));
    }

    #[test]
    fn empty_candidates_are_refused_without_state_change() {
        let mut wf = SelectionWorkflow::new(Vec::new(), SpinTiming::default());
        let mut src = SequenceSource::new(vec![0.5]);
        assert_eq!(wf.begin_spin(&mut src), Err(SpinRejected::NoCandidates));
        assert_eq!(wf.phase(), SpinPhase::Idle);
        assert_eq!(wf.highlighted(), None);
        assert!(wf.outcome().is_none());
    }

    #[tokio::test]
    async fn empty_spin_emits_no_steps() {
        let mut wf = SelectionWorkflow::new(Vec::new(), SpinTiming::default());
        let mut src = SequenceSource::new(vec![0.5]);
        let mut calls = 0;
        let res = wf
            .spin(&mut src, &RecordingScheduler::default(), |_| calls += 1)
            .await;
        assert_eq!(res.err(), Some(SpinRejected::NoCandidates));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn reset_clears_outcome_but_keeps_weights() {
        let mut wf = workflow();
        let before = wf.candidates().to_vec();
        let mut src = SequenceSource::new(vec![0.3]);
        wf.spin(&mut src, &RecordingScheduler::default(), |_| {})
            .await
            .unwrap();

        assert!(wf.reset());
        assert!(wf.outcome().is_none());
        assert_eq!(wf.highlighted(), None);
        assert_eq!(wf.phase(), SpinPhase::Idle);
        assert_eq!(wf.candidates(), before.as_slice());
        assert_eq!(wf.distribution().total(), 4.0);
    }

    #[test]
    fn reset_during_spin_is_ignored() {
        let mut wf = workflow();
        let mut src = SequenceSource::new(vec![0.3]);
        wf.begin_spin(&mut src).unwrap();
        assert!(!wf.reset());
        assert!(wf.is_spinning());
    }

    #[test]
    fn steps_outside_a_spin_are_ignored() {
        let mut wf = workflow();
        wf.apply_step(2);
        assert_eq!(wf.highlighted(), None);
        assert!(wf.finish_spin().is_none());
    }

    #[tokio::test]
    async fn absent_winner_is_removed_for_the_session() {
        let mut wf = workflow();
        let mut src = SequenceSource::new(vec![0.625, 0.0]);
        let scheduler = RecordingScheduler::default();
        wf.spin(&mut src, &scheduler, |_| {}).await.unwrap();

        let gone = wf.remove_outcome().unwrap();
        assert_eq!(gone.name, "cy");
        assert_eq!(wf.candidates().len(), 2);
        assert_eq!(wf.distribution().total(), 2.0);
        assert_eq!(wf.phase(), SpinPhase::Idle);

        let next = wf.spin(&mut src, &scheduler, |_| {}).await.unwrap();
        assert_eq!(next.name, "ana");
    }

    #[tokio::test]
    async fn absent_removes_every_entry_with_that_name() {
        let mut wf = SelectionWorkflow::new(
            people(&[("ana", 1.0), ("bo", 1.0), ("ana", 2.0)]),
            SpinTiming::default(),
        );
        // 0.1 * 4 = 0.4 → first "ana".
        let mut src = SequenceSource::new(vec![0.1]);
        let scheduler = RecordingScheduler::default();
        wf.spin(&mut src, &scheduler, |_| {}).await.unwrap();

        let gone = wf.remove_outcome().unwrap();
        assert_eq!(gone.name, "ana");
        assert_eq!(wf.candidates(), &people(&[("bo", 1.0)])[..]);
        assert_eq!(wf.distribution().total(), 1.0);
    }
}
