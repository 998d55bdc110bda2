//! Runs the spin animator on a tokio task and feeds its steps back to the
//! main loop.
//!
//! Every message carries the generation of the spin that produced it;
//! anything from an older generation is dropped on arrival.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::core::animator::{self, SpinOutcome, TokioScheduler};
use crate::core::workflow::SpinTicket;

use super::state::{ActiveView, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinUpdate {
    Step(usize),
    Finished,
}

pub type SpinMessage = (u64, SpinUpdate);

/// Handle to an in-flight animation task.
pub struct SpinHandle {
    cancel: Arc<AtomicBool>,
}

impl SpinHandle {
    /// Stop at the next suspension point.  No `Finished` is sent.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Bump the generation and spawn the animator for `ticket`.
pub fn start_spin(
    state: &mut AppState,
    ticket: SpinTicket,
    tx: &UnboundedSender<SpinMessage>,
) -> SpinHandle {
    state.spin_generation = state.spin_generation.wrapping_add(1);
    let generation = state.spin_generation;
    tracing::debug!(generation, target_index = ticket.target(), "starting spin task");
    state.status_message = Some(format!(
        "Spinning… {:.1}s",
        ticket.plan.total_duration().as_secs_f64()
    ));
    let cancel = Arc::new(AtomicBool::new(false));

    let tx = tx.clone();
    let task_cancel = Arc::clone(&cancel);
    tokio::spawn(async move {
        let outcome = animator::run(
            &ticket.plan,
            &TokioScheduler,
            |idx| {
                let _ = tx.send((generation, SpinUpdate::Step(idx)));
            },
            Some(task_cancel.as_ref()),
        )
        .await;
        if outcome == SpinOutcome::Completed {
            let _ = tx.send((generation, SpinUpdate::Finished));
        }
    });

    SpinHandle { cancel }
}

/// Apply one animator message.  Returns `true` when the spin landed.
pub fn apply_spin_update(state: &mut AppState, generation: u64, update: SpinUpdate) -> bool {
    if generation != state.spin_generation {
        return false;
    }
    match update {
        SpinUpdate::Step(idx) => {
            state.workflow.apply_step(idx);
            false
        }
        SpinUpdate::Finished => {
            let Some(winner) = state.workflow.finish_spin() else {
                return false;
            };
            state.status_message = Some(format!("The wheel picked {}", winner.name));
            state.active_view = ActiveView::ResultDialog;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::group::{GroupCreateRequest, Person};
    use crate::core::selector::SystemRandom;
    use crate::core::store::GroupStore;

    fn state(dir: &tempfile::TempDir) -> AppState {
        let mut store = GroupStore::open(dir.path().join("groups.json"));
        store
            .create_group(GroupCreateRequest {
                id: Some("g".into()),
                name: "pair".into(),
                respect_early_selection: false,
                people: vec![Person::new("ana", 1.0), Person::new("bo", 1.0)],
            })
            .unwrap();
        let mut config = AppConfig::default();
        config.timing.initial_delay = std::time::Duration::from_millis(1);
        config.timing.increment_phase1 = std::time::Duration::ZERO;
        config.timing.increment_phase2 = std::time::Duration::ZERO;
        AppState::new(store, config, SystemRandom::seeded(1)).unwrap()
    }

    #[tokio::test]
    async fn task_steps_then_lands() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut st = state(&dir);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let ticket = st.workflow.begin_spin(&mut st.random).unwrap();
        let target = ticket.target();
        let _handle = start_spin(&mut st, ticket, &tx);

        let mut steps = 0;
        while let Some((generation, update)) = rx.recv().await {
            if matches!(update, SpinUpdate::Step(_)) {
                steps += 1;
            }
            if apply_spin_update(&mut st, generation, update) {
                break;
            }
        }
        assert_eq!(steps, 3 * 2 + target + 1);
        assert_eq!(st.workflow.highlighted(), Some(target));
        assert_eq!(st.active_view, ActiveView::ResultDialog);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut st = state(&dir);
        st.workflow.begin_spin(&mut st.random).unwrap();
        st.spin_generation = 4;

        assert!(!apply_spin_update(&mut st, 3, SpinUpdate::Finished));
        assert!(st.workflow.is_spinning());

        apply_spin_update(&mut st, 4, SpinUpdate::Step(1));
        assert_eq!(st.workflow.highlighted(), Some(1));
    }

    #[tokio::test]
    async fn cancelled_spin_never_finishes() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut st = state(&dir);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let ticket = st.workflow.begin_spin(&mut st.random).unwrap();
        let handle = start_spin(&mut st, ticket, &tx);
        handle.cancel();
        drop(tx);

        while let Some((_, update)) = rx.recv().await {
            assert_ne!(update, SpinUpdate::Finished);
        }
    }
}
