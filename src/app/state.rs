//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use crate::config::AppConfig;
use crate::core::{
    group::Group,
    selector::SystemRandom,
    store::{GroupStore, StoreResult},
    workflow::{SelectionWorkflow, SpinTicket},
};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Wheel,
    /// Spin finished; the winner waits for select / absent / cancel.
    ResultDialog,
}

/// Top-level application state.
pub struct AppState {
    pub store: GroupStore,
    /// Snapshot of the stored groups, refreshed after every write.
    pub groups: Vec<Group>,
    /// Index into `groups` of the group on the wheel.
    pub group_selected: usize,
    /// Spin session for the selected group.
    pub workflow: SelectionWorkflow,
    pub config: AppConfig,
    pub random: SystemRandom,
    pub active_view: ActiveView,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Accepted spin waiting for the main loop to start the animator.
    pub pending_spin: Option<SpinTicket>,
    /// Monotonic id used to ignore updates from abandoned spins.
    pub spin_generation: u64,
    /// Tick counter (drives the spin indicator).
    pub tick: u64,
}

impl AppState {
    pub fn new(store: GroupStore, config: AppConfig, random: SystemRandom) -> StoreResult<Self> {
        let workflow = SelectionWorkflow::new(Vec::new(), config.timing);
        let mut state = Self {
            store,
            groups: Vec::new(),
            group_selected: 0,
            workflow,
            config,
            random,
            active_view: ActiveView::default(),
            status_message: None,
            should_quit: false,
            pending_spin: None,
            spin_generation: 0,
            tick: 0,
        };
        state.refresh_groups()?;
        Ok(state)
    }

    pub fn selected_group(&self) -> Option<&Group> {
        self.groups.get(self.group_selected)
    }

    /// Put the group with `id` on the wheel, if it exists.
    pub fn select_group_id(&mut self, id: &str) {
        if let Some(idx) = self.groups.iter().position(|g| g.id == id) {
            self.group_selected = idx;
            self.rebuild_workflow();
        }
    }

    /// Reload groups from the store and rebuild the wheel, keeping the
    /// same group selected when it still exists.
    pub fn refresh_groups(&mut self) -> StoreResult<()> {
        let keep = self.selected_group().map(|g| g.id.clone());
        self.groups = self.store.fetch_groups()?.to_vec();
        self.group_selected = keep
            .and_then(|id| self.groups.iter().position(|g| g.id == id))
            .unwrap_or(0)
            .min(self.groups.len().saturating_sub(1));
        self.rebuild_workflow();
        Ok(())
    }

    /// Fresh session from the selected group's available people.
    pub fn rebuild_workflow(&mut self) {
        let candidates = self
            .selected_group()
            .map(|g| g.candidates())
            .unwrap_or_default();
        self.workflow = SelectionWorkflow::new(candidates, self.config.timing);
    }
}
