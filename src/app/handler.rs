//! Input handling — maps key events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Action;
use crate::core::share;

use super::state::{ActiveView, AppState};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    match state.active_view {
        ActiveView::Wheel => handle_wheel_action(state, action),
        ActiveView::ResultDialog => handle_dialog_action(state, action),
    }
}

// ── Wheel view ──────────────────────────────────────────────────

fn handle_wheel_action(state: &mut AppState, action: Action) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Spin => request_spin(state),
        Action::NextGroup | Action::PrevGroup => {
            if state.workflow.is_spinning() || state.groups.is_empty() {
                return;
            }
            let n = state.groups.len();
            state.group_selected = if action == Action::NextGroup {
                (state.group_selected + 1) % n
            } else {
                (state.group_selected + n - 1) % n
            };
            state.rebuild_workflow();
            state.status_message = None;
        }
        Action::ResetSelections => {
            if state.workflow.is_spinning() {
                return;
            }
            let Some(id) = state.selected_group().map(|g| g.id.clone()) else {
                return;
            };
            match state.store.reset_selections(&id) {
                Ok(_) => {
                    state.status_message = Some("Selections cleared".into());
                    refresh(state);
                }
                Err(e) => state.status_message = Some(format!("Reset failed: {e}")),
            }
        }
        Action::Share => {
            let Some(group) = state.selected_group() else {
                return;
            };
            let message =
                match share::encode_group_url(&state.config.share_base_url, &group.to_request()) {
                    Ok(link) => link,
                    Err(e) => format!("Share failed: {e}"),
                };
            state.status_message = Some(message);
        }
        Action::DeleteGroup => {
            if state.workflow.is_spinning() {
                return;
            }
            let Some((id, name)) = state.selected_group().map(|g| (g.id.clone(), g.name.clone()))
            else {
                return;
            };
            match state.store.delete_group(&id) {
                Ok(_) => {
                    state.status_message = Some(format!("Deleted {name}"));
                    refresh(state);
                }
                Err(e) => state.status_message = Some(format!("Delete failed: {e}")),
            }
        }
        Action::Select | Action::Absent | Action::Cancel => {}
    }
}

// ── Result dialog ───────────────────────────────────────────────

fn handle_dialog_action(state: &mut AppState, action: Action) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Select => {
            let picked = state.workflow.outcome().map(|c| c.name.clone());
            let group_id = state.selected_group().map(|g| g.id.clone());
            if let (Some(name), Some(id)) = (picked, group_id) {
                match state.store.select_person(&id, &name) {
                    Ok(_) => {
                        tracing::info!(group = %id, person = %name, "selection persisted");
                        state.status_message = Some(format!("{name} selected"));
                    }
                    Err(e) => state.status_message = Some(format!("Saving failed: {e}")),
                }
            }
            close_dialog(state);
            refresh(state);
        }
        Action::Absent => {
            if let Some(gone) = state.workflow.remove_outcome() {
                state.status_message = Some(format!("{} is absent, spinning again", gone.name));
            }
            close_dialog(state);
            request_spin(state);
        }
        Action::Cancel => close_dialog(state),
        _ => {}
    }
}

fn close_dialog(state: &mut AppState) {
    state.active_view = ActiveView::Wheel;
    state.workflow.reset();
}

/// Draw a winner and queue the animation; refusals only touch the status bar.
fn request_spin(state: &mut AppState) {
    match state.workflow.begin_spin(&mut state.random) {
        Ok(ticket) => state.pending_spin = Some(ticket),
        Err(rejected) => {
            tracing::debug!(%rejected, "spin refused");
            state.status_message = Some(rejected.to_string());
        }
    }
}

fn refresh(state: &mut AppState) {
    if let Err(e) = state.refresh_groups() {
        state.status_message = Some(format!("Reload failed: {e}"));
    }
}
