//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Group list on the left, wheel on the right, status bar at the bottom.
pub struct AppLayout {
    pub groups_area: Rect,
    pub wheel_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // main panes
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(rows[0]);

        Self {
            groups_area: panes[0],
            wheel_area: panes[1],
            status_area: rows[1],
        }
    }
}
