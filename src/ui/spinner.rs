//! Spin badge: while the wheel turns, the pane's top border shows a
//! ticking frame and the name currently passing under the pointer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

pub struct SpinIndicator<'a> {
    pub tick: u64,
    /// Name under the pointer; `None` hides the badge.
    pub passing: Option<&'a str>,
}

impl Widget for SpinIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(name) = self.passing else {
            return;
        };
        if area.width < 12 || area.height == 0 {
            return;
        }

        let frame = FRAMES[(self.tick as usize) % FRAMES.len()];
        let badge = format!(" {frame} {name} ");
        // Keep one border cell on each side.
        let max = area.width.saturating_sub(4) as usize;
        let badge: String = badge.chars().take(max).collect();
        let width = badge.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(width + 2);

        let style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        buf.set_line(x, area.y, &Line::from(Span::styled(badge, style)), width);
    }
}
