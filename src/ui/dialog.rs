//! Result dialog — shows the winner and the three ways out.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

pub struct ResultDialog<'a> {
    pub winner: &'a str,
    pub group_name: &'a str,
    pub config: &'a AppConfig,
}

impl Widget for ResultDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(46, 9, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.group_name))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let key = |action| {
            Span::styled(
                self.config.short_binding(action),
                Style::default().fg(Color::Yellow),
            )
        };
        let lines = vec![
            Line::raw(""),
            Line::styled("The wheel picked", Theme::hint_style()),
            Line::from(Span::styled(
                format!(" {} ", self.winner),
                Theme::highlighted_style(),
            )),
            Line::raw(""),
            Line::from(vec![
                key(Action::Select),
                Span::raw(" select   "),
                key(Action::Absent),
                Span::raw(" absent   "),
                key(Action::Cancel),
                Span::raw(" cancel"),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
