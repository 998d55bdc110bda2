//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── wheel ──────────────────────────────────────────────────
    /// Evenly spaced hues, one per segment.
    pub fn segment_color(idx: usize, count: usize) -> Color {
        let hue = 360.0 * idx as f64 / count.max(1) as f64;
        hsl_to_rgb(hue, 0.70, 0.60)
    }

    pub fn highlighted_style() -> Style {
        Style::default()
            .fg(Color::Rgb(0x33, 0x33, 0x33))
            .bg(Color::Rgb(0xff, 0xd7, 0x00))
            .add_modifier(Modifier::BOLD)
    }

    pub fn rim_color() -> Color {
        Color::Rgb(0x88, 0x88, 0x88)
    }

    pub fn pointer_color() -> Color {
        Color::Rgb(0xff, 0x98, 0x00)
    }

    // ── group list ─────────────────────────────────────────────
    pub fn group_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn picked_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}

/// `h` in degrees, `s` and `l` in `0..=1`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hues_wrap_the_colour_wheel() {
        assert_eq!(hsl_to_rgb(0.0, 0.70, 0.60), Color::Rgb(224, 82, 82));
        assert_eq!(hsl_to_rgb(120.0, 0.70, 0.60), Color::Rgb(82, 224, 82));
        assert_eq!(Theme::segment_color(0, 0), Theme::segment_color(0, 1));
    }
}
