//! Wheel widget — draws the candidate segments on a braille canvas and
//! lights up the currently highlighted one.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Paragraph, Widget,
    },
};

use crate::core::geometry::{polar_to_cartesian, wheel_segments};
use crate::core::workflow::{SelectionWorkflow, SpinPhase};

use super::theme::Theme;

const OUTER_RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.68;
const CENTER_RADIUS: f64 = 0.2;
const MAX_LABEL_CHARS: usize = 12;

pub struct WheelWidget<'a> {
    workflow: &'a SelectionWorkflow,
    block: Option<Block<'a>>,
}

impl<'a> WheelWidget<'a> {
    pub fn new(workflow: &'a SelectionWorkflow) -> Self {
        Self {
            workflow,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for WheelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(b) => b.inner(area),
            None => area,
        };
        if let Some(block) = self.block {
            block.render(area, buf);
        }
        if inner.width < 8 || inner.height < 4 {
            return;
        }

        let candidates = self.workflow.candidates();
        if candidates.is_empty() {
            Paragraph::new("No one left on the wheel")
                .style(Theme::hint_style())
                .alignment(Alignment::Center)
                .render(
                    Rect {
                        y: inner.y + inner.height / 2,
                        height: 1,
                        ..inner
                    },
                    buf,
                );
            return;
        }

        // Terminal cells are roughly twice as tall as wide; widen the x span
        // so the circle stays round.
        let aspect = inner.width as f64 / (inner.height as f64 * 2.0);
        let (x_half, y_half) = if aspect >= 1.0 {
            (1.15 * aspect, 1.15)
        } else {
            (1.15, 1.15 / aspect)
        };
        let units_per_col = 2.0 * x_half / inner.width as f64;

        let dist = self.workflow.distribution();
        let segments = wheel_segments(dist.weights(), dist.total());
        let highlighted = self.workflow.highlighted();
        let landed = self.workflow.phase() == SpinPhase::Done;
        let count = candidates.len();

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-x_half, x_half])
            .y_bounds([-y_half, y_half])
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: OUTER_RADIUS,
                    color: Theme::rim_color(),
                });
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: CENTER_RADIUS,
                    color: Theme::rim_color(),
                });
                if count > 1 {
                    for seg in &segments {
                        let (x0, y0) = to_canvas(polar_to_cartesian(
                            0.0,
                            0.0,
                            CENTER_RADIUS,
                            seg.start_angle,
                        ));
                        let (x1, y1) =
                            to_canvas(polar_to_cartesian(0.0, 0.0, OUTER_RADIUS, seg.start_angle));
                        let color = Theme::segment_color(seg.idx, count);
                        ctx.draw(&CanvasLine::new(x0, y0, x1, y1, color));
                    }
                }
                // Pointer at twelve o'clock.
                ctx.draw(&CanvasLine::new(
                    0.0,
                    OUTER_RADIUS + 0.12,
                    0.0,
                    OUTER_RADIUS - 0.05,
                    Theme::pointer_color(),
                ));

                ctx.layer();
                for seg in &segments {
                    let name = truncate(&candidates[seg.idx].name, MAX_LABEL_CHARS);
                    let (x, y) =
                        to_canvas(polar_to_cartesian(0.0, 0.0, LABEL_RADIUS, seg.mid_angle()));
                    let half_width = name.chars().count() as f64 * units_per_col / 2.0;
                    let style = if highlighted == Some(seg.idx) && landed {
                        Theme::highlighted_style().add_modifier(Modifier::REVERSED)
                    } else if highlighted == Some(seg.idx) {
                        Theme::highlighted_style()
                    } else {
                        Style::default().fg(Theme::segment_color(seg.idx, count))
                    };
                    ctx.print(x - half_width, y, Line::from(Span::styled(name, style)));
                }
            });

        canvas.render(inner, buf);
    }
}

/// Geometry is y-down; the canvas is y-up.
fn to_canvas((x, y): (f64, f64)) -> (f64, f64) {
    (x, -y)
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut s: String = name.chars().take(max - 1).collect();
        s.push('…');
        s
    }
}
