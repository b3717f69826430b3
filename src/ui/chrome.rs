use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::presenter::TourStatus;
use crate::tour::Phase;

const KEY_HINTS: &str = "s start | p pause | c continue | x stop | r restart | q quit";

/// One-row status line: tour phase, current step, route and key hints.
pub fn draw_chrome(frame: &mut Frame<'_>, area: Rect, status: &TourStatus, route: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    frame.render_widget(Paragraph::new(status_line(status, route)), area);
}

pub(crate) fn status_line(status: &TourStatus, route: &str) -> Line<'static> {
    let phase_style = match status.phase {
        Phase::Running | Phase::Finale => Style::default().fg(Color::Green),
        Phase::Paused => Style::default().fg(Color::Yellow),
        Phase::Stopped => Style::default().fg(Color::Red),
        Phase::Idle | Phase::Starting | Phase::Restarting => Style::default().fg(Color::Gray),
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", status.phase.as_str().to_uppercase()),
        phase_style.reversed(),
    )];
    if let Some(label) = &status.step_label {
        let step_total = status.step_count.max(1);
        let step_now = status.current_index.saturating_add(1).min(step_total);
        spans.push(Span::raw(format!(" step {step_now}/{step_total} {label}")));
    }
    if status.manual_override {
        spans.push(Span::styled(
            " | visitor in control",
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw(format!(" | {route} | ")));
    spans.push(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
    Line::from(spans)
}
