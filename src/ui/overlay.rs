use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::layout::{bottom_rect, centered_rect};

/// Who opened an overlay. The tour's overlays sit at the bottom, a visitor's is modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOrigin {
    Tour,
    Visitor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub title: String,
    pub body: String,
    pub bullets: Vec<String>,
    pub origin: OverlayOrigin,
}

pub fn draw_step_overlay(frame: &mut Frame<'_>, area: Rect, view: &OverlayView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(64);
    let inner_width = popup_width.saturating_sub(4) as usize;
    let lines = overlay_lines(view, inner_width);
    let popup_height = (lines.len() as u16).saturating_add(2).min(area.height);
    let popup = match view.origin {
        OverlayOrigin::Tour => bottom_rect(area, popup_width, popup_height),
        OverlayOrigin::Visitor => centered_rect(area, popup_width, popup_height),
    };
    frame.render_widget(Clear, popup);

    let (border, hint) = match view.origin {
        OverlayOrigin::Tour => (Color::Cyan, " tour "),
        OverlayOrigin::Visitor => (Color::Yellow, " esc to close "),
    };
    let block = Block::default()
        .title(format!(" {} ", view.title))
        .title_bottom(hint)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width < 2 || inner.height == 0 {
        return;
    }
    let padded = Rect::new(inner.x + 1, inner.y, inner.width - 1, inner.height);
    frame.render_widget(Paragraph::new(lines), padded);
}

/// Highlighted banner naming the finale item on show.
pub fn draw_highlight_banner(frame: &mut Frame<'_>, area: Rect, label: &str) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let width = (label.width() as u16).saturating_add(6).min(area.width);
    let popup = centered_rect(area, width, 3);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    let text = Paragraph::new(Line::from(Span::styled(
        label.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .centered();
    frame.render_widget(text, inner);
}

fn overlay_lines(view: &OverlayView, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = wrap_text(&view.body, width)
        .into_iter()
        .map(Line::from)
        .collect();
    if !view.bullets.is_empty() {
        lines.push(Line::default());
        for bullet in &view.bullets {
            for (idx, row) in wrap_text(bullet, width.saturating_sub(2))
                .into_iter()
                .enumerate()
            {
                let marker = if idx == 0 { "• " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::DarkGray)),
                    Span::raw(row),
                ]));
            }
        }
    }
    lines
}

/// Greedy word wrap on display width. Words wider than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let gap = usize::from(!current.is_empty());
        if current_width + gap + word_width <= width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }
        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}
