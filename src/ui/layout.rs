use ratatui::layout::{Constraint, Layout, Rect};

/// The page viewport above a one-row status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub page: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let [page, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
    UiLayout { page, status }
}

/// Shrinks a `width` x `height` request to fit `area`, never below one cell.
fn fit(area: Rect, width: u16, height: u16) -> (u16, u16) {
    (width.clamp(1, area.width.max(1)), height.clamp(1, area.height.max(1)))
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let (width, height) = fit(area, width, height);
    Rect::new(
        area.x + (area.width - width.min(area.width)) / 2,
        area.y + (area.height - height.min(area.height)) / 2,
        width,
        height,
    )
}

/// A box hugging the bottom edge of `area`, centered horizontally.
pub(crate) fn bottom_rect(area: Rect, width: u16, height: u16) -> Rect {
    let (width, height) = fit(area, width, height);
    Rect::new(
        area.x + (area.width - width.min(area.width)) / 2,
        area.bottom().saturating_sub(height),
        width,
        height,
    )
}
