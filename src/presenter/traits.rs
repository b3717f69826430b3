use crossterm::event::Event;

use crate::error::AppResult;
use crate::event::{InteractionKind, TourCommand};
use crate::tour::{Phase, TargetRef, TourStep};

/// Snapshot handed to the host for its status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourStatus {
    pub phase: Phase,
    pub current_index: usize,
    pub step_count: usize,
    pub step_label: Option<String>,
    pub manual_override: bool,
}

/// What a host made of one raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostInput {
    pub interaction: Option<InteractionKind>,
    pub command: Option<TourCommand>,
    pub quit: bool,
}

/// The page the tour drives. Implemented by the host, consumed by the scheduler.
///
/// Offsets are in the host's own scroll unit (pixels in a browser, rows in a terminal).
pub trait PresentationAdapter {
    fn render_hotspot_overlay(&mut self, step: &TourStep);
    fn clear_hotspot_overlay(&mut self);
    fn render_workflow_highlight(&mut self, step: &TourStep);

    fn render_finale_highlight(&mut self, item: usize, label: &str) {
        let _ = (item, label);
    }

    fn clear_highlights(&mut self) {}

    /// Scroll offset that brings `target` into view, or `None` when it isn't mounted.
    fn locate(&self, target: &TargetRef) -> Option<f64>;
    fn scroll_offset(&self) -> f64;
    fn set_scroll_offset(&mut self, offset: f64);
    fn max_scroll_offset(&self) -> f64;

    fn navigate_to(&mut self, route: &str) -> AppResult<()>;

    fn handle_input(&mut self, event: &Event) -> HostInput {
        let _ = event;
        HostInput::default()
    }

    fn present(&mut self, status: &TourStatus) -> AppResult<()> {
        let _ = status;
        Ok(())
    }
}
