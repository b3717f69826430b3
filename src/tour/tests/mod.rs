
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::engine::TourEngine;
use crate::error::{AppError, AppResult};
use crate::event::{InteractionEvent, InteractionKind, TourEvent};
use crate::presenter::PresentationAdapter;
use crate::tour::{Catalog, StepRegistry, TargetRef, TourStep};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    HotspotOverlay(String),
    ClearOverlay,
    WorkflowHighlight(String),
    FinaleHighlight(usize),
    ClearHighlights,
    Navigate(String),
}

pub(super) struct RecordingPage {
    pub(super) calls: Vec<Call>,
    pub(super) offset: f64,
    pub(super) max_offset: f64,
    pub(super) sections: HashMap<String, f64>,
    pub(super) unmounted: HashSet<String>,
    pub(super) fail_navigation: bool,
}

impl RecordingPage {
    pub(super) fn new() -> Self {
        let sections = [("scanner", 10.0), ("workflow", 40.0), ("advantages", 80.0)]
            .into_iter()
            .map(|(id, offset)| (id.to_string(), offset))
            .collect();
        Self {
            calls: Vec::new(),
            offset: 0.0,
            max_offset: 100.0,
            sections,
            unmounted: HashSet::new(),
            fail_navigation: false,
        }
    }

    pub(super) fn calls_since(&self, mark: usize) -> &[Call] {
        &self.calls[mark..]
    }
}

impl PresentationAdapter for RecordingPage {
    fn render_hotspot_overlay(&mut self, step: &TourStep) {
        self.calls.push(Call::HotspotOverlay(step.id.to_string()));
    }

    fn clear_hotspot_overlay(&mut self) {
        self.calls.push(Call::ClearOverlay);
    }

    fn render_workflow_highlight(&mut self, step: &TourStep) {
        self.calls.push(Call::WorkflowHighlight(step.id.to_string()));
    }

    fn render_finale_highlight(&mut self, item: usize, _label: &str) {
        self.calls.push(Call::FinaleHighlight(item));
    }

    fn clear_highlights(&mut self) {
        self.calls.push(Call::ClearHighlights);
    }

    fn locate(&self, target: &TargetRef) -> Option<f64> {
        let section = target.section_id();
        if self.unmounted.contains(section) {
            return None;
        }
        let base = *self.sections.get(section)?;
        match target {
            TargetRef::Section { .. } => Some(base),
            TargetRef::DiagramPoint { y, .. } => Some(base + f64::from(*y) * 0.1),
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn max_scroll_offset(&self) -> f64 {
        self.max_offset
    }

    fn navigate_to(&mut self, route: &str) -> AppResult<()> {
        if self.fail_navigation {
            return Err(AppError::navigation(
                route,
                AppError::unsupported("router unavailable"),
            ));
        }
        self.calls.push(Call::Navigate(route.to_string()));
        Ok(())
    }
}

pub(super) struct Harness {
    pub(super) engine: TourEngine,
    pub(super) page: RecordingPage,
    pub(super) origin: Instant,
    pub(super) now: Instant,
    pub(super) events: Vec<TourEvent>,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with_catalog(Catalog::builtin(), Config::default())
    }

    pub(super) fn with_catalog(catalog: Catalog, config: Config) -> Self {
        let now = Instant::now();
        let registry = StepRegistry::build(&catalog, &config.tour);
        Self {
            engine: TourEngine::new(registry, &config, now),
            page: RecordingPage::new(),
            origin: now,
            now,
            events: Vec::new(),
        }
    }

    /// Instant `offset_ms` after the harness was built.
    pub(super) fn at(&self, offset_ms: u64) -> Instant {
        self.origin + Duration::from_millis(offset_ms)
    }

    /// Follows the engine's own wakeups up to `until`.
    pub(super) fn advance_to(&mut self, until: Instant) {
        self.advance_while(until, |_| true);
    }

    pub(super) fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Advances until `done` holds or `limit` is reached. Returns whether `done` held.
    pub(super) fn advance_until(
        &mut self,
        limit: Duration,
        mut done: impl FnMut(&Harness) -> bool,
    ) -> bool {
        let until = self.now + limit;
        let mut reached = false;
        self.advance_while(until, |harness| {
            reached = done(harness);
            !reached
        });
        reached
    }

    fn advance_while(&mut self, until: Instant, mut keep_going: impl FnMut(&Harness) -> bool) {
        let mut guard = 0usize;
        loop {
            self.engine.poll(&mut self.page, self.now);
            self.collect_events();
            if !keep_going(self) {
                return;
            }
            match self.engine.next_wakeup(self.now) {
                Some(next) if next <= until => {
                    assert!(next > self.now, "engine asked to wake up in the past");
                    self.now = next;
                }
                _ => break,
            }
            guard += 1;
            assert!(guard < 1_000_000, "engine never settled");
        }
        self.now = self.now.max(until);
        self.engine.poll(&mut self.page, self.now);
        self.collect_events();
    }

    pub(super) fn interact(&mut self, kind: InteractionKind) {
        let event = InteractionEvent::new(kind, self.now);
        self.engine.handle_interaction(event, &mut self.page, self.now);
        self.collect_events();
    }

    pub(super) fn command(&mut self, command: crate::event::TourCommand) {
        self.engine.handle_command(command, &mut self.page, self.now);
        self.collect_events();
    }

    pub(super) fn poll_inactivity(&mut self) {
        self.engine.poll_inactivity(&mut self.page, self.now);
        self.collect_events();
    }

    pub(super) fn collect_events(&mut self) {
        self.events.extend(self.engine.drain_events());
    }

    pub(super) fn shown_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TourEvent::StepShown { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }
}
