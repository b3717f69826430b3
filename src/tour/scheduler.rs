use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{Config, ScrollConfig, TourConfig};
use crate::event::{PauseReason, ResumeSource, TourEvent};
use crate::presenter::PresentationAdapter;
use crate::scroll::{ScrollAnimation, ScrollAnimator, ScrollTick};

use super::context::{Beat, Continuation, PendingWait, Phase, TourContext, WaitKind};
use super::dwell::dwell_for;
use super::registry::StepRegistry;
use super::step::{StepKind, TargetRef};

/// Offsets closer than this count as already in view.
const SCROLL_EPSILON: f64 = 0.5;

/// Drives a tour run: owns the [`TourContext`] and every timer and scroll the run waits on.
///
/// The scheduler never sleeps. Hosts call [`TourScheduler::poll`] at or after
/// [`TourScheduler::next_wakeup`] and the scheduler fires whatever fell due.
pub struct TourScheduler {
    pub(crate) registry: StepRegistry,
    pub(crate) tour: TourConfig,
    pub(crate) scroll: ScrollConfig,
    pub(crate) home_route: String,
    pub(crate) ctx: TourContext,
    pub(crate) animator: ScrollAnimator,
    scroll_suppressed: bool,
    outbox: Vec<TourEvent>,
}

impl TourScheduler {
    pub fn new(registry: StepRegistry, config: &Config, now: Instant) -> Self {
        Self {
            registry,
            tour: config.tour.clone(),
            scroll: config.scroll.clone(),
            home_route: config.page.home_route.clone(),
            ctx: TourContext::new(now),
            animator: ScrollAnimator::new(config.scroll.frame_interval()),
            scroll_suppressed: false,
            outbox: Vec::new(),
        }
    }

    pub fn context(&self) -> &TourContext {
        &self.ctx
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase
    }

    pub fn current_index(&self) -> usize {
        self.ctx.current_index
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// While set, steps are rendered where the page already is instead of scrolled to.
    pub fn set_scroll_suppressed(&mut self, suppressed: bool) {
        self.scroll_suppressed = suppressed;
    }

    pub fn record_interaction(&mut self, at: Instant) {
        self.ctx.last_interaction_at = self.ctx.last_interaction_at.max(at);
    }

    pub fn start(&mut self, now: Instant) {
        if self.ctx.phase != Phase::Idle {
            debug!(phase = %self.ctx.phase, "start ignored");
            return;
        }
        self.ctx.bump_epoch();
        self.ctx.current_index = 0;
        self.set_phase(Phase::Starting);
        self.arm_timer(self.tour.preroll_delay(), now, Continuation::Preroll);
    }

    pub fn pause(&mut self, reason: PauseReason, adapter: &mut dyn PresentationAdapter, now: Instant) {
        match self.ctx.phase {
            Phase::Running => {
                self.cancel_pending();
                self.ctx.bump_epoch();
                self.ctx.paused_at = Some(now);
                self.set_phase(Phase::Paused);
                info!(index = self.ctx.current_index, ?reason, "tour paused");
                self.outbox.push(TourEvent::Paused {
                    index: self.ctx.current_index,
                    reason,
                });
            }
            Phase::Finale => self.abort_finale(adapter, Phase::Idle),
            Phase::Paused => {}
            phase => debug!(%phase, "pause ignored"),
        }
    }

    pub fn resume(&mut self, source: ResumeSource, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.ctx.phase != Phase::Paused {
            debug!(phase = %self.ctx.phase, "resume ignored");
            return;
        }
        self.ctx.paused_at = None;
        self.set_phase(Phase::Running);
        info!(index = self.ctx.current_index, ?source, "tour resumed");
        self.outbox.push(TourEvent::Resumed {
            index: self.ctx.current_index,
            source,
        });
        match self.ctx.beat {
            Beat::Reveal => self.reveal_current(adapter, now),
            Beat::Dwell => self.show_current(adapter, now),
            Beat::Gap => self.arm_timer(self.tour.inter_step_gap(), now, Continuation::Advance),
        }
    }

    pub fn stop(&mut self, adapter: &mut dyn PresentationAdapter) {
        if matches!(self.ctx.phase, Phase::Idle | Phase::Stopped) {
            debug!(phase = %self.ctx.phase, "stop ignored");
            return;
        }
        if self.ctx.phase == Phase::Finale {
            self.outbox.push(TourEvent::FinaleAborted);
        }
        self.cancel_pending();
        self.ctx.bump_epoch();
        self.ctx.is_restarting = false;
        self.ctx.paused_at = None;
        self.ctx.current_index = 0;
        self.ctx.beat = Beat::Reveal;
        adapter.clear_hotspot_overlay();
        adapter.clear_highlights();
        self.set_phase(Phase::Stopped);
        info!("tour stopped");
    }

    pub fn restart(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.ctx.phase == Phase::Finale {
            self.outbox.push(TourEvent::FinaleAborted);
        }
        self.cancel_pending();
        self.ctx.bump_epoch();
        self.ctx.is_restarting = true;
        self.ctx.paused_at = None;
        self.ctx.current_index = 0;
        self.ctx.beat = Beat::Reveal;
        adapter.clear_hotspot_overlay();
        adapter.clear_highlights();
        adapter.set_scroll_offset(0.0);
        self.set_phase(Phase::Restarting);
        info!("tour restarting");
        self.arm_timer(self.tour.preroll_delay(), now, Continuation::Preroll);
    }

    /// Cancels everything; the host page is going away.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.ctx.bump_epoch();
        self.ctx.is_restarting = false;
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        let timer = self.ctx.pending_deadline();
        let frame = self.animator.next_frame_at(now);
        match (timer, frame) {
            (Some(timer), Some(frame)) => Some(timer.min(frame)),
            (timer, frame) => timer.or(frame),
        }
    }

    /// Applies the current animation frame and fires every wait that is due at `now`.
    pub fn poll(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        while self.fire_due(adapter, now) {}
    }

    fn fire_due(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) -> bool {
        if let ScrollTick::Completed { token, offset } = self.apply_frame(adapter, now)
            && let Some(wait) = self.ctx.pending
            && wait.kind == WaitKind::Scroll
            && wait.token == token
        {
            debug!(offset, "scroll settled");
            self.ctx.pending = None;
            self.resolve(wait, adapter, now);
            return true;
        }

        match self.ctx.pending {
            Some(wait) if matches!(wait.kind, WaitKind::Timer { deadline } if deadline <= now) => {
                self.ctx.pending = None;
                self.resolve(wait, adapter, now);
                true
            }
            _ => false,
        }
    }

    fn apply_frame(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) -> ScrollTick {
        let tick = self.animator.tick(now);
        match tick {
            ScrollTick::Frame { offset } | ScrollTick::Completed { offset, .. } => {
                adapter.set_scroll_offset(offset);
            }
            ScrollTick::Idle => {}
        }
        tick
    }

    fn resolve(&mut self, wait: PendingWait, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if !self.ctx.accepts(&wait) {
            debug!(token = wait.token, "stale continuation dropped");
            return;
        }
        match wait.then {
            Continuation::Preroll => self.on_preroll_elapsed(adapter, now),
            Continuation::ShowStep => self.show_current(adapter, now),
            Continuation::DwellElapsed => self.on_dwell_elapsed(adapter, now),
            Continuation::Advance => self.advance(adapter, now),
            Continuation::Finale(stage) => self.run_finale_stage(stage, adapter, now),
        }
    }

    fn on_preroll_elapsed(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        self.ctx.is_restarting = false;
        self.ctx.current_index = 0;
        self.set_phase(Phase::Running);
        self.begin_step(adapter, now);
    }

    /// Moves to the next registry entry once a step's dwell and gap are over.
    pub(crate) fn advance(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.ctx.is_restarting || self.ctx.phase != Phase::Running {
            return;
        }
        let next = self.ctx.current_index.saturating_add(1);
        self.ctx.current_index = next.min(self.registry.finale_index());
        self.begin_step(adapter, now);
    }

    fn begin_step(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        let index = self.ctx.current_index;
        let Some(step) = self.registry.get(index) else {
            self.begin_finale(adapter, now);
            return;
        };
        if step.is_finale() {
            self.begin_finale(adapter, now);
            return;
        }
        if step.content.is_empty() {
            warn!(index, id = %step.id, "step has no content, skipping");
            self.outbox.push(TourEvent::StepSkipped {
                index,
                id: step.id.clone(),
            });
            self.advance(adapter, now);
            return;
        }
        self.reveal_current(adapter, now);
    }

    fn reveal_current(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        self.ctx.beat = Beat::Reveal;
        let Some(target) = self
            .registry
            .get(self.ctx.current_index)
            .map(|step| step.target.clone())
        else {
            return;
        };
        if self.scroll_suppressed {
            debug!(%target, "auto-scroll suppressed by visitor overlay");
            self.show_current(adapter, now);
            return;
        }
        let duration = self.scroll.section_scroll();
        if !self.scroll_element_into_view(&target, duration, adapter, now) {
            self.show_current(adapter, now);
        }
    }

    /// Starts a scroll to `target`. Returns false when there is nothing to animate.
    fn scroll_element_into_view(
        &mut self,
        target: &TargetRef,
        duration: Duration,
        adapter: &mut dyn PresentationAdapter,
        now: Instant,
    ) -> bool {
        let Some(offset) = adapter.locate(target) else {
            warn!(%target, "scroll target not mounted, treating scroll as done");
            return false;
        };
        let end = offset.clamp(0.0, adapter.max_scroll_offset().max(0.0));
        self.arm_scroll(adapter.scroll_offset(), end, duration, now, Continuation::ShowStep)
    }

    fn show_current(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        self.ctx.beat = Beat::Dwell;
        let index = self.ctx.current_index;
        let Some(step) = self.registry.get(index) else {
            return;
        };
        match step.kind {
            StepKind::Hotspot => adapter.render_hotspot_overlay(step),
            StepKind::WorkflowReveal => adapter.render_workflow_highlight(step),
            StepKind::Finale => return,
        }
        let dwell = dwell_for(step, &self.tour);
        info!(
            index,
            id = %step.id,
            kind = step.kind.as_str(),
            dwell_ms = dwell.as_millis() as u64,
            "step shown"
        );
        self.outbox.push(TourEvent::StepShown {
            index,
            id: step.id.clone(),
        });
        self.arm_timer(dwell, now, Continuation::DwellElapsed);
    }

    fn on_dwell_elapsed(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        let index = self.ctx.current_index;
        let is_hotspot = self
            .registry
            .get(index)
            .is_some_and(|step| step.kind == StepKind::Hotspot);
        if is_hotspot {
            adapter.clear_hotspot_overlay();
        }
        if self.registry.is_terminal_workflow(index) {
            self.advance(adapter, now);
            return;
        }
        self.ctx.beat = Beat::Gap;
        self.arm_timer(self.tour.inter_step_gap(), now, Continuation::Advance);
    }

    pub(crate) fn set_phase(&mut self, to: Phase) {
        let from = self.ctx.phase;
        if from == to {
            return;
        }
        self.ctx.phase = to;
        debug!(%from, %to, "phase changed");
        self.outbox.push(TourEvent::PhaseChanged { from, to });
    }

    pub(crate) fn push_event(&mut self, event: TourEvent) {
        self.outbox.push(event);
    }

    /// Replaces any outstanding wait with a timer.
    pub(crate) fn arm_timer(&mut self, delay: Duration, now: Instant, then: Continuation) {
        self.cancel_pending();
        let token = self.ctx.issue_token();
        self.ctx.pending = Some(PendingWait {
            token,
            epoch: self.ctx.epoch,
            kind: WaitKind::Timer {
                deadline: now + delay,
            },
            then,
        });
    }

    /// Replaces any outstanding wait with a scroll animation. Returns false if already there.
    pub(crate) fn arm_scroll(
        &mut self,
        start: f64,
        end: f64,
        duration: Duration,
        now: Instant,
        then: Continuation,
    ) -> bool {
        self.cancel_pending();
        if (end - start).abs() < SCROLL_EPSILON {
            return false;
        }
        let token = self.ctx.issue_token();
        self.animator
            .animate_to(ScrollAnimation::new(start, end, duration, now), token);
        self.ctx.pending = Some(PendingWait {
            token,
            epoch: self.ctx.epoch,
            kind: WaitKind::Scroll,
            then,
        });
        true
    }

    pub(crate) fn cancel_pending(&mut self) {
        if let Some(wait) = self.ctx.pending.take() {
            debug!(token = wait.token, "pending wait canceled");
        }
        self.animator.cancel();
    }
}
