use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::event::{InteractionEvent, PauseReason, ResumeSource, TourCommand, TourEvent};
use crate::interaction::{GateDecision, InactivityMonitor, InteractionGate};
use crate::presenter::{PresentationAdapter, TourStatus};
use crate::tour::{Phase, StepRegistry, TourContext, TourScheduler};

/// Single entry point for everything that happens to a tour.
///
/// Interaction Gate and Inactivity Monitor only decide; every state change goes through
/// the scheduler.
pub struct TourEngine {
    scheduler: TourScheduler,
    gate: InteractionGate,
    monitor: InactivityMonitor,
}

impl TourEngine {
    pub fn new(registry: StepRegistry, config: &Config, now: Instant) -> Self {
        Self {
            scheduler: TourScheduler::new(registry, config, now),
            gate: InteractionGate::new(config.gate.resume_grace()),
            monitor: InactivityMonitor::new(
                config.inactivity.timeout(),
                config.inactivity.poll_interval(),
            ),
        }
    }

    pub fn scheduler(&self) -> &TourScheduler {
        &self.scheduler
    }

    pub fn context(&self) -> &TourContext {
        self.scheduler.context()
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub fn manual_override(&self) -> bool {
        self.gate.manual_override()
    }

    pub fn inactivity_poll_interval(&self) -> Duration {
        self.monitor.poll_interval()
    }

    pub fn handle_interaction(
        &mut self,
        event: InteractionEvent,
        adapter: &mut dyn PresentationAdapter,
        now: Instant,
    ) {
        self.scheduler.record_interaction(event.timestamp);
        match self.gate.on_interaction(&event, self.scheduler.phase()) {
            GateDecision::Pause(reason) => self.scheduler.pause(reason, adapter, now),
            GateDecision::ResumeScheduled { .. } | GateDecision::Ignore => {}
        }
        self.sync_override();
    }

    pub fn handle_command(
        &mut self,
        command: TourCommand,
        adapter: &mut dyn PresentationAdapter,
        now: Instant,
    ) {
        match command {
            TourCommand::Start => self.scheduler.start(now),
            TourCommand::Pause => self.scheduler.pause(PauseReason::Control, adapter, now),
            TourCommand::Resume => self.resume(ResumeSource::Control, adapter, now),
            TourCommand::Stop => {
                self.gate.reset();
                self.scheduler.stop(adapter);
            }
            TourCommand::Restart => {
                self.gate.reset();
                self.scheduler.restart(adapter, now);
            }
        }
        self.sync_override();
    }

    /// Fires the gate's delayed resume and every scheduler wait due at `now`.
    pub fn poll(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.gate.take_due_resume(now) {
            self.sync_override();
            self.resume(ResumeSource::OverlayClosed, adapter, now);
        }
        self.scheduler.poll(adapter, now);
    }

    /// Runs on the inactivity polling interval.
    pub fn poll_inactivity(&mut self, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.monitor.should_resume(self.scheduler.context(), now) {
            info!(
                timeout_ms = self.monitor.timeout().as_millis() as u64,
                "visitor idle, resuming tour"
            );
            self.resume(ResumeSource::Inactivity, adapter, now);
        }
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        match (self.scheduler.next_wakeup(now), self.gate.next_deadline()) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        }
    }

    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        self.scheduler.drain_events()
    }

    pub fn status(&self) -> TourStatus {
        let registry = self.scheduler.registry();
        let index = self.scheduler.current_index();
        let step_label = match self.scheduler.phase() {
            Phase::Running | Phase::Paused | Phase::Finale => {
                registry.get(index).map(|step| step.label().to_string())
            }
            _ => None,
        };
        TourStatus {
            phase: self.scheduler.phase(),
            current_index: index,
            step_count: registry.len(),
            step_label,
            manual_override: self.gate.manual_override(),
        }
    }

    pub fn teardown(&mut self) {
        self.gate.reset();
        self.scheduler.teardown();
    }

    /// Clears the visitor's overlay left over from the pause, then resumes.
    fn resume(&mut self, source: ResumeSource, adapter: &mut dyn PresentationAdapter, now: Instant) {
        if self.scheduler.phase() != Phase::Paused {
            return;
        }
        if self.gate.manual_override() {
            adapter.clear_hotspot_overlay();
        }
        self.gate.reset();
        self.sync_override();
        self.scheduler.resume(source, adapter, now);
    }

    fn sync_override(&mut self) {
        self.scheduler
            .set_scroll_suppressed(self.gate.manual_override());
    }
}
