use std::time::{Duration, Instant};

use tracing::debug;

use crate::event::{InteractionEvent, InteractionKind, PauseReason};
use crate::tour::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Ignore,
    Pause(PauseReason),
    ResumeScheduled { at: Instant },
}

/// Turns explicit visitor actions into pause and resume requests.
#[derive(Debug)]
pub struct InteractionGate {
    manual_override: bool,
    resume_due_at: Option<Instant>,
    grace: Duration,
}

impl InteractionGate {
    pub fn new(grace: Duration) -> Self {
        Self {
            manual_override: false,
            resume_due_at: None,
            grace,
        }
    }

    pub fn on_interaction(&mut self, event: &InteractionEvent, phase: Phase) -> GateDecision {
        match event.kind {
            InteractionKind::HotspotClick | InteractionKind::CardClick => match phase {
                Phase::Running | Phase::Paused => {
                    self.manual_override = true;
                    self.resume_due_at = None;
                    if phase == Phase::Paused {
                        GateDecision::Ignore
                    } else {
                        GateDecision::Pause(PauseReason::from_interaction(event.kind))
                    }
                }
                // Aborts the Finale without holding an override.
                Phase::Finale => GateDecision::Pause(PauseReason::from_interaction(event.kind)),
                // Nothing to pause before the first step.
                _ => GateDecision::Ignore,
            },
            InteractionKind::OverlayClose if self.manual_override => {
                self.manual_override = false;
                let at = event.timestamp + self.grace;
                self.resume_due_at = Some(at);
                debug!(grace_ms = self.grace.as_millis() as u64, "resume scheduled after overlay close");
                GateDecision::ResumeScheduled { at }
            }
            _ => GateDecision::Ignore,
        }
    }

    /// Returns true once when the grace delay after an overlay close has elapsed.
    pub fn take_due_resume(&mut self, now: Instant) -> bool {
        match self.resume_due_at {
            Some(at) if at <= now => {
                self.resume_due_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.resume_due_at
    }

    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    /// Forgets any user overlay and pending resume.
    pub fn reset(&mut self) {
        self.manual_override = false;
        self.resume_due_at = None;
    }
}
