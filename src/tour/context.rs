use std::fmt;
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Starting,
    Running,
    Paused,
    Finale,
    Stopped,
    Restarting,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finale => "finale",
            Self::Stopped => "stopped",
            Self::Restarting => "restarting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a running step is within its reveal, dwell, gap cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Beat {
    Reveal,
    Dwell,
    Gap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FinaleStage {
    Hold,
    Highlight(usize),
    ReturnToTop,
    Complete,
}

/// What to do when the pending wait finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    Preroll,
    ShowStep,
    DwellElapsed,
    Advance,
    Finale(FinaleStage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitKind {
    Timer { deadline: Instant },
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingWait {
    pub(crate) token: u64,
    pub(crate) epoch: u64,
    pub(crate) kind: WaitKind,
    pub(crate) then: Continuation,
}

/// The one mutable record of a tour run. Only the scheduler writes it.
#[derive(Debug, Clone)]
pub struct TourContext {
    pub(crate) phase: Phase,
    pub(crate) current_index: usize,
    pub(crate) pending: Option<PendingWait>,
    pub(crate) is_restarting: bool,
    pub(crate) last_interaction_at: Instant,
    pub(crate) paused_at: Option<Instant>,
    pub(crate) epoch: u64,
    pub(crate) beat: Beat,
    next_token: u64,
}

impl TourContext {
    pub fn new(now: Instant) -> Self {
        Self {
            phase: Phase::Idle,
            current_index: 0,
            pending: None,
            is_restarting: false,
            last_interaction_at: now,
            paused_at: None,
            epoch: 0,
            beat: Beat::Reveal,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_restarting(&self) -> bool {
        self.is_restarting
    }

    pub fn last_interaction_at(&self) -> Instant {
        self.last_interaction_at
    }

    pub fn paused_at(&self) -> Option<Instant> {
        self.paused_at
    }

    pub fn has_pending_wait(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        match self.pending?.kind {
            WaitKind::Timer { deadline } => Some(deadline),
            WaitKind::Scroll => None,
        }
    }

    pub(crate) fn issue_token(&mut self) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }

    /// Invalidates every continuation armed so far.
    pub(crate) fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Stale continuations and anything armed before a restart are inert.
    pub(crate) fn accepts(&self, wait: &PendingWait) -> bool {
        if wait.epoch != self.epoch {
            return false;
        }
        !self.is_restarting || wait.then == Continuation::Preroll
    }
}
