use std::time::Instant;

use crate::tour::{Phase, StepId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    HotspotClick,
    CardClick,
    OverlayClose,
    PointerMove,
    KeyPress,
    Touch,
}

impl InteractionKind {
    /// Clicks that open a user overlay and take control away from the tour.
    pub fn is_explicit_open(self) -> bool {
        matches!(self, Self::HotspotClick | Self::CardClick)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HotspotClick => "hotspot-click",
            Self::CardClick => "card-click",
            Self::OverlayClose => "overlay-close",
            Self::PointerMove => "pointer-move",
            Self::KeyPress => "key-press",
            Self::Touch => "touch",
        }
    }
}

/// A visitor action. Never produced by the tour itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub timestamp: Instant,
}

impl InteractionEvent {
    pub fn new(kind: InteractionKind, timestamp: Instant) -> Self {
        Self { kind, timestamp }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    HotspotClick,
    CardClick,
    Control,
}

impl PauseReason {
    pub fn from_interaction(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::CardClick => Self::CardClick,
            InteractionKind::HotspotClick => Self::HotspotClick,
            _ => Self::Control,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    OverlayClosed,
    Inactivity,
    Control,
}

/// Explicit tour controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourCommand {
    Start,
    Pause,
    Resume,
    Stop,
    Restart,
}

/// Observable record of what the tour did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourEvent {
    PhaseChanged { from: Phase, to: Phase },
    StepShown { index: usize, id: StepId },
    StepSkipped { index: usize, id: StepId },
    Paused { index: usize, reason: PauseReason },
    Resumed { index: usize, source: ResumeSource },
    FinaleItemHighlighted { item: usize },
    FinaleAborted,
    Navigated { route: String },
    NavigationFailed { route: String },
}

/// Everything the runtime loop reacts to besides its own timers.
#[derive(Debug)]
pub(crate) enum DomainEvent {
    Input(crossterm::event::Event),
    InputError(String),
    Interaction(InteractionEvent),
    Command(TourCommand),
    Shutdown,
}
