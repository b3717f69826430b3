use tokio::sync::mpsc::UnboundedSender;
use tokio::time;

use crate::event::{DomainEvent, InteractionEvent, InteractionKind, TourCommand};

/// Cloneable way into a running [`super::TourRuntime`].
///
/// Every method returns false once the runtime has shut down.
#[derive(Debug, Clone)]
pub struct TourHandle {
    tx: UnboundedSender<DomainEvent>,
}

impl TourHandle {
    pub(crate) fn new(tx: UnboundedSender<DomainEvent>) -> Self {
        Self { tx }
    }

    pub fn command(&self, command: TourCommand) -> bool {
        self.send(DomainEvent::Command(command))
    }

    /// Reports a visitor action stamped with the current time.
    pub fn interact(&self, kind: InteractionKind) -> bool {
        let event = InteractionEvent::new(kind, time::Instant::now().into_std());
        self.send(DomainEvent::Interaction(event))
    }

    pub fn start(&self) -> bool {
        self.command(TourCommand::Start)
    }

    pub fn pause(&self) -> bool {
        self.command(TourCommand::Pause)
    }

    pub fn resume(&self) -> bool {
        self.command(TourCommand::Resume)
    }

    pub fn stop(&self) -> bool {
        self.command(TourCommand::Stop)
    }

    pub fn restart(&self) -> bool {
        self.command(TourCommand::Restart)
    }

    /// Asks the runtime to tear the tour down and return.
    pub fn shutdown(&self) -> bool {
        self.send(DomainEvent::Shutdown)
    }

    fn send(&self, event: DomainEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}
