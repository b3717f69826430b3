use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::DomainEvent;

/// Background producers feeding the runtime's domain event channel.
#[derive(Default)]
pub(crate) struct EventBusRuntime {
    tasks: Vec<JoinHandle<()>>,
}

impl EventBusRuntime {
    pub(crate) fn spawn_terminal_input(&mut self, tx: UnboundedSender<DomainEvent>) {
        self.tasks.push(spawn_input_task(tx));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for EventBusRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_input_task(tx: UnboundedSender<DomainEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut terminal_input = EventStream::new();
        while let Some(next) = terminal_input.next().await {
            let forwarded = match next {
                Ok(event) if reaches_page(&event) => DomainEvent::Input(event),
                Ok(_) => continue,
                Err(err) => DomainEvent::InputError(err.to_string()),
            };
            if tx.send(forwarded).is_err() {
                return;
            }
        }
        debug!("terminal input stream ended");
    })
}

/// Focus and paste events never touch the page.
fn reaches_page(event: &Event) -> bool {
    matches!(event, Event::Key(_) | Event::Mouse(_) | Event::Resize(..))
}
