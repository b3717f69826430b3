use std::time::Instant;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::event::{DomainEvent, InteractionEvent, TourCommand, TourEvent};
use crate::presenter::PresentationAdapter;
use crate::tour::Phase;

use super::core::TourEngine;
use super::event_bus::EventBusRuntime;
use super::handle::TourHandle;

/// Drives a [`TourEngine`] from one task: domain events, engine wakeups and the
/// inactivity poll all funnel through a single `select!`.
pub struct TourRuntime {
    engine: TourEngine,
    loop_event_tx: UnboundedSender<DomainEvent>,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    event_bus: EventBusRuntime,
    observer: Option<UnboundedSender<TourEvent>>,
    exit_on_completion: bool,
}

enum WaitEvent {
    Event(DomainEvent),
    Wake,
    InactivityTick,
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

/// Current time on the runtime clock. Follows tokio's clock so paused-time tests line up.
pub(crate) fn clock_now() -> Instant {
    time::Instant::now().into_std()
}

impl TourRuntime {
    pub fn new(engine: TourEngine) -> Self {
        let (loop_event_tx, loop_event_rx) = unbounded_channel();
        Self {
            engine,
            loop_event_tx,
            loop_event_rx,
            event_bus: EventBusRuntime::default(),
            observer: None,
            exit_on_completion: false,
        }
    }

    /// Forwards every [`TourEvent`] to `observer` as it happens.
    pub fn with_observer(mut self, observer: UnboundedSender<TourEvent>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Return from [`TourRuntime::run`] once the tour is idle or stopped again.
    pub fn exit_on_completion(mut self, exit: bool) -> Self {
        self.exit_on_completion = exit;
        self
    }

    /// Feeds crossterm terminal events into the loop. Needs a tokio runtime.
    pub fn with_terminal_input(mut self) -> Self {
        self.event_bus
            .spawn_terminal_input(self.loop_event_tx.clone());
        self
    }

    pub fn handle(&self) -> TourHandle {
        TourHandle::new(self.loop_event_tx.clone())
    }

    pub fn engine(&self) -> &TourEngine {
        &self.engine
    }

    /// Mounts the tour on `adapter` and runs it until shutdown, quit, or completion.
    ///
    /// Mounting starts the tour. Leaving tears it down whatever phase it is in.
    pub async fn run(&mut self, adapter: &mut dyn PresentationAdapter) -> AppResult<()> {
        let poll_interval = self.engine.inactivity_poll_interval();
        let mut inactivity_tick =
            time::interval_at(time::Instant::now() + poll_interval, poll_interval);
        inactivity_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            steps = self.engine.status().step_count,
            terminal_input = !self.event_bus.is_empty(),
            "tour mounted"
        );
        self.engine
            .handle_command(TourCommand::Start, adapter, clock_now());

        let result = loop {
            let now = clock_now();
            self.engine.poll(adapter, now);
            self.forward_events();
            if let Err(err) = adapter.present(&self.engine.status()) {
                break Err(err);
            }
            if self.exit_on_completion && matches!(self.engine.phase(), Phase::Idle | Phase::Stopped)
            {
                debug!(phase = %self.engine.phase(), "tour finished, leaving runtime");
                break Ok(());
            }

            let wake = self.engine.next_wakeup(now);
            let waited =
                wait_next_event(&mut self.loop_event_rx, &mut inactivity_tick, wake).await;
            if matches!(self.handle_waited_event(waited, adapter), LoopControl::Break) {
                break Ok(());
            }
        };

        self.engine.teardown();
        self.event_bus.shutdown();
        self.forward_events();
        info!(phase = %self.engine.phase(), "tour unmounted");
        result
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        adapter: &mut dyn PresentationAdapter,
    ) -> LoopControl {
        let now = clock_now();
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let input = adapter.handle_input(&event);
                if input.quit {
                    return LoopControl::Break;
                }
                if let Some(kind) = input.interaction {
                    self.engine
                        .handle_interaction(InteractionEvent::new(kind, now), adapter, now);
                }
                if let Some(command) = input.command {
                    self.engine.handle_command(command, adapter, now);
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                warn!(error = %message, "terminal input error");
            }
            WaitEvent::Event(DomainEvent::Interaction(event)) => {
                self.engine.handle_interaction(event, adapter, now);
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                debug!(?command, "tour command");
                self.engine.handle_command(command, adapter, now);
            }
            WaitEvent::Event(DomainEvent::Shutdown) | WaitEvent::Closed => {
                return LoopControl::Break;
            }
            WaitEvent::Wake => {}
            WaitEvent::InactivityTick => self.engine.poll_inactivity(adapter, now),
        }
        LoopControl::Continue
    }

    fn forward_events(&mut self) {
        let events = self.engine.drain_events();
        let Some(observer) = self.observer.as_ref() else {
            return;
        };
        for event in events {
            if observer.send(event).is_err() {
                debug!("tour observer dropped");
                self.observer = None;
                return;
            }
        }
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    inactivity_tick: &mut time::Interval,
    wake: Option<Instant>,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        _ = sleep_until_wakeup(wake) => WaitEvent::Wake,
        _ = inactivity_tick.tick() => WaitEvent::InactivityTick,
    }
}

async fn sleep_until_wakeup(wake: Option<Instant>) {
    match wake {
        Some(deadline) => time::sleep_until(time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}
