mod core;
mod event_bus;
mod event_loop;
mod handle;
mod terminal_session;


pub use core::TourEngine;
pub use event_loop::TourRuntime;
pub use handle::TourHandle;
pub use terminal_session::{TerminalSession, TerminalSurface};

pub(crate) use event_loop::clock_now;
