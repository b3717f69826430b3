mod gate;
mod inactivity;

pub use gate::{GateDecision, InteractionGate};
pub use inactivity::InactivityMonitor;
