pub mod catalog;
mod context;
mod dwell;
mod finale;
mod registry;
mod scheduler;
mod step;

#[cfg(test)]
mod tests;

pub use catalog::Catalog;
pub use context::{Phase, TourContext};
pub use dwell::{dwell_for, workflow_dwell};
pub use registry::StepRegistry;
pub use scheduler::TourScheduler;
pub use step::{StepContent, StepId, StepKind, TargetRef, TourStep};
