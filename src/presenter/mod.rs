mod traits;

pub use traits::{HostInput, PresentationAdapter, TourStatus};
