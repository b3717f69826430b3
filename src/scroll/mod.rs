mod animator;
mod easing;

pub use animator::{ScrollAnimation, ScrollAnimator, ScrollTick, distance_scroll_duration};
pub use easing::{Easing, ease_in_out_quad};
