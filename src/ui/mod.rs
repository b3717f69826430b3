mod chrome;
mod layout;
mod overlay;

pub use chrome::draw_chrome;
pub use layout::{UiLayout, split_layout};
pub use overlay::{OverlayOrigin, OverlayView, draw_highlight_banner, draw_step_overlay};

pub(crate) use overlay::wrap_text;
