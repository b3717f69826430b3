mod document;
mod headless;
mod layout;
mod terminal;

#[cfg(test)]
mod tests;

pub use headless::HeadlessPage;
pub use layout::{HitTarget, PageLayout, SectionSpan};
pub use terminal::TerminalPage;
