pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod interaction;
pub mod logging;
pub mod page;
pub mod plan;
pub mod presenter;
pub mod scroll;
pub mod tour;
pub mod ui;
