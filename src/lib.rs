// Crate root library declaration and module exports.
pub mod cli;
pub mod client;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod controller;
pub mod loader;
pub mod logging;
pub mod model;
pub mod selection;
pub mod store;
pub mod system;

#[cfg(feature = "tui")]
pub mod tui;
