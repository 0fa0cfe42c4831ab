pub mod common;
pub mod config;
pub mod elevation;
pub mod env;
pub mod folders;
pub mod identifiers;
pub mod menu;
pub mod merge;
pub mod registry;
pub mod reset;
pub mod tasks;
#[cfg(windows)]
mod wide;
