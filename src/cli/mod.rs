//! CLI module for the gemini-bgremove library
//!
//! This module is only available when the "cli" feature is enabled.

mod config;
#[path = "main.rs"]
mod main_impl;

pub use main_impl::{format_view, main, Cli};
