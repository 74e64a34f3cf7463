//! Timetable CLI library.
//!
//! This crate provides the CLI interface for the timetable engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, TimetableArgs};
pub use config::Config;
