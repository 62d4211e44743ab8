//! CLI module - argument parsing, logging setup and the run command

pub mod args;
pub mod completions;
pub mod logging;
pub mod run;

pub use args::{Cli, GlobalOpts};
