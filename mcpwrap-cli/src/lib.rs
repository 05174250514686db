//! mcpwrap command-line interface.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, FormatArg, ServerArgs};
