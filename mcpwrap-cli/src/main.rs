//! mcpwrap CLI - generate MCP servers from Python web API source.
//!
//! Commands:
//! - `mcpwrap scan <path>`: scan the source tree and write the scaffold
//! - `mcpwrap endpoints <path>`: scan and print endpoints and tools as JSON
//! - `mcpwrap init [output]`: write a blank server with sample tools
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use mcpwrap::commands::{run_endpoints, run_init, run_scan};
use mcpwrap::{Cli, Commands};
use mcpwrap_config::{ConfigOverrides, DocumentFormat};
use tracing_subscriber::EnvFilter;

/// Filter applied by `--debug`, covering every pipeline crate.
const DEBUG_FILTER: &str = "mcpwrap=debug,mcpwrap_config=debug,mcpwrap_scanner=debug,\
                            mcpwrap_schema=debug,mcpwrap_emitter=debug";

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(dispatch_command(cli));
}

/// Dispatch a parsed CLI to the appropriate command handler.
fn dispatch_command(cli: Cli) -> i32 {
    let result = match cli.command {
        Commands::Scan {
            path,
            output,
            server,
        } => run_scan(&path, &output, &server.overrides()),
        Commands::Endpoints { path } => run_endpoints(&path),
        Commands::Init {
            output,
            name,
            format,
        } => run_init(
            &output,
            &ConfigOverrides {
                name,
                format: format.map(DocumentFormat::from),
                ..ConfigOverrides::default()
            },
        ),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}
