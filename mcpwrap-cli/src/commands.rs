//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use mcpwrap_common::Diagnostic;
use mcpwrap_config::{load_configuration, ConfigOverrides, McpWrapConfig};
use mcpwrap_emitter::Emitter;
use mcpwrap_scanner::{Endpoint, ScanOutput, ScanReport, Scanner};
use mcpwrap_schema::{synthesize, SynthesisReport, Tool};
use serde::Serialize;
use tracing::{info, warn};

/// Configuration for a run against `path`.
///
/// A file path resolves project configuration from its parent directory.
fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<McpWrapConfig> {
    let project_root = if path.is_file() { path.parent() } else { Some(path) };
    load_configuration(project_root, overrides).context("failed to load configuration")
}

fn scan_and_synthesize(
    path: &Path,
    config: &McpWrapConfig,
) -> Result<(ScanOutput, SynthesisReport)> {
    let output = Scanner::new(path, config.scan.clone())
        .scan()
        .with_context(|| format!("failed to scan {}", path.display()))?;
    let synthesis = synthesize(&output.endpoints);
    Ok((output, synthesis))
}

fn print_diagnostics<'a>(diagnostics: impl Iterator<Item = &'a Diagnostic>) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn print_summary(report: &ScanReport, tools: &[Tool]) {
    println!(
        "Scanned {} files ({} parsed, {} skipped) in {} ms",
        report.files_discovered, report.files_parsed, report.files_skipped, report.total_time_ms
    );
    println!(
        "Found {} endpoints and {} models",
        report.endpoints_found, report.models_registered
    );
    for tool in tools {
        println!(
            "  {:<8} {:<40} {}",
            tool.binding.method.as_str(),
            tool.binding.path,
            tool.name
        );
    }
}

/// `mcpwrap scan`
pub fn run_scan(path: &Path, output_dir: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(path, overrides)?;
    let (output, synthesis) = scan_and_synthesize(path, &config)?;

    print_diagnostics(output.report.diagnostics.iter().chain(&synthesis.diagnostics));
    print_summary(&output.report, &synthesis.tools);
    if synthesis.tools.is_empty() {
        warn!("No endpoints found under {}", path.display());
    }

    let written = Emitter::new(config.server)?.emit(&synthesis.tools, output_dir)?;
    println!(
        "Generated {} tools in {}",
        synthesis.tools.len(),
        output_dir.display()
    );
    for file in &written {
        println!("  {}", file.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct EndpointListing<'a> {
    endpoints: &'a [Endpoint],
    tools: &'a [Tool],
    report: &'a ScanReport,
}

/// `mcpwrap endpoints`
pub fn run_endpoints(path: &Path) -> Result<()> {
    let config = load_config(path, &ConfigOverrides::default())?;
    let (mut output, synthesis) = scan_and_synthesize(path, &config)?;
    output
        .report
        .diagnostics
        .extend(synthesis.diagnostics.iter().cloned());

    let listing = EndpointListing {
        endpoints: &output.endpoints,
        tools: &synthesis.tools,
        report: &output.report,
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

/// `mcpwrap init`
pub fn run_init(output_dir: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_configuration(None, overrides).context("failed to load configuration")?;
    let written = Emitter::new(config.server)?.emit_blank(output_dir)?;
    info!("Wrote {} files", written.len());
    println!("Initialized MCP server in {}", output_dir.display());
    for file in &written {
        println!("  {}", file.display());
    }
    Ok(())
}
