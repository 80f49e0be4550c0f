//! Terminal output.
//!
//! The computed version goes to stdout and nothing else does, so build
//! scripts can capture it directly. Status and errors go to stderr.

use console::style;

use crate::version::VersionData;

/// What to print on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Version name only, e.g. `1.2.523`
    #[default]
    Name,
    /// Version code only, e.g. `500`
    Code,
    /// Code and name separated by a space
    Both,
}

/// Render a version for stdout.
pub fn format_version(version: &VersionData, format: OutputFormat) -> String {
    match format {
        OutputFormat::Name => version.version_name.clone(),
        OutputFormat::Code => version.version_code.to_string(),
        OutputFormat::Both => format!("{} {}", version.version_code, version.version_name),
    }
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_generated(generator_name: &str, version: &VersionData) {
    eprintln!(
        "{} {} from {}",
        style("✓").green(),
        style(version).bold(),
        generator_name
    );
}
