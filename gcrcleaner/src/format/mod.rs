use humansize::{BINARY, format_size};
use libgcrcleaner::ManifestEntry;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::str::FromStr;
use std::sync::OnceLock;
use tabled::Tabled;

/// Trait for diagnostics that can be TTY-aware or plain text
///
/// Both methods write to stderr; stdout carries only the listing.
pub trait OutputFormatter: Send + Sync {
    /// Print an error message
    fn error(&self, message: &str);

    /// Print a warning message
    fn warning(&self, message: &str);
}

/// TTY-aware formatter with colors
pub struct TtyFormatter;

impl OutputFormatter for TtyFormatter {
    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    }
}

/// Plain text formatter for non-TTY output (piped, scripted)
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    fn warning(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }
}

/// Create the appropriate formatter based on TTY and environment
pub fn create_formatter() -> Box<dyn OutputFormatter> {
    if std::env::var("NO_COLOR").is_ok() || !std::io::stderr().is_terminal() {
        Box::new(PlainFormatter)
    } else {
        Box::new(TtyFormatter)
    }
}

static FORMATTER: OnceLock<Box<dyn OutputFormatter>> = OnceLock::new();

fn get_formatter() -> &'static dyn OutputFormatter {
    FORMATTER.get_or_init(create_formatter).as_ref()
}

/// Print an error message with optional coloring
pub fn error(message: &str) {
    get_formatter().error(message);
}

/// Print a warning message with optional coloring
pub fn warning(message: &str) {
    get_formatter().warning(message);
}

/// Output format for the manifest listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Pretty,
    /// JSON array
    Json,
    /// YAML sequence
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!(
                "unknown output format '{}' (expected pretty, json or yaml)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// One table row of the pretty listing.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ManifestRow {
    #[tabled(rename = "DIGEST")]
    pub digest: String,

    #[tabled(rename = "CREATED")]
    pub created: String,

    #[tabled(rename = "UPLOADED")]
    pub uploaded: String,

    #[tabled(rename = "SIZE")]
    pub size: String,

    #[tabled(rename = "TAGS")]
    pub tags: String,

    #[tabled(rename = "MEDIA TYPE")]
    pub media_type: String,
}

impl From<&ManifestEntry> for ManifestRow {
    fn from(entry: &ManifestEntry) -> Self {
        let info = &entry.info;
        Self {
            digest: entry.digest.clone(),
            created: format_time(&info.created),
            uploaded: format_time(&info.uploaded),
            size: if info.size == 0 {
                "N/A".to_string()
            } else {
                format_size(info.size, BINARY)
            },
            tags: if info.tags.is_empty() {
                "<untagged>".to_string()
            } else {
                info.tags.join(", ")
            },
            media_type: info.media_type.clone(),
        }
    }
}

fn format_time(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Renders the ordered listing of `repository` in `format`.
pub fn render_entries(
    entries: &[ManifestEntry],
    format: OutputFormat,
    repository: &str,
) -> Result<String, String> {
    match format {
        OutputFormat::Pretty => {
            if entries.is_empty() {
                return Ok(format!(
                    "No manifests found for repository '{}'.",
                    repository
                ));
            }
            use tabled::{Table, settings::Style};
            let rows: Vec<ManifestRow> = entries.iter().map(ManifestRow::from).collect();
            Ok(Table::new(&rows).with(Style::empty()).to_string())
        }
        OutputFormat::Json => serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(entries)
            .map_err(|e| format!("Failed to serialize to YAML: {}", e)),
    }
}

/// Writes the rendered listing followed by a newline.
///
/// A closed pipe is reported as an error instead of panicking.
pub fn write_output<W: Write>(out: &mut W, output: &str) -> io::Result<()> {
    writeln!(out, "{}", output)?;
    out.flush()
}
