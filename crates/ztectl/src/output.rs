//! Output formatting: table, JSON, YAML.
//!
//! Table uses `tabled`, structured formats serialize the data via serde.

use std::io::{self, Write};

use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use tabled::{Table, Tabled, settings::Style};

use ztectl_core::{PollUpdate, Section, Snapshot};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Number of keys previewed per section in the table view.
const KEY_PREVIEW: usize = 4;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering goes through `detail_fn`, since detail views don't use
/// the `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
    let _ = stdout.flush();
}

// ── Snapshot views ───────────────────────────────────────────────────

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    section: &'static str,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Keys")]
    keys: String,
}

fn key_preview(map: &Map<String, Value>) -> String {
    if map.is_empty() {
        return "-".into();
    }
    let mut preview = map
        .keys()
        .take(KEY_PREVIEW)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if map.len() > KEY_PREVIEW {
        preview.push_str(", ...");
    }
    preview
}

/// Per-section field counts and leading keys.
pub fn snapshot_table(snapshot: &Snapshot) -> String {
    let rows: Vec<SectionRow> = Section::iter()
        .map(|section| {
            let map = snapshot.section(section);
            SectionRow {
                section: section.as_str(),
                fields: map.len(),
                keys: key_preview(map),
            }
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_snapshot(format: OutputFormat, snapshot: &Snapshot) -> Result<String, CliError> {
    render_single(format, snapshot, snapshot_table)
}

pub fn render_update(format: OutputFormat, update: &PollUpdate) -> Result<String, CliError> {
    render_single(format, update, |u| {
        let state = match (u.reachable, u.authenticated) {
            (false, _) => "unreachable",
            (true, true) => "authenticated",
            (true, false) => "anonymous",
        };
        format!(
            "cycle {} at {} ({state})\n{}",
            u.cycle,
            u.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
            snapshot_table(&u.snapshot)
        )
    })
}
