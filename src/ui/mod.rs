//! Terminal output helpers for the CLI.
//!
//! Colored status lines, a spinner for in-flight lookups and a metadata
//! table. Nothing here is used by the library API.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::models::{DetectedInput, Metadata};
use crate::utils::{format_access_date, CitationStyle};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print the detected input kind with its icon.
pub fn print_detected(detected: &DetectedInput) {
    println!(
        "{} {} {}",
        detected.kind.icon(),
        detected.kind.label().bold(),
        detected.value.dimmed()
    );
}

/// Print a citation under a style heading.
pub fn print_citation(style: CitationStyle, citation: &str) {
    println!("{}", style.to_string().yellow().bold());
    println!("  {}", citation);
}

/// Print the fields of a record as a table.
pub fn print_metadata_table(metadata: &Metadata) {
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    let mut row = |field: &str, value: String| {
        table.add_row(vec![
            Cell::new(field).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    };

    row("Title", truncate_with_ellipsis(&metadata.title, 80));
    row("Author", truncate_with_ellipsis(&metadata.author, 80));
    row("Year", metadata.year());
    row("Site", metadata.site_name.clone());
    row("URL", metadata.url.clone());
    if let Some(doi) = metadata.doi() {
        row("DOI", doi.to_string());
    }
    if let Some(publisher) = metadata.publisher() {
        row("Publisher", publisher.to_string());
    }
    row("Accessed", format_access_date(metadata));

    println!("{table}");
}

/// Truncate text to at most `max_chars` characters, ending with "...".
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }

    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

/// Spinner shown while a lookup is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        let tick = status_icon(Status::Error);
        if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.red} {msg}") {
            self.pb.set_style(style.tick_strings(&[tick, tick]));
        }
        self.pb.finish_with_message(msg.to_string());
    }

    /// Remove the spinner line.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
