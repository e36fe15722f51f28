/*!
 * Terminal output styling for mpkg
 *
 * Themed text, status lines and tables for packages, elements and merge
 * reports. Command results go to stdout; diagnostics go to stderr.
 */

use crate::manifest::{MediaPackageElement, MergeOutcome, MergeReport};
use crate::ops::{CheckReport, PackageSummary};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};

// ============================================================================
// THEME COLORS
// ============================================================================

pub struct Theme;

impl Theme {
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Header style (bold cyan)
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }
}

pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const ARROW_RIGHT: &'static str = "→";
}

/// Print a section header
pub fn section_header(title: &str) {
    let line_len = 50 - title.len().min(40);
    println!(
        "\n{} {}",
        Theme::header(title),
        Theme::muted("─".repeat(line_len))
    );
}

// ============================================================================
// TABLES
// ============================================================================

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

fn optional_cell<D: ToString>(value: Option<D>) -> Cell {
    match value {
        Some(v) => Cell::new(v.to_string()),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One row per element, in package order
pub fn element_table<'a, I>(elements: I) -> Table
where
    I: IntoIterator<Item = &'a MediaPackageElement>,
{
    let mut table = create_table();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Type"),
        header_cell("Flavor"),
        header_cell("Tags"),
        header_cell("Checksum"),
        header_cell("URI"),
    ]);

    for element in elements {
        let tags = element.tags().collect::<Vec<_>>().join(", ");
        table.add_row(vec![
            optional_cell(element.identifier()),
            Cell::new(element.kind()),
            optional_cell(element.flavor()),
            Cell::new(tags),
            optional_cell(element.checksum()),
            optional_cell(element.uri()),
        ]);
    }

    table
}

/// Per-element outcomes of a merge
pub fn merge_report_table(report: &MergeReport) -> Table {
    let mut table = create_table();
    table.set_header(vec![header_cell("Element"), header_cell("Outcome")]);

    for outcome in &report.outcomes {
        let (id, cell) = match outcome {
            MergeOutcome::Added { id } => (id.clone(), Cell::new("added").fg(Color::Green)),
            MergeOutcome::Replaced { id } => {
                (id.clone(), Cell::new("replaced").fg(Color::Yellow))
            }
            MergeOutcome::Skipped { id } => {
                (id.clone(), Cell::new("skipped").fg(Color::DarkGrey))
            }
            MergeOutcome::Renamed { from, to } => (
                from.clone(),
                Cell::new(format!("renamed {} {}", Icons::ARROW_RIGHT, to)).fg(Color::Cyan),
            ),
        };
        table.add_row(vec![Cell::new(id), cell]);
    }

    table
}

/// Key-value table for a package summary
pub fn summary_table(summary: &PackageSummary) -> Table {
    let mut table = create_minimal_table();
    table.add_row(vec![
        Cell::new("Package").fg(Color::DarkGrey),
        Cell::new(&summary.package).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Title").fg(Color::DarkGrey),
        optional_cell(summary.title.as_deref()),
    ]);
    for (kind, count) in &summary.counts {
        table.add_row(vec![
            Cell::new(format!("{}s", kind)).fg(Color::DarkGrey),
            Cell::new(count),
        ]);
    }
    table
}

/// Key-value table for a sanity check result
pub fn check_table(report: &CheckReport) -> Table {
    let mut table = create_minimal_table();
    let publishable = if report.publishable {
        Cell::new(format!("{} yes", Icons::SUCCESS)).fg(Color::Green)
    } else {
        Cell::new(format!("{} no", Icons::WARNING)).fg(Color::Yellow)
    };
    table.add_row(vec![
        Cell::new("Package").fg(Color::DarkGrey),
        Cell::new(&report.package),
    ]);
    table.add_row(vec![
        Cell::new("Elements").fg(Color::DarkGrey),
        Cell::new(report.elements),
    ]);
    table.add_row(vec![Cell::new("Publishable").fg(Color::DarkGrey), publishable]);
    table
}

// ============================================================================
// STATUS LINES
// ============================================================================

/// Print a styled error message with an optional hint
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}

pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS.to_string()),
        Theme::success(message)
    );
}

pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO.to_string()), message);
}
