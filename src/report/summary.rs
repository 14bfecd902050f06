//! Transform summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ColumnAction, ColumnOutcome, TransformReport};

/// Summary of one transform run, for console display
#[derive(Debug, Default)]
pub struct TransformSummary {
    pub rows: usize,
    pub columns: Vec<ColumnOutcome>,
}

impl TransformSummary {
    pub fn new(report: &TransformReport) -> Self {
        Self {
            rows: report.rows,
            columns: report.columns.clone(),
        }
    }

    fn count(&self, action: ColumnAction) -> usize {
        self.columns.iter().filter(|c| c.action == action).count()
    }

    /// Per-column table as a string
    pub fn render_table(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Column").add_attribute(Attribute::Bold),
            Cell::new("Action").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Categories").add_attribute(Attribute::Bold),
            Cell::new("Filled").add_attribute(Attribute::Bold),
        ]);

        for outcome in &self.columns {
            let color = match outcome.action {
                ColumnAction::Encoded => Color::Yellow,
                ColumnAction::Parsed | ColumnAction::Cast => Color::Cyan,
                ColumnAction::Excluded => Color::DarkGrey,
                ColumnAction::Unchanged => Color::White,
            };
            let type_change = if outcome.source_dtype == outcome.dtype {
                outcome.dtype.clone()
            } else {
                format!("{} → {}", outcome.source_dtype, outcome.dtype)
            };
            let categories = outcome
                .categories
                .as_ref()
                .map(|c| c.len().to_string())
                .unwrap_or_else(|| "-".to_string());

            table.add_row(vec![
                Cell::new(&outcome.column),
                Cell::new(outcome.action).fg(color),
                Cell::new(type_change),
                Cell::new(categories),
                Cell::new(outcome.nulls_filled),
            ]);
        }

        table.to_string()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRANSFORM SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.render_table().lines() {
            println!("    {}", line);
        }

        println!();
        println!(
            "      {} rows, {} columns: {} encoded, {} parsed, {} cast, {} unchanged, {} excluded",
            style(self.rows).yellow().bold(),
            style(self.columns.len()).yellow().bold(),
            self.count(ColumnAction::Encoded),
            self.count(ColumnAction::Parsed),
            self.count(ColumnAction::Cast),
            self.count(ColumnAction::Unchanged),
            self.count(ColumnAction::Excluded),
        );
    }
}
