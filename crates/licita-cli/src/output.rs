//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use licita_domain::{DistributionShare, LineItem};
use licita_extractor::ImportOutcome;
use licita_ledger::{ProcurementRecord, ValidationIssue};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a record: header, items, shares and totals.
    pub fn format_record(&self, record: &ProcurementRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.format_record_table(record)),
        }
    }

    fn format_record_table(&self, record: &ProcurementRecord) -> String {
        let header = record.header();
        let mut out = String::new();

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record([
            "Record",
            &record.id().map(|id| id.to_string()).unwrap_or_else(|| "(unsaved)".to_string()),
        ]);
        builder.push_record(["Process", header.process_number.as_str()]);
        builder.push_record(["Modality", header.modality.as_str()]);
        builder.push_record(["Object", header.object.as_str()]);
        builder.push_record(["Year", header.year.as_str()]);
        builder.push_record([
            "Supplier",
            record.supplier().map(|s| s.as_str()).unwrap_or("(none)"),
        ]);
        out.push_str(&styled(builder));
        out.push('\n');

        out.push_str(&self.format_items_table(record.items()));
        out.push('\n');
        out.push_str(&self.format_shares_table(record.shares()));
        out.push('\n');

        out.push_str(&format!(
            "Total: {}  Allocated: {:.2}%  Reserved: {:.2}% ({})",
            format_money(record.total_value()),
            record.allocated_percentage(),
            record.reserved_percentage(),
            format_money(record.reserved_value()),
        ));
        out
    }

    fn format_items_table(&self, items: &[LineItem]) -> String {
        if items.is_empty() {
            return self.colorize("No items.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Lot", "#", "Description", "Brand", "Unit", "Qty", "Unit price", "Total"]);

        for item in items {
            builder.push_record([
                item.id().to_string(),
                item.lot.clone(),
                item.item_number.to_string(),
                item.description.clone(),
                item.brand.clone(),
                item.unit.clone(),
                format_quantity(item.quantity()),
                format_money(item.unit_price()),
                format_money(item.total_price()),
            ]);
        }

        styled(builder)
    }

    fn format_shares_table(&self, shares: &[DistributionShare]) -> String {
        if shares.is_empty() {
            return self.colorize("No distribution shares.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Consumer", "Percentage", "Value"]);

        for share in shares {
            builder.push_record([
                share.id().to_string(),
                share.consumer().to_string(),
                format!("{:.2}%", share.percentage()),
                format_money(share.allocated_value()),
            ]);
        }

        styled(builder)
    }

    /// Format an import summary.
    pub fn format_import(&self, outcome: &ImportOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let summary = serde_json::json!({
                    "header": outcome.header,
                    "supplier": {
                        "id": outcome.supplier.supplier_id(),
                        "candidates": outcome.supplier.candidates,
                    },
                    "items": outcome.items.len(),
                    "warning": outcome.warning.map(|w| w.to_string()),
                    "metadata": {
                        "sourceKind": outcome.metadata.source_kind.as_str(),
                        "model": outcome.metadata.model_name,
                        "repairStep": outcome.metadata.repair_step.as_str(),
                        "finishReason": outcome.metadata.finish_reason,
                        "contentChars": outcome.metadata.content_chars,
                        "attachmentBytes": outcome.metadata.attachment_bytes,
                        "truncated": outcome.metadata.truncated,
                        "processingTimeMs": outcome.metadata.processing_time_ms,
                    }
                });
                Ok(serde_json::to_string_pretty(&summary)?)
            }
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!(
                    "Imported {} item(s) from a {} in {} ms (model: {}, parse: {})",
                    outcome.items.len(),
                    outcome.metadata.source_kind,
                    outcome.metadata.processing_time_ms,
                    outcome.metadata.model_name,
                    outcome.metadata.repair_step,
                ))];

                match &outcome.supplier.supplier {
                    Some(supplier) => lines.push(self.info(&format!(
                        "Supplier: {} ({})",
                        supplier.name, supplier.identifier
                    ))),
                    None => lines.push(self.warning("Supplier not found in the registry; select one manually")),
                }
                if outcome.supplier.is_ambiguous() {
                    let names: Vec<&str> = outcome
                        .supplier
                        .candidates
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect();
                    lines.push(self.warning(&format!(
                        "Several suppliers matched ({}); confirm the selection",
                        names.join(", ")
                    )));
                }
                if outcome.metadata.truncated {
                    lines.push(self.warning("Content was cut to the character budget"));
                }
                if let Some(warning) = outcome.warning {
                    lines.push(self.warning(&warning.to_string()));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format validation issues that blocked a save.
    pub fn validation_issues(&self, issues: &[ValidationIssue]) -> String {
        let mut lines = vec![self.error("Record cannot be saved:")];
        lines.extend(issues.iter().map(|issue| format!("  - {}", issue)));
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Two decimals with a currency prefix
pub fn format_money(value: f64) -> String {
    format!("R$ {:.2}", value)
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
