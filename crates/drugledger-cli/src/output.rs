//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use drugledger_aggregator::{render_decimal, AggregateReport};
use drugledger_batch::RunOutcome;
use drugledger_extractor::BuildSummary;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths and totals only)
    Quiet,
}

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

    /// Format the result of the build step.
    pub fn format_build(&self, summary: &BuildSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "rows": summary.rows,
                "requests": summary.requests_path.display().to_string(),
                "schema": summary.schema_path.display().to_string(),
            }))?),
            OutputFormat::Quiet => Ok(summary.requests_path.display().to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.success(&format!(
                    "Wrote {} request(s) to {}",
                    summary.rows,
                    summary.requests_path.display()
                )),
                self.info(&format!("Schema written to {}", summary.schema_path.display()))
            )),
        }
    }

    /// Format the result of a batch run.
    pub fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        let output = outcome.output_path.as_ref().map(|p| p.display().to_string());
        let errors = outcome.error_path.as_ref().map(|p| p.display().to_string());

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "batch_id": outcome.batch_id,
                "status": outcome.status.as_str(),
                "output": output,
                "errors": errors,
            }))?),
            OutputFormat::Quiet => Ok(output.unwrap_or_default()),
            OutputFormat::Table => {
                let status = format!("Batch {} finished: {}", outcome.batch_id, outcome.status);
                let mut lines = vec![if outcome.is_completed() {
                    self.success(&status)
                } else {
                    self.warning(&status)
                }];
                match output {
                    Some(path) => lines.push(self.info(&format!("Output saved to {}", path))),
                    None => lines.push(self.warning("No output file was produced")),
                }
                if let Some(path) = errors {
                    lines.push(self.warning(&format!("Error details saved to {}", path)));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format the aggregation report.
    pub fn format_report(&self, report: &AggregateReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(render_decimal(report.total_grams)),
        }
    }

    fn format_report_json(&self, report: &AggregateReport) -> Result<String> {
        let summary: Vec<serde_json::Value> = report
            .summary
            .iter()
            .map(|row| {
                json!({
                    "drug": row.drug,
                    "total_grams": render_decimal(row.total_grams),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json!({
            "files": report.files.len(),
            "detail_rows": report.detail_rows,
            "skipped_lines": report.skipped_lines,
            "low_certainty": report.low_certainty,
            "total_grams": render_decimal(report.total_grams),
            "summary": summary,
            "details": report.details_path.display().to_string(),
            "summary_file": report.summary_path.display().to_string(),
            "total_file": report.total_path.display().to_string(),
        }))?)
    }

    fn format_report_table(&self, report: &AggregateReport) -> String {
        let mut lines = Vec::new();

        if report.summary.is_empty() {
            lines.push(self.colorize("No drug entries found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Drug", "Total (g)"]);
            for row in &report.summary {
                builder.push_record([row.drug.clone(), render_decimal(row.total_grams)]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()))
                .with(Modify::new(Columns::last()).with(Alignment::right()));
            lines.push(table.to_string());
        }

        lines.push(self.success(&format!(
            "Total: {} g across {} entr{} from {} file(s)",
            render_decimal(report.total_grams),
            report.detail_rows,
            if report.detail_rows == 1 { "y" } else { "ies" },
            report.files.len()
        )));
        if report.low_certainty > 0 {
            lines.push(self.warning(&format!(
                "{} entr{} marked low certainty; review {}",
                report.low_certainty,
                if report.low_certainty == 1 { "y" } else { "ies" },
                report.details_path.display()
            )));
        }
        if report.skipped_lines > 0 {
            lines.push(self.warning(&format!(
                "{} output line(s) had no usable result",
                report.skipped_lines
            )));
        }
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
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
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
