//! Aggregation state for one run
//!
//! The ledger receives output lines in encounter order, keeps one detail row
//! per drug entry, and accumulates exact per-substance totals. Amounts are
//! rounded only on the detail rows; the accumulator always holds the exact
//! sum.

use crate::decimal::round_grams;
use crate::envelope::locate_result;
use crate::parser::parse_extraction;
use drugledger_domain::case::case_id_from_custom_id;
use drugledger_domain::{CaseExtraction, Certainty};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One row of the detail table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// Case the entry belongs to
    pub case_id: String,

    /// Normalised substance name
    pub drug: String,

    /// Amount rounded to 3 places for display
    pub amount_grams: Decimal,

    /// Name as written in the judgment
    pub name_raw: String,

    /// Unit as written in the judgment
    pub unit_raw: String,

    /// Amount text as written in the judgment
    pub amount_raw_text: String,

    /// Supporting sentence
    pub evidence_span: String,

    /// Certainty tag, verbatim
    pub certainty: String,
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Normalised substance name
    pub drug: String,

    /// Exact total across all entries
    pub total_grams: Decimal,
}

/// What happened to a single output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Whitespace-only line, ignored
    Blank,

    /// Result recorded with this many drug entries
    Recorded(usize),

    /// Line skipped for the given reason
    Skipped(String),
}

/// Detail rows and per-substance totals
#[derive(Debug, Clone)]
pub struct Ledger {
    unspecified_label: String,
    rows: Vec<DetailRow>,
    by_drug: BTreeMap<String, Decimal>,
    grand_total: Decimal,
    results: usize,
    skipped: usize,
    low_certainty: usize,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(unspecified_label: impl Into<String>) -> Self {
        Self {
            unspecified_label: unspecified_label.into(),
            rows: Vec::new(),
            by_drug: BTreeMap::new(),
            grand_total: Decimal::ZERO,
            results: 0,
            skipped: 0,
            low_certainty: 0,
        }
    }

    /// Parse one output line and record its result
    pub fn ingest_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            return LineOutcome::Blank;
        }

        let outcome = self.try_ingest(line);
        if let LineOutcome::Skipped(reason) = &outcome {
            self.skipped += 1;
            warn!("Skipping output line: {}", reason);
        }
        outcome
    }

    fn try_ingest(&mut self, line: &str) -> LineOutcome {
        let envelope: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => return LineOutcome::Skipped(format!("not valid JSON: {}", e)),
        };

        let custom_id = envelope.get("custom_id").and_then(Value::as_str).unwrap_or("");

        let Some(located) = locate_result(&envelope) else {
            return LineOutcome::Skipped(format!("no result found for '{}'", custom_id));
        };
        let Some(result) = located.normalize() else {
            return LineOutcome::Skipped(format!("result for '{}' is not a JSON object", custom_id));
        };

        let fallback = case_id_from_custom_id(custom_id).or(Some(custom_id).filter(|id| !id.is_empty()));
        match parse_extraction(&result, fallback) {
            Some(extraction) => match self.record(&extraction) {
                Ok(()) => LineOutcome::Recorded(extraction.drugs.len()),
                Err(reason) => LineOutcome::Skipped(reason),
            },
            None => LineOutcome::Skipped(format!("result for '{}' is not a JSON object", custom_id)),
        }
    }

    /// Record every drug entry of an extraction
    ///
    /// All or nothing: if any running total would leave the decimal range,
    /// nothing from the extraction is recorded and an error is returned.
    pub fn record(&mut self, extraction: &CaseExtraction) -> Result<(), String> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut grand_total = self.grand_total;

        for entry in &extraction.drugs {
            let drug = entry.normalized_name(&self.unspecified_label);
            let current = totals
                .get(&drug)
                .or_else(|| self.by_drug.get(&drug))
                .copied()
                .unwrap_or(Decimal::ZERO);
            let overflow = || {
                format!(
                    "case {}: adding {} g of '{}' overflows the running total",
                    extraction.case_id, entry.amount_grams, drug
                )
            };
            let next = current.checked_add(entry.amount_grams).ok_or_else(overflow)?;
            grand_total = grand_total.checked_add(entry.amount_grams).ok_or_else(overflow)?;
            totals.insert(drug, next);
        }

        self.results += 1;
        self.grand_total = grand_total;
        self.by_drug.extend(totals);
        debug!("Case {}: {} drug entries", extraction.case_id, extraction.drugs.len());

        for entry in &extraction.drugs {
            let drug = entry.normalized_name(&self.unspecified_label);

            if entry.certainty_level() == Some(Certainty::Low) {
                self.low_certainty += 1;
            }

            self.rows.push(DetailRow {
                case_id: extraction.case_id.clone(),
                drug,
                amount_grams: round_grams(entry.amount_grams),
                name_raw: entry.name_raw.clone(),
                unit_raw: entry.unit_raw.clone(),
                amount_raw_text: entry.amount_raw_text.clone(),
                evidence_span: entry.evidence_span.clone(),
                certainty: entry.certainty.clone(),
            });
        }
        Ok(())
    }

    /// Detail rows in encounter order
    pub fn rows(&self) -> &[DetailRow] {
        &self.rows
    }

    /// Exact total for one substance
    pub fn total_for(&self, drug: &str) -> Option<Decimal> {
        self.by_drug.get(drug).copied()
    }

    /// Summary rows, heaviest first; equal totals ordered by name
    pub fn summary(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .by_drug
            .iter()
            .map(|(drug, total)| SummaryRow {
                drug: drug.clone(),
                total_grams: *total,
            })
            .collect();
        // BTreeMap iteration is name-ascending and the sort is stable
        rows.sort_by(|a, b| b.total_grams.cmp(&a.total_grams));
        rows
    }

    /// Exact sum over all substances
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Number of results recorded
    pub fn results(&self) -> usize {
        self.results
    }

    /// Number of non-blank lines skipped
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries tagged `low` certainty
    pub fn low_certainty_count(&self) -> usize {
        self.low_certainty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parsed_line(custom_id: &str, result: Value) -> String {
        json!({
            "custom_id": custom_id,
            "response": {"status_code": 200, "output_parsed": result}
        })
        .to_string()
    }

    #[test]
    fn test_unspecified_bucket_keeps_exact_amount() {
        let mut ledger = Ledger::new("未指明");
        let line = parsed_line(
            "case-1",
            json!({"case_id": "1", "drugs": [{"name_std": "", "amount_grams": 2.5005}]}),
        );

        assert_eq!(ledger.ingest_line(&line), LineOutcome::Recorded(1));
        assert_eq!(ledger.rows()[0].drug, "未指明");
        assert_eq!(ledger.rows()[0].amount_grams, dec("2.501"));
        assert_eq!(ledger.total_for("未指明"), Some(dec("2.5005")));
    }

    #[test]
    fn test_accumulator_is_not_rounded_per_row() {
        let mut ledger = Ledger::new("未指明");
        for id in 0..2 {
            let line = parsed_line(
                &format!("case-{}", id),
                json!({"drugs": [{"name_std": "海洛因", "amount_grams": 0.0005}]}),
            );
            ledger.ingest_line(&line);
        }

        assert_eq!(ledger.rows()[0].amount_grams, dec("0.001"));
        assert_eq!(ledger.total_for("海洛因"), Some(dec("0.0010")));
        assert_eq!(ledger.grand_total(), dec("0.001"));
    }

    #[test]
    fn test_case_id_falls_back_to_custom_id() {
        let mut ledger = Ledger::new("未指明");
        let line = parsed_line("case-88", json!({"drugs": [{"name_std": "大麻", "amount_grams": 1}]}));
        ledger.ingest_line(&line);
        assert_eq!(ledger.rows()[0].case_id, "88");
    }

    #[test]
    fn test_embedded_text_path() {
        let mut ledger = Ledger::new("未指明");
        let inner = json!({"case_id": "5", "drugs": [{"name_std": "氯胺酮", "amount_grams": "3"}]});
        let line = json!({
            "custom_id": "case-5",
            "response": {"body": {"output": [{"content": [{"type": "output_text", "text": inner.to_string()}]}]}}
        })
        .to_string();

        assert_eq!(ledger.ingest_line(&line), LineOutcome::Recorded(1));
        assert_eq!(ledger.total_for("氯胺酮"), Some(dec("3")));
    }

    #[test]
    fn test_skipped_lines_are_counted() {
        let mut ledger = Ledger::new("未指明");

        assert_eq!(ledger.ingest_line("   "), LineOutcome::Blank);
        assert!(matches!(ledger.ingest_line("{not json"), LineOutcome::Skipped(_)));
        assert!(matches!(
            ledger.ingest_line(r#"{"custom_id":"case-1","response":{"body":{}}}"#),
            LineOutcome::Skipped(_)
        ));
        assert!(matches!(
            ledger.ingest_line(&parsed_line("case-2", Value::Null)),
            LineOutcome::Skipped(_)
        ));

        assert_eq!(ledger.skipped(), 3);
        assert_eq!(ledger.results(), 0);
        assert!(ledger.rows().is_empty());
    }

    #[test]
    fn test_overflowing_amount_skips_line() {
        let mut ledger = Ledger::new("未指明");
        let huge = r#"{"custom_id":"case-1","response":{"output_parsed":{"drugs":[{"name_std":"海洛因","amount_grams":5e28}]}}}"#;

        assert_eq!(ledger.ingest_line(huge), LineOutcome::Recorded(1));
        assert!(matches!(ledger.ingest_line(huge), LineOutcome::Skipped(_)));

        assert_eq!(ledger.skipped(), 1);
        assert_eq!(ledger.rows().len(), 1);
        assert_eq!(ledger.total_for("海洛因"), Some(Decimal::from_scientific("5e28").unwrap()));
    }

    #[test]
    fn test_grand_total_overflow_across_drugs() {
        let mut ledger = Ledger::new("未指明");
        let first = parsed_line("case-1", json!({"drugs": [{"name_std": "海洛因", "amount_grams": 5e28}]}));
        let second = parsed_line(
            "case-2",
            json!({"drugs": [{"name_std": "大麻", "amount_grams": 1}, {"name_std": "冰毒", "amount_grams": 5e28}]}),
        );

        assert_eq!(ledger.ingest_line(&first), LineOutcome::Recorded(1));
        assert!(matches!(ledger.ingest_line(&second), LineOutcome::Skipped(_)));

        // Nothing from the rejected line is kept
        assert_eq!(ledger.total_for("大麻"), None);
        assert_eq!(ledger.rows().len(), 1);
        assert_eq!(ledger.results(), 1);
        assert_eq!(ledger.grand_total(), Decimal::from_scientific("5e28").unwrap());
        assert_eq!(ledger.summary().len(), 1);
    }

    #[test]
    fn test_summary_order() {
        let mut ledger = Ledger::new("未指明");
        let line = parsed_line(
            "case-1",
            json!({"drugs": [
                {"name_std": "b", "amount_grams": 1},
                {"name_std": "c", "amount_grams": 5},
                {"name_std": "a", "amount_grams": 1},
                {"name_std": " c ", "amount_grams": 0.5, "certainty": "LOW"}
            ]}),
        );
        ledger.ingest_line(&line);

        let names: Vec<_> = ledger.summary().into_iter().map(|r| r.drug).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(ledger.total_for("c"), Some(dec("5.5")));
        assert_eq!(ledger.low_certainty_count(), 1);
    }
}
