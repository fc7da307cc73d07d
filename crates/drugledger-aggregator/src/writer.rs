//! Deliverable writers
//!
//! Both tables are UTF-8 CSV with a leading byte-order mark and `\n` line
//! endings; the header row is written even when there are no data rows.

use crate::decimal::render_decimal;
use crate::error::AggregatorError;
use crate::ledger::{DetailRow, SummaryRow};
use csv::{Terminator, WriterBuilder};
use rust_decimal::Decimal;
use std::io::Write;

/// Detail table columns
pub const DETAIL_HEADERS: [&str; 8] = [
    "case_id",
    "drug",
    "amount_grams",
    "name_raw",
    "unit_raw",
    "amount_raw_text",
    "evidence_span",
    "certainty",
];

/// Summary table columns
pub const SUMMARY_HEADERS: [&str; 2] = ["drug", "total_grams"];

const BOM: &[u8] = "\u{feff}".as_bytes();

fn table_writer<W: Write>(mut out: W) -> Result<csv::Writer<W>, AggregatorError> {
    out.write_all(BOM)?;
    Ok(WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out))
}

/// Write the detail table
pub fn write_details<W: Write>(rows: &[DetailRow], out: W) -> Result<(), AggregatorError> {
    let mut writer = table_writer(out)?;
    writer.write_record(DETAIL_HEADERS)?;
    for row in rows {
        let amount = render_decimal(row.amount_grams);
        writer.write_record([
            row.case_id.as_str(),
            row.drug.as_str(),
            amount.as_str(),
            row.name_raw.as_str(),
            row.unit_raw.as_str(),
            row.amount_raw_text.as_str(),
            row.evidence_span.as_str(),
            row.certainty.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the summary table
pub fn write_summary<W: Write>(rows: &[SummaryRow], out: W) -> Result<(), AggregatorError> {
    let mut writer = table_writer(out)?;
    writer.write_record(SUMMARY_HEADERS)?;
    for row in rows {
        let total = render_decimal(row.total_grams);
        writer.write_record([row.drug.as_str(), total.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the grand-total line
pub fn write_total<W: Write>(total: Decimal, mut out: W) -> Result<(), AggregatorError> {
    writeln!(out, "总量(克): {}", render_decimal(total))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_tables_have_headers_only() {
        let mut details = Vec::new();
        write_details(&[], &mut details).unwrap();
        let text = String::from_utf8(details).unwrap();
        assert_eq!(
            text,
            "\u{feff}case_id,drug,amount_grams,name_raw,unit_raw,amount_raw_text,evidence_span,certainty\n"
        );

        let mut summary = Vec::new();
        write_summary(&[], &mut summary).unwrap();
        assert_eq!(String::from_utf8(summary).unwrap(), "\u{feff}drug,total_grams\n");
    }

    #[test]
    fn test_detail_fields_are_quoted_when_needed() {
        let row = DetailRow {
            case_id: "1".to_string(),
            drug: "甲基苯丙胺".to_string(),
            amount_grams: dec("2.501"),
            name_raw: "冰毒".to_string(),
            unit_raw: "克".to_string(),
            amount_raw_text: "2.5005克".to_string(),
            evidence_span: "查获冰毒, 净重2.5005克".to_string(),
            certainty: "high".to_string(),
        };
        let mut out = Vec::new();
        write_details(&[row], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let data = text.lines().nth(1).unwrap();
        assert_eq!(data, "1,甲基苯丙胺,2.501,冰毒,克,2.5005克,\"查获冰毒, 净重2.5005克\",high");
    }

    #[test]
    fn test_summary_renders_exact_totals() {
        let rows = vec![
            SummaryRow { drug: "海洛因".to_string(), total_grams: dec("10") },
            SummaryRow { drug: "大麻".to_string(), total_grams: dec("0.0010") },
        ];
        let mut out = Vec::new();
        write_summary(&rows, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\u{feff}drug,total_grams\n海洛因,10.0\n大麻,0.001\n"
        );
    }

    #[test]
    fn test_total_line() {
        let mut out = Vec::new();
        write_total(Decimal::ZERO, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "总量(克): 0.0\n");
    }
}
