//! Convert a located result object into a CaseExtraction

use drugledger_domain::{CaseExtraction, DrugEntry};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Convert a JSON amount into an exact decimal
///
/// Numbers go through their shortest decimal text, so `2.5005` stays
/// `2.5005` rather than its binary approximation. Missing, `null`, `false`
/// and blank strings are zero.
pub fn decimal_from_json(value: Option<&Value>) -> Result<Decimal, String> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => parse_decimal_text(&n.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(Value::String(s)) => parse_decimal_text(s.trim()),
        Some(other) => Err(format!("not a number: {}", other)),
    }
}

fn parse_decimal_text(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("invalid amount '{}': {}", text, e))
}

/// Text of a field; missing and `null` become empty, other scalars are stringified
fn text_field(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Build a CaseExtraction from a result object
///
/// `fallback_case_id` is used when the object has no `case_id`. Returns
/// `None` if `result` is not an object. Drug items that are not objects are
/// skipped; unparsable amounts count as zero.
pub fn parse_extraction(result: &Value, fallback_case_id: Option<&str>) -> Option<CaseExtraction> {
    if !result.is_object() {
        return None;
    }

    let case_id = match result.get("case_id") {
        None | Some(Value::Null) => fallback_case_id.unwrap_or_default().to_string(),
        Some(_) => text_field(result, "case_id"),
    };

    let mut drugs = Vec::new();
    if let Some(items) = result.get("drugs").and_then(Value::as_array) {
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                warn!("Case {}: drug entry {} is not an object, skipping", case_id, idx);
                continue;
            }
            let amount_grams = decimal_from_json(item.get("amount_grams")).unwrap_or_else(|e| {
                warn!("Case {}: drug entry {}: {}; counting as 0", case_id, idx, e);
                Decimal::ZERO
            });
            drugs.push(DrugEntry {
                name_std: text_field(item, "name_std"),
                name_raw: text_field(item, "name_raw"),
                amount_grams,
                unit_raw: text_field(item, "unit_raw"),
                amount_raw_text: text_field(item, "amount_raw_text"),
                evidence_span: text_field(item, "evidence_span"),
                certainty: text_field(item, "certainty"),
            });
        }
    }

    let reported_total_grams = result
        .get("totals")
        .and_then(|t| t.get("amount_grams_sum"))
        .and_then(|v| decimal_from_json(Some(v)).ok());

    Some(CaseExtraction {
        case_id,
        drugs,
        reported_total_grams,
        notes: text_field(result, "notes"),
    })
}
