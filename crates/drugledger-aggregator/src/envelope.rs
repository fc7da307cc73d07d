//! Locate the structured result inside a batch output line

use serde_json::Value;

/// Where a line's structured result was found
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResult {
    /// Pre-parsed value under `response.output_parsed`
    Direct(Value),

    /// Raw model text nested in the response body
    Embedded(String),
}

impl ParsedResult {
    /// Canonical result object, or `None` if the payload is not a non-empty JSON object
    pub fn normalize(self) -> Option<Value> {
        let value: Value = match self {
            ParsedResult::Direct(Value::String(text)) | ParsedResult::Embedded(text) => {
                serde_json::from_str(strip_code_fence(&text)).ok()?
            }
            ParsedResult::Direct(value) => value,
        };
        match &value {
            Value::Object(map) if !map.is_empty() => Some(value),
            _ => None,
        }
    }
}

/// Find a line's result, preferring `response.output_parsed`
///
/// The fallback takes the first non-empty text under
/// `response.body.output[*].content[*].text`, then
/// `response.body.choices[0].message.content`. An explicit `null` under
/// `output_parsed` means no result.
pub fn locate_result(line: &Value) -> Option<ParsedResult> {
    let response = line.get("response")?;

    if let Some(parsed) = response.get("output_parsed") {
        return match parsed {
            Value::Null => None,
            value => Some(ParsedResult::Direct(value.clone())),
        };
    }

    embedded_text(response).map(ParsedResult::Embedded)
}

fn embedded_text(response: &Value) -> Option<String> {
    let body = response.get("body")?;

    if let Some(items) = body.get("output").and_then(Value::as_array) {
        let text = items
            .iter()
            .filter_map(|item| item.get("content").and_then(Value::as_array))
            .flatten()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .find(|text| !text.is_empty());
        if let Some(text) = text {
            return Some(text.to_string());
        }
    }

    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Drop a surrounding markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return trimmed,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
