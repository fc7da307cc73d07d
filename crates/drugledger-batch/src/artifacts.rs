//! Local artifact naming and error-payload rendering

use drugledger_domain::batch::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Output file for a batch: `batch_output_<id>.jsonl`
pub fn output_path(dir: &Path, batch_id: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", OUTPUT_FILE_PREFIX, batch_id, OUTPUT_FILE_EXTENSION))
}

/// Downloaded error file for a batch: `batch_error_<id>.log`
pub fn error_log_path(dir: &Path, batch_id: &str) -> PathBuf {
    dir.join(format!("batch_error_{}.log", batch_id))
}

/// Serialized inline errors for a batch: `batch_error_<id>.json`
pub fn error_json_path(dir: &Path, batch_id: &str) -> PathBuf {
    dir.join(format!("batch_error_{}.json", batch_id))
}

/// Render an inline `errors` payload as pretty JSON
///
/// Structured payloads are pretty-printed as-is. A string that itself holds
/// JSON is decoded first; any other string is kept as a JSON string.
pub fn render_inline_errors(errors: &Value) -> String {
    let structured = match errors {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ (Value::Object(_) | Value::Array(_))) => inner,
            _ => errors.clone(),
        },
        other => other.clone(),
    };
    serde_json::to_string_pretty(&structured).unwrap_or_else(|_| errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_artifact_names() {
        let dir = Path::new("batch_outputs");
        assert_eq!(
            output_path(dir, "batch_abc"),
            PathBuf::from("batch_outputs/batch_output_batch_abc.jsonl")
        );
        assert_eq!(
            error_log_path(dir, "batch_abc"),
            PathBuf::from("batch_outputs/batch_error_batch_abc.log")
        );
        assert_eq!(
            error_json_path(dir, "batch_abc"),
            PathBuf::from("batch_outputs/batch_error_batch_abc.json")
        );
    }

    #[test]
    fn test_render_object_errors() {
        let errors = json!({"object": "list", "data": [{"code": "invalid_json", "line": 3}]});
        let text = render_inline_errors(&errors);
        assert!(text.contains("\n  \"object\": \"list\""));
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, errors);
    }

    #[test]
    fn test_render_string_holding_json() {
        let errors = Value::String(r#"[{"message": "bad line"}]"#.to_string());
        let back: Value = serde_json::from_str(&render_inline_errors(&errors)).unwrap();
        assert_eq!(back, json!([{"message": "bad line"}]));
    }

    #[test]
    fn test_render_plain_string() {
        let errors = Value::String("输入文件无效".to_string());
        assert_eq!(render_inline_errors(&errors), "\"输入文件无效\"");
    }
}
