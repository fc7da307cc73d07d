//! Strict output schema the model must follow

use drugledger_domain::{Certainty, Endpoint};
use serde::Serialize;
use serde_json::{json, Value};

/// JSON-Schema contract for one case's extraction result
///
/// Every object forbids additional properties and requires all of its
/// listed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSchema {
    /// Schema name reported to the service
    pub name: String,

    /// Always `json_schema`
    #[serde(rename = "type")]
    pub format_type: String,

    /// The JSON-Schema document itself
    pub schema: Value,

    /// Ask the service to enforce the schema exactly
    pub strict: bool,
}

impl ExtractionSchema {
    /// The drug-extraction schema under the given name
    pub fn standard(name: &str) -> Self {
        let certainty_values: Vec<&str> = Certainty::ALL.iter().map(|c| c.as_str()).collect();

        let drug_entry = json!({
            "type": "object",
            "properties": {
                "name_std": {"type": "string"},
                "name_raw": {"type": "string"},
                "amount_grams": {"type": "number"},
                "unit_raw": {"type": "string"},
                "amount_raw_text": {"type": "string"},
                "evidence_span": {"type": "string"},
                "certainty": {"type": "string", "enum": certainty_values}
            },
            "required": [
                "name_std", "name_raw", "amount_grams",
                "unit_raw", "amount_raw_text", "evidence_span", "certainty"
            ],
            "additionalProperties": false
        });

        let schema = json!({
            "type": "object",
            "properties": {
                "case_id": {"type": "string"},
                "drugs": {
                    "type": "array",
                    "items": drug_entry
                },
                "totals": {
                    "additionalProperties": false,
                    "type": "object",
                    "properties": {"amount_grams_sum": {"type": "number"}},
                    "required": ["amount_grams_sum"]
                },
                "notes": {"type": "string"}
            },
            "additionalProperties": false,
            "required": ["case_id", "drugs", "totals", "notes"]
        });

        Self {
            name: name.to_string(),
            format_type: "json_schema".to_string(),
            schema,
            strict: true,
        }
    }

    /// Pretty-printed schema artifact (two-space indent, non-ASCII kept)
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Output-format block for a request body on the given endpoint
    ///
    /// The responses endpoint takes the schema flat under `text.format`;
    /// chat completions nest it under `response_format.json_schema`.
    pub fn output_format(&self, endpoint: Endpoint) -> Result<Value, serde_json::Error> {
        match endpoint {
            Endpoint::Responses => serde_json::to_value(self),
            Endpoint::ChatCompletions => Ok(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": self.name,
                    "schema": self.schema,
                    "strict": self.strict
                }
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_objects<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
        match value {
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("object") {
                    out.push(value);
                }
                for v in map.values() {
                    collect_objects(v, out);
                }
            }
            Value::Array(items) => {
                for v in items {
                    collect_objects(v, out);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_every_object_is_closed_and_fully_required() {
        let schema = ExtractionSchema::standard("CaseDrugExtraction");
        let mut objects = Vec::new();
        collect_objects(&schema.schema, &mut objects);
        assert_eq!(objects.len(), 3);

        for obj in objects {
            assert_eq!(obj["additionalProperties"], Value::Bool(false));
            let props: Vec<&String> = obj["properties"].as_object().unwrap().keys().collect();
            let required: Vec<&str> = obj["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            for p in props {
                assert!(required.contains(&p.as_str()), "{} not required", p);
            }
        }
    }

    #[test]
    fn test_certainty_enum() {
        let schema = ExtractionSchema::standard("x");
        let certainty = &schema.schema["properties"]["drugs"]["items"]["properties"]["certainty"];
        assert_eq!(certainty["enum"], json!(["high", "medium", "low"]));
    }

    #[test]
    fn test_artifact_keeps_declared_key_order() {
        let schema = ExtractionSchema::standard("CaseDrugExtraction");
        let text = schema.to_pretty_json().unwrap();
        let name_pos = text.find("\"name\"").unwrap();
        let schema_pos = text.find("\"schema\"").unwrap();
        let strict_pos = text.find("\"strict\"").unwrap();
        assert!(name_pos < schema_pos && schema_pos < strict_pos);
        assert!(text.starts_with("{\n  \"name\": \"CaseDrugExtraction\""));
    }

    #[test]
    fn test_chat_completions_format_nests_schema() {
        let schema = ExtractionSchema::standard("CaseDrugExtraction");
        let format = schema.output_format(Endpoint::ChatCompletions).unwrap();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "CaseDrugExtraction");
        assert_eq!(format["json_schema"]["strict"], true);

        let flat = schema.output_format(Endpoint::Responses).unwrap();
        assert_eq!(flat["name"], "CaseDrugExtraction");
        assert_eq!(flat["type"], "json_schema");
    }
}
