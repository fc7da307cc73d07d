//! Core RequestBuilder implementation

use crate::config::RequestConfig;
use crate::error::ExtractorError;
use crate::prompt::SystemPrompt;
use crate::reader::read_cases;
use crate::schema::ExtractionSchema;
use crate::types::{BatchRequestRecord, RequestBody, TextOptions};
use drugledger_domain::{CaseRecord, Endpoint};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a build run
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Number of request lines written (equals the number of input rows)
    pub rows: usize,

    /// Request file path
    pub requests_path: PathBuf,

    /// Schema artifact path
    pub schema_path: PathBuf,
}

/// Maps case records to batch request records
pub struct RequestBuilder {
    config: RequestConfig,
    endpoint: Endpoint,
    schema: ExtractionSchema,
    output_format: Value,
    prompt: SystemPrompt,
}

impl RequestBuilder {
    /// Create a new RequestBuilder
    ///
    /// The schema's output-format block is rendered once here and reused for
    /// every record.
    pub fn new(
        config: RequestConfig,
        schema: ExtractionSchema,
        prompt: SystemPrompt,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let endpoint = config.endpoint()?;
        let output_format = schema.output_format(endpoint)?;

        Ok(Self {
            config,
            endpoint,
            schema,
            output_format,
            prompt,
        })
    }

    /// Endpoint the built requests target
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Schema attached to every request
    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    /// Build the request record for one case
    pub fn build_record(&self, case: &CaseRecord) -> BatchRequestRecord {
        let conversation = self.prompt.conversation(case);

        let body = match self.endpoint {
            Endpoint::Responses => RequestBody::Responses {
                model: self.config.model.clone(),
                input: conversation,
                text: TextOptions {
                    format: self.output_format.clone(),
                },
                temperature: self.config.temperature,
            },
            Endpoint::ChatCompletions => RequestBody::ChatCompletions {
                model: self.config.model.clone(),
                messages: conversation,
                response_format: self.output_format.clone(),
                temperature: self.config.temperature,
            },
        };

        BatchRequestRecord {
            custom_id: case.custom_id(),
            method: "POST".to_string(),
            url: self.endpoint.as_str().to_string(),
            body,
        }
    }

    /// Write one JSON line per case, in input order
    ///
    /// Returns the number of lines written.
    pub fn write_requests<W: Write>(
        &self,
        cases: &[CaseRecord],
        writer: W,
    ) -> Result<usize, ExtractorError> {
        let mut writer = BufWriter::new(writer);
        for case in cases {
            let record = self.build_record(case);
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(cases.len())
    }

    /// Write the schema artifact
    pub fn write_schema(&self, path: impl AsRef<Path>) -> Result<(), ExtractorError> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, self.schema.to_pretty_json()?)?;
        debug!("Wrote schema to {}", path.display());
        Ok(())
    }

    /// Full build: read the case table, write the schema, then the request file
    ///
    /// A missing column aborts before either file is written.
    pub fn run(
        &self,
        input: impl AsRef<Path>,
        requests_path: impl AsRef<Path>,
        schema_path: impl AsRef<Path>,
    ) -> Result<BuildSummary, ExtractorError> {
        let input = input.as_ref();
        let requests_path = requests_path.as_ref();
        let schema_path = schema_path.as_ref();

        let cases = read_cases(input)?;
        info!("Loaded {} case(s) from {}", cases.len(), input.display());

        self.write_schema(schema_path)?;

        ensure_parent(requests_path)?;
        let rows = self.write_requests(&cases, File::create(requests_path)?)?;

        info!(
            "Wrote {} request(s) for {} to {}",
            rows,
            self.endpoint,
            requests_path.display()
        );

        Ok(BuildSummary {
            rows,
            requests_path: requests_path.to_path_buf(),
            schema_path: schema_path.to_path_buf(),
        })
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(config: RequestConfig) -> RequestBuilder {
        let schema = ExtractionSchema::standard(&config.schema_name);
        RequestBuilder::new(config, schema, SystemPrompt::new("rules")).unwrap()
    }

    #[test]
    fn test_build_record_responses_shape() {
        let builder = builder(RequestConfig::default());
        let record = builder.build_record(&CaseRecord::new("1234", "text"));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["custom_id"], "case-1234");
        assert_eq!(json["method"], "POST");
        assert_eq!(json["url"], "/v1/responses");
        assert_eq!(json["body"]["model"], "gpt-4o-mini");
        assert_eq!(json["body"]["temperature"], 0.0);
        assert_eq!(json["body"]["input"][0]["role"], "system");
        assert_eq!(json["body"]["input"][1]["content"], "case_id=1234\ntext");
        assert_eq!(json["body"]["text"]["format"]["name"], "CaseDrugExtraction");
        assert_eq!(json["body"]["text"]["format"]["strict"], true);
    }

    #[test]
    fn test_build_record_chat_completions_shape() {
        let config = RequestConfig {
            endpoint: "/v1/chat/completions".to_string(),
            ..Default::default()
        };
        let builder = builder(config);
        let record = builder.build_record(&CaseRecord::new("9", ""));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["url"], "/v1/chat/completions");
        assert_eq!(json["body"]["messages"][1]["content"], "case_id=9\n");
        assert_eq!(json["body"]["response_format"]["type"], "json_schema");
        assert!(json["body"].get("input").is_none());
    }

    #[test]
    fn test_null_judgment_message() {
        let builder = builder(RequestConfig::default());
        let record = builder.build_record(&CaseRecord::new("1234", ""));
        assert_eq!(record.body.messages()[1].content, "case_id=1234\n");
    }

    #[test]
    fn test_write_requests_one_line_per_case() {
        let builder = builder(RequestConfig::default());
        let cases = vec![
            CaseRecord::new("1", "甲"),
            CaseRecord::new("2", "乙"),
            CaseRecord::new("3", ""),
        ];
        let mut out = Vec::new();
        let rows = builder.write_requests(&cases, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(rows, 3);
        assert_eq!(lines.len(), 3);
        for (line, expected) in lines.iter().zip(["case-1", "case-2", "case-3"]) {
            let value: Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["custom_id"], expected);
        }
        // Non-ASCII text is written as-is, not \u-escaped
        assert!(lines[0].contains("甲"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RequestConfig {
            endpoint: "/v1/embeddings".to_string(),
            ..Default::default()
        };
        let schema = ExtractionSchema::standard("x");
        let result = RequestBuilder::new(config, schema, SystemPrompt::default());
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
