//! Drugledger Extractor
//!
//! Turns a table of court judgments into batch-inference request records.
//!
//! # Overview
//!
//! Each case row is paired with a fixed system instruction and a strict
//! output schema, and emitted as one JSON line in a request file that the
//! batch runner later uploads. The schema is also written to its own file.
//!
//! # Architecture
//!
//! ```text
//! cases.csv → read_cases → RequestBuilder → batch_requests.jsonl
//!                                        └→ schema.json
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use drugledger_extractor::{ExtractionSchema, RequestBuilder, RequestConfig, SystemPrompt};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RequestConfig::default();
//! let schema = ExtractionSchema::standard(&config.schema_name);
//! let builder = RequestBuilder::new(config, schema, SystemPrompt::default())?;
//!
//! let summary = builder.run("cases.csv", "batch_requests.jsonl", "schema.json")?;
//! println!("Wrote {} request(s)", summary.rows);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod prompt;
mod reader;
mod schema;
mod types;

pub use builder::{BuildSummary, RequestBuilder};
pub use config::RequestConfig;
pub use error::ExtractorError;
pub use prompt::SystemPrompt;
pub use reader::{read_cases, read_cases_from, CASE_NUMBER_COLUMN, JUDGMENT_COLUMN};
pub use schema::ExtractionSchema;
pub use types::{BatchRequestRecord, ChatMessage, RequestBody};
