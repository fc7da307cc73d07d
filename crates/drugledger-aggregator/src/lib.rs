//! Drugledger Aggregator
//!
//! Reads downloaded batch output files and totals the extracted drug weights.
//!
//! # Overview
//!
//! Every non-empty line of every `batch_output_*.jsonl` file is one model
//! response. The structured result is located through one of two envelope
//! shapes, each drug entry is added to an exact-decimal ledger, and three
//! deliverables are written:
//!
//! - `details_per_evidence.csv`: one row per drug entry
//! - `summary_by_drug.csv`: one row per substance, heaviest first
//! - `TOTAL.txt`: grand total in grams
//!
//! # Example Usage
//!
//! ```no_run
//! use drugledger_aggregator::{AggregatorConfig, ResultAggregator};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = ResultAggregator::new(AggregatorConfig::default())?;
//! let report = aggregator.run()?;
//! println!("{} entries, {} g total", report.detail_rows, report.total_grams);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregator;
mod config;
mod decimal;
mod envelope;
mod error;
mod ledger;
mod parser;
mod writer;

pub use aggregator::{AggregateReport, ResultAggregator};
pub use config::AggregatorConfig;
pub use decimal::{render_decimal, round_grams};
pub use envelope::{locate_result, ParsedResult};
pub use error::AggregatorError;
pub use ledger::{DetailRow, Ledger, LineOutcome, SummaryRow};
pub use parser::{decimal_from_json, parse_extraction};
pub use writer::{write_details, write_summary, write_total, DETAIL_HEADERS, SUMMARY_HEADERS};
