//! Drugledger Domain Layer
//!
//! Value types shared by every stage of the drug-possession extraction
//! pipeline, plus the trait boundary to the external batch-inference service.
//!
//! ## Key Concepts
//!
//! - **CaseRecord**: One judgment to be analysed, keyed by its case number
//! - **DrugEntry**: One substance/amount fact the model extracted from a judgment
//! - **CaseExtraction**: The structured result for a single case
//! - **BatchJob**: A snapshot of an asynchronous, externally managed batch
//! - **BatchService**: The collaborator interface the batch runner drives
//!
//! ## Architecture
//!
//! This crate holds no I/O. Infrastructure (HTTP clients, file writers)
//! lives in the other workspace crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod case;
pub mod drug;
pub mod traits;

// Re-exports for convenience
pub use batch::{BatchJob, BatchStatus, Endpoint, FileId};
pub use case::CaseRecord;
pub use drug::{CaseExtraction, Certainty, DrugEntry};
pub use traits::BatchService;
