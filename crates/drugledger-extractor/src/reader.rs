//! Case table reader

use crate::error::ExtractorError;
use drugledger_domain::CaseRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Column holding the case number
pub const CASE_NUMBER_COLUMN: &str = "case_number";

/// Column holding the judgment text
pub const JUDGMENT_COLUMN: &str = "judgment";

/// Read every case from a CSV file with a header row
pub fn read_cases(path: impl AsRef<Path>) -> Result<Vec<CaseRecord>, ExtractorError> {
    let path = path.as_ref();
    debug!("Reading cases from {}", path.display());
    read_cases_from(File::open(path)?)
}

/// Read every case from CSV data with a header row
///
/// Fails with `MissingColumn` before reading any row if either required
/// column is absent. An empty judgment cell yields an empty judgment.
pub fn read_cases_from<R: Read>(input: R) -> Result<Vec<CaseRecord>, ExtractorError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| ExtractorError::MissingColumn(name.to_string()))
    };
    let case_idx = column(CASE_NUMBER_COLUMN)?;
    let judgment_idx = column(JUDGMENT_COLUMN)?;

    let mut cases = Vec::new();
    for record in reader.records() {
        let record = record?;
        let case_id = record.get(case_idx).unwrap_or_default();
        let judgment = record.get(judgment_idx).unwrap_or_default();
        cases.push(CaseRecord::new(case_id, judgment));
    }

    debug!("Read {} case(s)", cases.len());
    Ok(cases)
}
