//! ResultAggregator - turn downloaded batch output into the deliverables

use crate::config::AggregatorConfig;
use crate::error::AggregatorError;
use crate::ledger::{Ledger, SummaryRow};
use crate::writer::{write_details, write_summary, write_total};
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a run produced
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Output files read, in processing order
    pub files: Vec<PathBuf>,

    /// Detail rows written
    pub detail_rows: usize,

    /// Summary rows, as written
    pub summary: Vec<SummaryRow>,

    /// Exact grand total
    pub total_grams: Decimal,

    /// Non-blank lines without a usable result
    pub skipped_lines: usize,

    /// Entries tagged `low` certainty
    pub low_certainty: usize,

    /// Detail table path
    pub details_path: PathBuf,

    /// Summary table path
    pub summary_path: PathBuf,

    /// Total file path
    pub total_path: PathBuf,
}

/// Reads every output file and writes the detail, summary and total artifacts
pub struct ResultAggregator {
    config: AggregatorConfig,
}

impl ResultAggregator {
    /// Create an aggregator after validating its configuration
    pub fn new(config: AggregatorConfig) -> Result<Self, AggregatorError> {
        config.validate().map_err(AggregatorError::Config)?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Output files matching the naming convention, sorted by file name
    pub fn discover_output_files(&self) -> Result<Vec<PathBuf>, AggregatorError> {
        let dir = &self.config.output_dir;
        if !dir.is_dir() {
            return Err(AggregatorError::NoOutputFiles(dir.clone()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.config.matches_output(name));
            if matches && entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }

        if files.is_empty() {
            return Err(AggregatorError::NoOutputFiles(dir.clone()));
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Feed every line of every output file into a fresh ledger
    pub fn collect(&self, files: &[PathBuf]) -> Result<Ledger, AggregatorError> {
        let mut ledger = Ledger::new(self.config.unspecified_label.clone());

        for path in files {
            debug!("Reading {}", path.display());
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                ledger.ingest_line(&line?);
            }
        }

        Ok(ledger)
    }

    /// Run the whole stage
    ///
    /// The three artifacts are written even when no line held a result.
    pub fn run(&self) -> Result<AggregateReport, AggregatorError> {
        let files = self.discover_output_files()?;
        info!("Aggregating {} output file(s)", files.len());

        let ledger = self.collect(&files)?;
        if ledger.skipped() > 0 {
            warn!("{} output line(s) had no usable result", ledger.skipped());
        }

        fs::create_dir_all(&self.config.data_dir)?;
        let details_path = self.config.details_path();
        let summary_path = self.config.summary_path();
        let total_path = self.config.total_path();

        let summary = ledger.summary();
        let total_grams = ledger.grand_total();

        write_details(ledger.rows(), BufWriter::new(File::create(&details_path)?))?;
        write_summary(&summary, BufWriter::new(File::create(&summary_path)?))?;
        write_total(total_grams, BufWriter::new(File::create(&total_path)?))?;

        info!(
            "Wrote {} detail row(s) across {} substance(s) from {} result(s), total {} g",
            ledger.rows().len(),
            summary.len(),
            ledger.results(),
            total_grams
        );

        Ok(AggregateReport {
            files,
            detail_rows: ledger.rows().len(),
            summary,
            total_grams,
            skipped_lines: ledger.skipped(),
            low_certainty: ledger.low_certainty_count(),
            details_path,
            summary_path,
            total_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> AggregatorConfig {
        AggregatorConfig {
            output_dir: dir.path().join("batch_outputs"),
            data_dir: dir.path().join("data"),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let aggregator = ResultAggregator::new(config_in(&dir)).unwrap();
        assert!(matches!(
            aggregator.discover_output_files(),
            Err(AggregatorError::NoOutputFiles(_))
        ));
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(&config.output_dir).unwrap();
        for name in [
            "batch_output_b.jsonl",
            "batch_output_a.jsonl",
            "batch_error_a.log",
            "notes.txt",
        ] {
            fs::write(config.output_dir.join(name), "").unwrap();
        }

        let aggregator = ResultAggregator::new(config).unwrap();
        let names: Vec<_> = aggregator
            .discover_output_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["batch_output_a.jsonl", "batch_output_b.jsonl"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AggregatorConfig {
            output_prefix: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            ResultAggregator::new(config),
            Err(AggregatorError::Config(_))
        ));
    }
}
