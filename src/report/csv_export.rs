//! CSV exports of the ranked and fresh result sets

use async_trait::async_trait;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{row_fields, ReportSink, COLUMNS};
use crate::error::ScreenResult;
use crate::models::screening::{ScreenReport, ScreeningResult};

/// Spreadsheet applications need the BOM to pick UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct CsvSink {
    output_dir: PathBuf,
    prefix: String,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn all_results_path(&self, report: &ScreenReport) -> PathBuf {
        self.path_for("all_results", report)
    }

    pub fn fresh_path(&self, report: &ScreenReport) -> PathBuf {
        self.path_for("fresh_crossovers", report)
    }

    fn path_for(&self, kind: &str, report: &ScreenReport) -> PathBuf {
        let stamp = report.generated_at.format("%Y%m%d");
        self.output_dir
            .join(format!("{}_{}_{}.csv", self.prefix, kind, stamp))
    }

    /// Write both exports, each only when its set is non-empty. Returns the
    /// files written.
    pub fn export(&self, report: &ScreenReport) -> ScreenResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        if report.results.is_empty() {
            return Ok(written);
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let all_path = self.all_results_path(report);
        write_results(&all_path, &report.results)?;
        info!(path = %all_path.display(), rows = report.results.len(), "All results saved");
        written.push(all_path);

        if !report.fresh.is_empty() {
            let fresh_path = self.fresh_path(report);
            write_results(&fresh_path, &report.fresh)?;
            info!(path = %fresh_path.display(), rows = report.fresh.len(), "Fresh crossovers saved");
            written.push(fresh_path);
        }

        Ok(written)
    }
}

#[async_trait]
impl ReportSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn publish(&self, report: &ScreenReport) -> ScreenResult<()> {
        self.export(report).map(|_| ())
    }
}

/// Write one result set with a header row.
pub fn write_results(path: &Path, results: &[ScreeningResult]) -> ScreenResult<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = Writer::from_writer(file);
    writer.write_record(COLUMNS)?;
    for result in results {
        writer.write_record(row_fields(result))?;
    }
    writer.flush()?;
    Ok(())
}
