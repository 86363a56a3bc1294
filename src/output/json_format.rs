//! JSON export.

use super::{export_rows, ExportRow};
use crate::error::{ExportError, ExportResult};
use crate::scanner::ScanReport;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write `report` to `path` as a JSON array of rows.
pub fn write_json(report: &ScanReport, path: &Path) -> ExportResult<()> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut writer, &export_rows(report))?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)
}

/// Read rows back from a JSON export.
pub fn read_json(path: &Path) -> ExportResult<Vec<ExportRow>> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
