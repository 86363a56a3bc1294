//! CSV export.

use super::{export_rows, ExportRow};
use crate::error::{ExportError, ExportResult};
use crate::scanner::ScanReport;
use std::fs::File;
use std::path::Path;

/// Write `report` to `path` with a `port,status,service,response_time` header.
pub fn write_csv(report: &ScanReport, path: &Path) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut wtr = csv::Writer::from_writer(file);

    // Header comes from ExportRow's field names
    for row in export_rows(report) {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read rows back from a CSV export.
pub fn read_csv(path: &Path) -> ExportResult<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<Result<Vec<ExportRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;

    #[test]
    fn test_csv_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("port,status,service,response_time"));
        assert_eq!(lines.next(), Some("22,open,ssh,1.234567891"));
        assert_eq!(lines.next(), Some("81,closed,Unknown,0.25"));
        assert_eq!(lines.next(), Some("8443,possibly filtered,https-alt,1000.456789"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = sample_report();

        write_csv(&report, &path).unwrap();
        let rows = read_csv(&path).unwrap();

        assert_eq!(rows.len(), report.len());
        for (row, entry) in rows.iter().zip(report.entries()) {
            assert_eq!(row.port, entry.result.port.as_u16());
            assert_eq!(row.response_time, entry.result.latency_ms);
        }
    }
}
