use crate::error::{Error, Result};
use crate::table::PointTable;

/// Filename and MIME type an artifact is delivered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub mime: &'static str,
}

pub const CSV_FILE: ExportFile = ExportFile {
    file_name: "points.csv",
    mime: "text/csv",
};

pub const PDF_FILE: ExportFile = ExportFile {
    file_name: "report.pdf",
    mime: "application/pdf",
};

pub const SVG_FILE: ExportFile = ExportFile {
    file_name: "chart.svg",
    mime: "image/svg+xml",
};

pub const PNG_FILE: ExportFile = ExportFile {
    file_name: "chart.png",
    mime: "image/png",
};

/// UTF-8 CSV with a header row and one record per point; no index column.
pub fn export_csv(table: &PointTable) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::with_capacity(32 * (table.len() + 1)));
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.cells())?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    tracing::debug!(rows = table.len(), bytes = bytes.len(), "csv exported");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CircleSpec, Unit};
    use crate::points::generate_points;

    fn table_for(spec: &CircleSpec) -> PointTable {
        PointTable::from_points(&generate_points(spec), spec.unit)
    }

    #[test]
    fn writes_header_and_rows() {
        let spec = CircleSpec::new(0.0, 0.0, 5.0, 4).with_unit(Unit::Cm);
        let csv = String::from_utf8(export_csv(&table_for(&spec)).unwrap()).unwrap();
        let expected = "X (cm),Y (cm),angle_deg\n\
                        5.000000,0.000000,0.000\n\
                        0.000000,5.000000,90.000\n\
                        -5.000000,0.000000,180.000\n\
                        0.000000,-5.000000,270.000\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn output_is_deterministic() {
        let spec = CircleSpec::new(1.25, -3.5, 7.75, 123);
        let first = export_csv(&table_for(&spec)).unwrap();
        let second = export_csv(&table_for(&spec.clone())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn round_trips_through_a_reader() {
        let spec = CircleSpec::new(-2.0, 9.0, 3.3, 37);
        let table = table_for(&spec);
        let bytes = export_csv(&table).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), table.headers.iter().map(String::as_str).collect::<Vec<_>>());
        let mut count = 0;
        for (record, row) in reader.records().zip(&table.rows) {
            let record = record.unwrap();
            let x: f64 = record[0].parse().unwrap();
            let y: f64 = record[1].parse().unwrap();
            let angle: f64 = record[2].parse().unwrap();
            assert!((x - row.x).abs() < 1e-9);
            assert!((y - row.y).abs() < 1e-9);
            assert!((angle - row.angle_deg).abs() < 1e-9);
            count += 1;
        }
        assert_eq!(count, 37);
    }

    #[test]
    fn descriptors_match_download_names() {
        assert_eq!(CSV_FILE.file_name, "points.csv");
        assert_eq!(CSV_FILE.mime, "text/csv");
        assert_eq!(PDF_FILE.file_name, "report.pdf");
        assert_eq!(PDF_FILE.mime, "application/pdf");
    }
}
