use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{KitscopeError, Result};
use crate::models::{Catalog, RawRecord};

const REQUIRED_COLUMNS: [&str; 4] = ["id", "equipment_type", "manufacturer", "model"];

/// Read a catalog from a CSV file with a header row.
pub fn read_records(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(KitscopeError::InputNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let catalog = read_records_from(BufReader::new(file))?;
    info!(path = %path.display(), records = catalog.len(), "loaded equipment catalog");
    Ok(catalog)
}

/// Read a catalog from any CSV source. Unknown columns are ignored.
pub fn read_records_from<R: Read>(source: R) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(KitscopeError::MissingColumn(column.to_string()));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRecord>() {
        rows.push(result?);
    }
    debug!(rows = rows.len(), "parsed csv rows");

    Catalog::from_raw(rows)
}

/// Write serializable rows as CSV, creating parent directories as needed.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_rows_to(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

/// Write serializable rows as CSV to any sink. The header comes from the row type.
pub fn write_rows_to<W: Write, T: Serialize>(sink: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
id,uuid,equipment_type,manufacturer,model,extra
1,u-1,panel,Q CELLS,Q.PEAK-DUO-400,x
2,u-2,panel,QCELLS,QPEAK DUO 400,y
3,,inverter,,,z
";

    #[test]
    fn reads_rows_and_blanks() {
        let catalog = read_records_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let first = &catalog.records()[0];
        assert_eq!(first.uuid, "u-1");
        assert_eq!(first.manufacturer, "Q CELLS");

        let blank = &catalog.records()[2];
        assert_eq!(blank.uuid, "");
        assert_eq!(blank.manufacturer, "");
        assert_eq!(blank.model, "");
    }

    #[test]
    fn missing_required_column_is_reported() {
        let input = "id,equipment_type,manufacturer\n1,panel,Enphase\n";
        let err = read_records_from(input.as_bytes()).unwrap_err();
        assert!(matches!(err, KitscopeError::MissingColumn(ref c) if c == "model"));
    }

    #[test]
    fn malformed_id_fails_the_whole_read() {
        let input = "id,equipment_type,manufacturer,model\n1,panel,A,B\nabc,panel,C,D\n";
        let err = read_records_from(input.as_bytes()).unwrap_err();
        assert!(matches!(err, KitscopeError::InvalidRecordId { row: 2, .. }));
    }

    #[test]
    fn read_records_reports_missing_file() {
        let err = read_records(Path::new("/tmp/kitscope_missing_input.csv")).unwrap_err();
        assert!(matches!(err, KitscopeError::InputNotFound(_)));
    }

    #[derive(Serialize)]
    struct Row {
        action: &'static str,
        count: usize,
    }

    #[test]
    fn write_rows_creates_parent_and_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("rows.csv");

        write_rows(
            &path,
            &[
                Row { action: "DELETE", count: 2 },
                Row { action: "KEEP", count: 1 },
            ],
        )
        .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "action,count\nDELETE,2\nKEEP,1\n");
    }

    #[test]
    fn file_roundtrip_through_read_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equipments.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = read_records(&path).unwrap();
        assert_eq!(catalog.records()[1].model, "QPEAK DUO 400");
    }
}
