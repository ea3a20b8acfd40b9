use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::data::table::{Cell, Table};
use crate::error::DataLoadError;

/// Load a data file into a table, dispatching on the file extension.
/// The first row of delimited and spreadsheet files is the header.
pub fn load_file(path: &Path) -> Result<Table, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "xls" | "xlsx" => load_excel(path),
        "json" => load_json(path),
        "txt" => load_txt(path),
        _ => Err(DataLoadError::UnsupportedExtension(ext)),
    }
}

/// Tab-separated first, then space-separated. When both parses fail the
/// space-separated error is reported, since it is the last attempt made.
fn load_txt(path: &Path) -> Result<Table, DataLoadError> {
    match load_delimited(path, b'\t') {
        Ok(table) => Ok(table),
        Err(_) => load_delimited(path, b' '),
    }
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, DataLoadError> {
    let text = read_text(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let names: Vec<String> = reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    if names.is_empty() {
        return Err(DataLoadError::Malformed("No data found in file".to_string()));
    }

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for record in reader.records() {
        let record = record?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(Cell::from_field(record.get(col_idx).unwrap_or("")));
        }
    }

    Ok(Table::from_cells(names, cells))
}

/// Read a file as UTF-8, falling back to latin1 (each byte maps to the
/// same Unicode code point).
fn read_text(path: &Path) -> Result<String, DataLoadError> {
    let content = std::fs::read(path)?;
    Ok(match String::from_utf8(content) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

fn load_excel(path: &Path) -> Result<Table, DataLoadError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .ok_or_else(|| DataLoadError::Malformed("No sheets found".to_string()))?
        .clone();

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| DataLoadError::Malformed("No data in sheet".to_string()))?;
    let names: Vec<String> = header
        .iter()
        .map(|c| excel_cell_text(c).trim().to_string())
        .collect();

    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(excel_cell(row.get(col_idx)));
        }
    }

    Ok(Table::from_cells(names, cells))
}

fn excel_cell(cell: Option<&calamine::Data>) -> Cell {
    use calamine::Data;

    match cell {
        None | Some(Data::Empty) => Cell::Missing,
        Some(Data::Float(f)) if f.is_finite() => Cell::Number(*f),
        Some(Data::Float(_)) => Cell::Missing,
        Some(Data::Int(i)) => Cell::Number(*i as f64),
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Missing
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        Some(other) => Cell::Text(excel_cell_text(other)),
    }
}

fn excel_cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

fn load_json(path: &Path) -> Result<Table, DataLoadError> {
    let content = std::fs::read(path)?;
    let document: Value = serde_json::from_slice(&content)?;

    match document {
        Value::Array(records) => table_from_records(&records),
        Value::Object(columns) => table_from_columns(&columns),
        _ => Err(DataLoadError::Malformed(
            "JSON document must be an array of records or a map of column arrays".to_string(),
        )),
    }
}

/// Array-of-records layout. Column order is the first-encounter order of
/// keys across the records; keys absent from a record become missing.
fn table_from_records(records: &[Value]) -> Result<Table, DataLoadError> {
    let mut columns: IndexMap<String, Vec<Cell>> = IndexMap::new();

    for (row_idx, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| {
            DataLoadError::Malformed("JSON array elements must be objects".to_string())
        })?;
        for (key, value) in object {
            let cells = columns
                .entry(key.clone())
                .or_insert_with(|| vec![Cell::Missing; row_idx]);
            cells.push(json_cell(value));
        }
        for cells in columns.values_mut() {
            if cells.len() <= row_idx {
                cells.push(Cell::Missing);
            }
        }
    }

    let (names, cells) = columns.into_iter().unzip();
    Ok(Table::from_cells(names, cells))
}

/// Columnar layout: a map of equal-length value arrays.
fn table_from_columns(columns: &serde_json::Map<String, Value>) -> Result<Table, DataLoadError> {
    let mut names = Vec::with_capacity(columns.len());
    let mut cells = Vec::with_capacity(columns.len());
    let mut expected_len: Option<usize> = None;

    for (key, value) in columns {
        let array = value.as_array().ok_or_else(|| {
            DataLoadError::Malformed("JSON column values must be arrays".to_string())
        })?;
        match expected_len {
            None => expected_len = Some(array.len()),
            Some(len) if len != array.len() => {
                return Err(DataLoadError::Malformed(
                    "JSON columns have unequal lengths".to_string(),
                ));
            }
            Some(_) => {}
        }
        names.push(key.clone());
        cells.push(array.iter().map(json_cell).collect());
    }

    Ok(Table::from_cells(names, cells))
}

fn json_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Missing,
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Missing
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        Value::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::ColumnKind;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "data.csv", b"Sales,Region\n100,North\n200,South\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count, 2);
        assert_eq!(table.column_names(), vec!["Sales", "Region"]);
        assert_eq!(table.columns[0].kind(), ColumnKind::Numeric);
        assert_eq!(table.columns[1].kind(), ColumnKind::Categorical);
    }

    #[test]
    fn csv_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // "Café" in latin1: the 0xE9 byte is not valid UTF-8.
        let path = write_fixture(&dir, "data.csv", b"Name\nCaf\xe9\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count, 1);
        assert_eq!(table.columns[0].kind(), ColumnKind::Categorical);
    }

    #[test]
    fn ragged_csv_is_a_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "data.csv", b"a,b\n1,2,3\n");
        assert!(matches!(load_file(&path), Err(DataLoadError::Csv(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "image.bmp", b"BM");
        match load_file(&path) {
            Err(DataLoadError::UnsupportedExtension(ext)) => assert_eq!(ext, "bmp"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn txt_prefers_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "data.txt", b"a\tb\n1\t2\n3\t4\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count, 2);
    }

    #[test]
    fn txt_falls_back_to_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "plain.txt", b"a b\n1 2\n3 4\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.columns[0].kind(), ColumnKind::Numeric);
    }

    #[test]
    fn txt_double_failure_reports_fallback_error() {
        let dir = tempfile::tempdir().unwrap();
        // Ragged under both tab and space splitting.
        let path = write_fixture(&dir, "bad.txt", b"a\tb c\n1\t2\t3 4 5\n");
        assert!(matches!(load_file(&path), Err(DataLoadError::Csv(_))));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "data.json",
            br#"[{"x": 1, "label": "a"}, {"x": 2.5}, {"x": null, "label": "b"}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count, 3);
        assert_eq!(table.column_names(), vec!["x", "label"]);
        assert_eq!(table.columns[0].kind(), ColumnKind::Numeric);
        assert_eq!(table.columns[0].missing_count(), 1);
        assert_eq!(table.columns[1].missing_count(), 1);
    }

    #[test]
    fn loads_columnar_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "data.json",
            br#"{"x": [1, 2, 3], "label": ["a", "b", "c"]}"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.row_count, 3);
        assert_eq!(table.column_names(), vec!["x", "label"]);
    }

    #[test]
    fn columnar_json_length_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "data.json", br#"{"x": [1, 2], "y": [1]}"#);
        assert!(matches!(load_file(&path), Err(DataLoadError::Malformed(_))));
    }

    #[test]
    fn scalar_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "data.json", b"42");
        assert!(matches!(load_file(&path), Err(DataLoadError::Malformed(_))));
    }
}
