//! In-memory tabular structure produced by the file loaders.
//!
//! Columns are stored column-major with an explicit kind classification,
//! so every downstream stage matches on the kind instead of re-inspecting
//! values at runtime.

/// A single parsed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Parse a raw text field. Empty fields are missing; fields that parse
    /// as a finite float are numbers; non-finite parses ("NaN", "inf") are
    /// treated as missing since only finite values feed the statistics.
    pub fn from_field(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(_) => Cell::Missing,
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Column classification: numeric iff every non-missing cell is a number,
/// all-missing iff there are no non-missing cells, categorical otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    AllMissing,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::AllMissing => "all_missing",
        }
    }
}

/// Column storage matched to the classified kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    AllMissing { len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    /// Classify a column of parsed cells and build the matching storage.
    pub fn from_cells(name: String, cells: Vec<Cell>) -> Column {
        let present = cells.iter().filter(|c| !c.is_missing()).count();
        if present == 0 {
            return Column {
                name,
                data: ColumnData::AllMissing { len: cells.len() },
            };
        }

        let all_numbers = cells
            .iter()
            .all(|c| matches!(c, Cell::Number(_) | Cell::Missing));
        let data = if all_numbers {
            ColumnData::Numeric(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Number(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            // Mixed columns keep their numbers as display strings.
            ColumnData::Categorical(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Text(s) => Some(s),
                        Cell::Number(v) => Some(number_to_string(v)),
                        Cell::Missing => None,
                    })
                    .collect(),
            )
        };
        Column { name, data }
    }

    pub fn kind(&self) -> ColumnKind {
        match &self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::AllMissing { .. } => ColumnKind::AllMissing,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::AllMissing { len } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::AllMissing { len } => *len,
        }
    }
}

/// Render a cell number the way it was most likely written: integral
/// values without a trailing ".0".
fn number_to_string(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// An immutable table of named, uniform-length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    /// Build a table from column-major parsed cells. Every column must have
    /// the same length; the loaders pad short rows before calling this.
    pub fn from_cells(names: Vec<String>, cells: Vec<Vec<Cell>>) -> Table {
        let row_count = cells.first().map(|c| c.len()).unwrap_or(0);
        debug_assert!(cells.iter().all(|c| c.len() == row_count));
        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, column_cells)| Column::from_cells(name, column_cells))
            .collect();
        Table { columns, row_count }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Numeric columns in original column order. All-missing columns are
    /// excluded: they carry no values a chart or statistic could use.
    pub fn numeric_columns(&self) -> Vec<(&str, &[Option<f64>])> {
        self.columns
            .iter()
            .filter_map(|c| match &c.data {
                ColumnData::Numeric(values) => Some((c.name.as_str(), values.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Categorical columns in original column order.
    pub fn categorical_columns(&self) -> Vec<(&str, &[Option<String>])> {
        self.columns
            .iter()
            .filter_map(|c| match &c.data {
                ColumnData::Categorical(values) => Some((c.name.as_str(), values.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Deterministic estimate of the bytes held by the column storage:
    /// 8 bytes per numeric slot, 24 bytes plus string payload per
    /// categorical slot, 1 byte per all-missing slot.
    pub fn memory_usage(&self) -> u64 {
        self.columns
            .iter()
            .map(|c| match &c.data {
                ColumnData::Numeric(v) => v.len() as u64 * 8,
                ColumnData::Categorical(v) => {
                    v.len() as u64 * 24
                        + v.iter()
                            .map(|s| s.as_ref().map(|s| s.len() as u64).unwrap_or(0))
                            .sum::<u64>()
                }
                ColumnData::AllMissing { len } => *len as u64,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_parsing() {
        assert_eq!(Cell::from_field("  3.5 "), Cell::Number(3.5));
        assert_eq!(Cell::from_field("-12"), Cell::Number(-12.0));
        assert_eq!(Cell::from_field(""), Cell::Missing);
        assert_eq!(Cell::from_field("   "), Cell::Missing);
        assert_eq!(Cell::from_field("NaN"), Cell::Missing);
        assert_eq!(Cell::from_field("inf"), Cell::Missing);
        assert_eq!(Cell::from_field("north"), Cell::Text("north".to_string()));
    }

    #[test]
    fn numeric_iff_all_present_values_are_numbers() {
        let col = Column::from_cells(
            "a".to_string(),
            vec![Cell::Number(1.0), Cell::Missing, Cell::Number(2.0)],
        );
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.missing_count(), 1);

        let col = Column::from_cells(
            "b".to_string(),
            vec![Cell::Number(1.0), Cell::Text("x".to_string())],
        );
        assert_eq!(col.kind(), ColumnKind::Categorical);
    }

    #[test]
    fn all_missing_column() {
        let col = Column::from_cells("a".to_string(), vec![Cell::Missing, Cell::Missing]);
        assert_eq!(col.kind(), ColumnKind::AllMissing);
        assert_eq!(col.len(), 2);
        assert_eq!(col.missing_count(), 2);
    }

    #[test]
    fn mixed_column_stringifies_numbers() {
        let col = Column::from_cells(
            "m".to_string(),
            vec![Cell::Number(2.0), Cell::Text("two".to_string()), Cell::Number(2.5)],
        );
        match col.data {
            ColumnData::Categorical(values) => {
                assert_eq!(values[0].as_deref(), Some("2"));
                assert_eq!(values[2].as_deref(), Some("2.5"));
            }
            _ => panic!("expected categorical storage"),
        }
    }

    #[test]
    fn empty_table() {
        let table = Table::from_cells(vec![], vec![]);
        assert_eq!(table.row_count, 0);
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.memory_usage(), 0);
    }

    #[test]
    fn column_order_is_preserved() {
        let table = Table::from_cells(
            vec!["x".to_string(), "label".to_string(), "y".to_string()],
            vec![
                vec![Cell::Number(1.0)],
                vec![Cell::Text("a".to_string())],
                vec![Cell::Number(2.0)],
            ],
        );
        let numeric: Vec<&str> = table.numeric_columns().iter().map(|(n, _)| *n).collect();
        assert_eq!(numeric, vec!["x", "y"]);
        assert_eq!(table.column_names(), vec!["x", "label", "y"]);
    }
}
