use indexmap::IndexMap;
use serde::Serialize;

use crate::data::table::{ColumnData, Table};
use crate::processing::statistics::NumericSummary;

/// Categorical frequency tables keep at most this many entries.
pub const TOP_VALUE_COUNT: usize = 10;

/// Everything the presentation layer needs to describe a dataset.
/// All maps are keyed by column name in original column order.
#[derive(Debug, Serialize)]
pub struct DatasetCharacteristics {
    pub basic_info: BasicInfo,
    pub missing_data: MissingData,
    pub numerical_stats: IndexMap<String, NumericSummary>,
    pub categorical_stats: IndexMap<String, CategoricalSummary>,
}

#[derive(Debug, Serialize)]
pub struct BasicInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub data_types: IndexMap<String, String>,
    pub memory_usage: u64,
}

#[derive(Debug, Serialize)]
pub struct MissingData {
    pub missing_counts: IndexMap<String, usize>,
    pub missing_percentages: IndexMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct CategoricalSummary {
    pub unique_values: usize,
    pub most_frequent: Option<String>,
    pub most_frequent_count: Option<usize>,
    /// Top values by descending count, ties in first-encounter order.
    pub value_counts: IndexMap<String, usize>,
}

impl CategoricalSummary {
    pub fn compute(values: &[Option<String>]) -> Self {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for value in values.iter().flatten() {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }
        let unique_values = counts.len();

        // Stable sort keeps ties in the order the values were first seen.
        counts.sort_by(|_, a, _, b| b.cmp(a));

        let most_frequent = counts.get_index(0).map(|(value, _)| value.to_string());
        let most_frequent_count = counts.get_index(0).map(|(_, count)| *count);
        let value_counts = counts
            .iter()
            .take(TOP_VALUE_COUNT)
            .map(|(value, count)| (value.to_string(), *count))
            .collect();

        CategoricalSummary {
            unique_values,
            most_frequent,
            most_frequent_count,
            value_counts,
        }
    }
}

/// Extract dataset characteristics from a table. Pure and infallible:
/// absent values become nulls or omitted entries, never errors.
pub fn extract(table: &Table) -> DatasetCharacteristics {
    let mut data_types = IndexMap::new();
    let mut missing_counts = IndexMap::new();
    let mut missing_percentages = IndexMap::new();
    let mut numerical_stats = IndexMap::new();
    let mut categorical_stats = IndexMap::new();

    for column in &table.columns {
        data_types.insert(column.name.clone(), column.kind().label().to_string());

        let missing = column.missing_count();
        missing_counts.insert(column.name.clone(), missing);
        missing_percentages.insert(column.name.clone(), missing_percentage(missing, table.row_count));

        match &column.data {
            ColumnData::Numeric(values) => {
                numerical_stats.insert(column.name.clone(), NumericSummary::compute(values));
            }
            ColumnData::AllMissing { len } if *len > 0 => {
                // An all-missing column is still a numeric column with
                // every statistic null, as in the original system.
                numerical_stats.insert(column.name.clone(), NumericSummary::empty());
            }
            ColumnData::AllMissing { .. } => {}
            ColumnData::Categorical(values) => {
                categorical_stats.insert(column.name.clone(), CategoricalSummary::compute(values));
            }
        }
    }

    DatasetCharacteristics {
        basic_info: BasicInfo {
            rows: table.row_count,
            columns: table.column_count(),
            column_names: table.column_names().iter().map(|s| s.to_string()).collect(),
            data_types,
            memory_usage: table.memory_usage(),
        },
        missing_data: MissingData {
            missing_counts,
            missing_percentages,
        },
        numerical_stats,
        categorical_stats,
    }
}

/// `missing / rows * 100` rounded to two decimals; 0.0 for a zero-row table.
fn missing_percentage(missing: usize, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    round2(missing as f64 / rows as f64 * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{Cell, Table};

    fn table_with(names: &[&str], columns: Vec<Vec<Cell>>) -> Table {
        Table::from_cells(names.iter().map(|s| s.to_string()).collect(), columns)
    }

    fn numbers(values: &[Option<f64>]) -> Vec<Cell> {
        values
            .iter()
            .map(|v| match v {
                Some(v) => Cell::Number(*v),
                None => Cell::Missing,
            })
            .collect()
    }

    fn texts(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|s| Cell::Text(s.to_string())).collect()
    }

    #[test]
    fn missing_percentage_is_rounded() {
        let mut cells: Vec<Cell> = vec![Cell::Missing; 10];
        cells.extend(numbers(&vec![Some(1.0); 90]));
        let table = table_with(&["col"], vec![cells]);
        let characteristics = extract(&table);
        assert_eq!(characteristics.missing_data.missing_counts["col"], 10);
        assert_eq!(characteristics.missing_data.missing_percentages["col"], 10.0);

        // 1 of 3 missing rounds to 33.33.
        let table = table_with(&["col"], vec![numbers(&[None, Some(1.0), Some(2.0)])]);
        let characteristics = extract(&table);
        assert_eq!(characteristics.missing_data.missing_percentages["col"], 33.33);
    }

    #[test]
    fn zero_row_table_has_zero_percentages_and_no_stats() {
        let table = table_with(&["a", "b"], vec![vec![], vec![]]);
        let characteristics = extract(&table);
        assert_eq!(characteristics.basic_info.rows, 0);
        assert_eq!(characteristics.basic_info.columns, 2);
        assert_eq!(characteristics.missing_data.missing_percentages["a"], 0.0);
        assert_eq!(characteristics.missing_data.missing_percentages["b"], 0.0);
        assert!(characteristics.numerical_stats.is_empty());
        assert!(characteristics.categorical_stats.is_empty());
    }

    #[test]
    fn all_missing_column_reports_null_stats() {
        let table = table_with(&["gaps"], vec![vec![Cell::Missing; 5]]);
        let characteristics = extract(&table);
        let summary = &characteristics.numerical_stats["gaps"];
        assert!(summary.mean.is_none());
        assert!(summary.median.is_none());
        assert!(summary.std.is_none());
        assert!(summary.min.is_none());
        assert!(summary.max.is_none());
        assert!(summary.q25.is_none());
        assert!(summary.q75.is_none());
        assert!(summary.skewness.is_none());
        assert!(summary.kurtosis.is_none());
        assert_eq!(characteristics.missing_data.missing_percentages["gaps"], 100.0);
    }

    #[test]
    fn numeric_stats_use_present_values_only() {
        let mut values: Vec<Option<f64>> = (1..=90).map(|v| Some(v as f64)).collect();
        values.extend(std::iter::repeat(None).take(10));
        let table = table_with(&["col"], vec![numbers(&values)]);
        let characteristics = extract(&table);
        let summary = &characteristics.numerical_stats["col"];
        assert_eq!(summary.mean, Some(45.5));
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(90.0));
    }

    #[test]
    fn top_values_are_capped_and_sorted() {
        // 12 distinct values; "v0" appears 13 times, "v1" 12 times, etc.
        let mut raw = Vec::new();
        for i in 0..12 {
            for _ in 0..(13 - i) {
                raw.push(format!("v{i}"));
            }
        }
        let cells: Vec<Cell> = raw.iter().map(|s| Cell::Text(s.clone())).collect();
        let table = table_with(&["cat"], vec![cells]);
        let characteristics = extract(&table);
        let summary = &characteristics.categorical_stats["cat"];

        assert_eq!(summary.unique_values, 12);
        assert_eq!(summary.most_frequent.as_deref(), Some("v0"));
        assert_eq!(summary.most_frequent_count, Some(13));
        assert_eq!(summary.value_counts.len(), TOP_VALUE_COUNT);
        let counts: Vec<usize> = summary.value_counts.values().copied().collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(counts, sorted);
    }

    #[test]
    fn tied_counts_keep_encounter_order() {
        let table = table_with(&["cat"], vec![texts(&["b", "a", "b", "a", "c"])]);
        let characteristics = extract(&table);
        let summary = &characteristics.categorical_stats["cat"];
        let keys: Vec<&str> = summary.value_counts.keys().map(|s| s.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(summary.most_frequent.as_deref(), Some("b"));
    }

    #[test]
    fn declared_types_follow_classification() {
        let table = table_with(
            &["n", "c", "m"],
            vec![
                numbers(&[Some(1.0)]),
                texts(&["x"]),
                vec![Cell::Missing],
            ],
        );
        let characteristics = extract(&table);
        assert_eq!(characteristics.basic_info.data_types["n"], "numeric");
        assert_eq!(characteristics.basic_info.data_types["c"], "categorical");
        assert_eq!(characteristics.basic_info.data_types["m"], "all_missing");
    }
}
