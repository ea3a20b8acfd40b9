use indexmap::IndexMap;

use crate::charts::spec::{
    BarMode, BarSeries, BoxSeries, ChartSpec, Dimension, HistogramSeries, Layout,
};
use crate::data::table::Table;
use crate::processing::characteristics::DatasetCharacteristics;
use crate::processing::statistics::pearson;

/// Fixed per-slot caps on how many columns a chart may draw.
pub const SUMMARY_SERIES_CAP: usize = 5;
pub const DISTRIBUTION_SERIES_CAP: usize = 3;
pub const BOX_SERIES_CAP: usize = 4;
pub const SCATTER_DIMENSION_CAP: usize = 3;

const SUMMARY_MEASURES: [&str; 5] = ["Mean", "Median", "Std", "Min", "Max"];

const HISTOGRAM_OPACITY: f64 = 0.7;

/// First `cap` entries of an ordered column list.
fn capped<T>(columns: &[T], cap: usize) -> &[T] {
    &columns[..columns.len().min(cap)]
}

/// Generate the chart-spec map for a table. Deterministic; a slot whose
/// precondition fails is omitted rather than emitted empty.
pub fn generate(
    table: &Table,
    characteristics: &DatasetCharacteristics,
) -> IndexMap<String, ChartSpec> {
    let numeric = table.numeric_columns();
    let categorical = table.categorical_columns();

    let mut charts = IndexMap::new();
    if let Some(spec) = summary_stats(&numeric, characteristics) {
        charts.insert("summary_stats".to_string(), spec);
    }
    if let Some(spec) = distributions(&numeric) {
        charts.insert("distributions".to_string(), spec);
    }
    if let Some(spec) = correlation(&numeric) {
        charts.insert("correlation".to_string(), spec);
    }
    if let Some(spec) = boxplots(&numeric) {
        charts.insert("boxplots".to_string(), spec);
    }
    if let Some(spec) = top_categories(&categorical, characteristics) {
        charts.insert("categorical".to_string(), spec);
    }
    if let Some(spec) = scatter_matrix(&numeric) {
        charts.insert("scatter_matrix".to_string(), spec);
    }
    charts
}

/// Grouped bars comparing the headline statistics of the first numeric
/// columns, one series per column.
fn summary_stats(
    numeric: &[(&str, &[Option<f64>])],
    characteristics: &DatasetCharacteristics,
) -> Option<ChartSpec> {
    let mut series = Vec::new();
    for (name, _) in capped(numeric, SUMMARY_SERIES_CAP) {
        let Some(stats) = characteristics.numerical_stats.get(*name) else {
            continue;
        };
        let values: Option<Vec<f64>> =
            [stats.mean, stats.median, stats.std, stats.min, stats.max]
                .into_iter()
                .collect();
        let Some(values) = values else { continue };
        series.push(BarSeries {
            name: (*name).to_string(),
            values,
        });
    }
    if series.is_empty() {
        return None;
    }

    Some(ChartSpec::GroupedBar {
        categories: SUMMARY_MEASURES.iter().map(|s| s.to_string()).collect(),
        series,
        layout: Layout {
            title: "Summary Statistics Comparison".to_string(),
            x_title: Some("Statistical Measures".to_string()),
            y_title: Some("Values".to_string()),
            bar_mode: Some(BarMode::Group),
        },
    })
}

/// Overlaid histograms of the first numeric columns, present values only.
fn distributions(numeric: &[(&str, &[Option<f64>])]) -> Option<ChartSpec> {
    if numeric.is_empty() {
        return None;
    }

    let series = capped(numeric, DISTRIBUTION_SERIES_CAP)
        .iter()
        .map(|(name, values)| HistogramSeries {
            name: format!("{name} Distribution"),
            values: values.iter().copied().flatten().collect(),
            opacity: HISTOGRAM_OPACITY,
        })
        .collect();

    Some(ChartSpec::Histogram {
        series,
        layout: Layout {
            title: "Data Distribution Analysis".to_string(),
            x_title: Some("Values".to_string()),
            y_title: Some("Frequency".to_string()),
            bar_mode: Some(BarMode::Overlay),
        },
    })
}

/// Heatmap of the pairwise Pearson correlation matrix over all numeric
/// columns, computed on pairwise-complete observations.
fn correlation(numeric: &[(&str, &[Option<f64>])]) -> Option<ChartSpec> {
    if numeric.len() < 2 {
        return None;
    }

    let names: Vec<String> = numeric.iter().map(|(name, _)| name.to_string()).collect();
    let z: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|(_, row_values)| {
            numeric
                .iter()
                .map(|(_, col_values)| pearson(row_values, col_values))
                .collect()
        })
        .collect();

    Some(ChartSpec::Heatmap {
        x: names.clone(),
        y: names,
        z,
        color_scale: "RdBu".to_string(),
        z_mid: 0.0,
        layout: Layout {
            title: "Correlation Matrix".to_string(),
            x_title: Some("Variables".to_string()),
            y_title: Some("Variables".to_string()),
            bar_mode: None,
        },
    })
}

/// One box series per numeric column with outlier points shown.
fn boxplots(numeric: &[(&str, &[Option<f64>])]) -> Option<ChartSpec> {
    if numeric.is_empty() {
        return None;
    }

    let series = capped(numeric, BOX_SERIES_CAP)
        .iter()
        .map(|(name, values)| BoxSeries {
            name: (*name).to_string(),
            values: values.iter().copied().flatten().collect(),
        })
        .collect();

    Some(ChartSpec::BoxPlot {
        series,
        show_outliers: true,
        layout: Layout {
            title: "Box Plots for Outlier Detection".to_string(),
            x_title: None,
            y_title: Some("Values".to_string()),
            bar_mode: None,
        },
    })
}

/// Bar chart of the top value counts of the first categorical column.
fn top_categories(
    categorical: &[(&str, &[Option<String>])],
    characteristics: &DatasetCharacteristics,
) -> Option<ChartSpec> {
    let (name, _) = categorical.first()?;
    let stats = characteristics.categorical_stats.get(*name)?;
    if stats.value_counts.is_empty() {
        return None;
    }

    Some(ChartSpec::Bar {
        x: stats.value_counts.keys().cloned().collect(),
        y: stats.value_counts.values().copied().collect(),
        layout: Layout {
            title: format!("Top Categories in {name}"),
            x_title: Some((*name).to_string()),
            y_title: Some("Count".to_string()),
            bar_mode: None,
        },
    })
}

/// Pairwise scatter grid over the first numeric columns; rows with any
/// missing value among those columns are dropped.
fn scatter_matrix(numeric: &[(&str, &[Option<f64>])]) -> Option<ChartSpec> {
    if numeric.len() < 2 {
        return None;
    }

    let selected = capped(numeric, SCATTER_DIMENSION_CAP);
    let row_count = selected
        .first()
        .map(|(_, values)| values.len())
        .unwrap_or(0);

    let complete_rows: Vec<usize> = (0..row_count)
        .filter(|&row| selected.iter().all(|(_, values)| values[row].is_some()))
        .collect();
    if complete_rows.is_empty() {
        return None;
    }

    let dimensions = selected
        .iter()
        .map(|(name, values)| Dimension {
            name: (*name).to_string(),
            values: complete_rows
                .iter()
                .filter_map(|&row| values[row])
                .collect(),
        })
        .collect();

    Some(ChartSpec::ScatterMatrix {
        dimensions,
        layout: Layout {
            title: "Scatter Plot Matrix".to_string(),
            x_title: None,
            y_title: None,
            bar_mode: None,
        },
    })
}
