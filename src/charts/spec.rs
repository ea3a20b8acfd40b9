use serde::Serialize;

/// Layout metadata shared by every chart kind.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
}

/// How multiple bar series share the category axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Overlay,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dimension {
    pub name: String,
    pub values: Vec<f64>,
}

/// A declarative, renderer-agnostic description of one chart: the kind
/// tag, its data arrays, and layout metadata. No rendering happens here;
/// the downstream renderer consumes the serialized form.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    GroupedBar {
        categories: Vec<String>,
        series: Vec<BarSeries>,
        layout: Layout,
    },
    Histogram {
        series: Vec<HistogramSeries>,
        layout: Layout,
    },
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        /// Row-major correlation values; null marks an undefined pair.
        z: Vec<Vec<Option<f64>>>,
        color_scale: String,
        z_mid: f64,
        layout: Layout,
    },
    BoxPlot {
        series: Vec<BoxSeries>,
        show_outliers: bool,
        layout: Layout,
    },
    Bar {
        x: Vec<String>,
        y: Vec<usize>,
        layout: Layout,
    },
    ScatterMatrix {
        dimensions: Vec<Dimension>,
        layout: Layout,
    },
}
