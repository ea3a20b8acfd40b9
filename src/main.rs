use std::path::PathBuf;

use anyhow::Context;

use datascope::data::loader;
use datascope::demo;
use datascope::upload::{analyze_table, RenderContext};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let arg = std::env::args()
        .nth(1)
        .context("usage: datascope <data-file> | --demo")?;

    let context = if arg == "--demo" {
        let table = demo::demo_table();
        let (characteristics, visualizations) = analyze_table(&table);
        RenderContext {
            filename: "demo_data.csv".to_string(),
            characteristics,
            visualizations,
        }
    } else {
        let path = PathBuf::from(&arg);
        let table = loader::load_file(&path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(arg.as_str())
            .to_string();
        let (characteristics, visualizations) = analyze_table(&table);
        RenderContext {
            filename,
            characteristics,
            visualizations,
        }
    };

    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
