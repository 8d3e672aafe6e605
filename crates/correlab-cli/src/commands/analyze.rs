//! The `correlab analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::json;

use correlab_core::parser::load_catalog;
use correlab_core::statistics::{
    characterize, correlate_columns, correlation_matrix, fit_columns, predict,
};

pub fn execute(
    catalog_path: PathBuf,
    dataset_id: String,
    pair: Option<(String, String)>,
    predict_at: Option<f64>,
    format: String,
) -> Result<()> {
    let catalog = load_catalog(&catalog_path)?;
    let dataset = catalog.require_dataset(&dataset_id)?;

    let Some((x, y)) = pair else {
        let matrix = correlation_matrix(dataset)?;
        if format == "json" {
            let rows: Vec<_> = matrix
                .iter()
                .map(|(x, y, r)| json!({ "x": x, "y": y, "r": r }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        println!("Dataset: {} ({} rows)", dataset.name, dataset.rows.len());
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["X", "Y", "r", "Strength"]);
        for (x, y, r) in &matrix {
            table.add_row(vec![
                x.clone(),
                y.clone(),
                format!("{r:+.3}"),
                characterize(*r).describe(),
            ]);
        }
        println!("{table}");
        return Ok(());
    };

    let corr = correlate_columns(dataset, &x, &y)?;
    let fit = fit_columns(dataset, &x, &y)?;
    let predicted = predict_at.map(|at| predict(at, fit.slope, fit.intercept));

    if format == "json" {
        let out = json!({
            "dataset": dataset.id,
            "x": x,
            "y": y,
            "n": dataset.rows.len(),
            "correlation": corr,
            "regression": fit,
            "prediction": predict_at.zip(predicted).map(|(at, value)| json!({ "x": at, "y": value })),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Dataset: {} ({} rows)", dataset.name, dataset.rows.len());
    println!("  {y} vs {x}");
    println!("  r = {:+.3} ({})", corr.r, corr.describe());
    println!(
        "  regression: {y} = {:.3} * {x} {} {:.3}",
        fit.slope,
        if fit.intercept < 0.0 { '-' } else { '+' },
        fit.intercept.abs()
    );
    if let (Some(at), Some(value)) = (predict_at, predicted) {
        println!("  predicted {y} at {x} = {at}: {value:.3}");
    }

    Ok(())
}
