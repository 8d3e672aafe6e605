//! The `correlab validate` command.

use std::path::PathBuf;

use anyhow::Result;

use correlab_core::parser::{load_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalog = load_catalog(&catalog_path)?;

    for ds in &catalog.datasets {
        let quests = catalog.quests.iter().filter(|q| q.dataset == ds.id).count();
        println!(
            "Dataset: {} ({} rows, {} columns, {} quests)",
            ds.name,
            ds.rows.len(),
            ds.columns.len(),
            quests
        );
    }

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.subject, w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
