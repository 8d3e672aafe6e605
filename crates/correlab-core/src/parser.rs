//! TOML catalog parser.
//!
//! Loads datasets and quests from TOML files and directories, and validates
//! them. Structural problems fail the load; suspicious content is reported
//! as warnings.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Catalog, Column, DataSet, Quest, Row, RowId, StrengthLabel};
use crate::statistics::correlate_columns;

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    datasets: Vec<TomlDataSet>,
    #[serde(default)]
    quests: Vec<TomlQuest>,
}

#[derive(Debug, Deserialize)]
struct TomlDataSet {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    columns: Vec<TomlColumn>,
    #[serde(default)]
    rows: Vec<TomlRow>,
}

#[derive(Debug, Deserialize)]
struct TomlColumn {
    key: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    range: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct TomlRow {
    id: RowId,
    #[serde(flatten)]
    values: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct TomlQuest {
    id: String,
    dataset: String,
    target: String,
    answers: Vec<String>,
    expected_strength: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    hint: Option<String>,
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
///
/// Cross-references between quests and datasets are not checked here, since
/// a directory may spread them over several files.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let datasets = parsed
        .datasets
        .into_iter()
        .map(convert_dataset)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid dataset in {}", source_path.display()))?;

    let quests = parsed
        .quests
        .into_iter()
        .map(|q| {
            let expected_strength: StrengthLabel = q
                .expected_strength
                .parse()
                .map_err(|e: String| anyhow::anyhow!("quest '{}': {}", q.id, e))?;
            Ok(Quest {
                id: q.id,
                dataset: q.dataset,
                target: q.target,
                valid_answer_keys: q.answers.into_iter().collect(),
                expected_strength,
                title: q.title,
                prompt: q.prompt,
                hint: q.hint,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid quest in {}", source_path.display()))?;

    Ok(Catalog { datasets, quests })
}

fn convert_dataset(ds: TomlDataSet) -> Result<DataSet> {
    let columns = ds
        .columns
        .into_iter()
        .map(|c| Column {
            label: c.label.unwrap_or_else(|| c.key.clone()),
            key: c.key,
            range: c.range.map(|[min, max]| (min, max)),
        })
        .collect();

    let rows = ds
        .rows
        .into_iter()
        .map(|row| {
            let values = row
                .values
                .into_iter()
                .map(|(key, value)| {
                    let number = match value {
                        toml::Value::Integer(n) => n as f64,
                        toml::Value::Float(f) => f,
                        other => anyhow::bail!(
                            "dataset '{}', row {}: '{}' is not a number ({})",
                            ds.id,
                            row.id,
                            key,
                            other.type_str()
                        ),
                    };
                    Ok((key, number))
                })
                .collect::<Result<BTreeMap<_, _>>>()?;
            Ok(Row { id: row.id, values })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DataSet {
        id: ds.id,
        name: ds.name,
        description: ds.description,
        columns,
        rows,
    })
}

/// Recursively load and merge all `.toml` catalog files from a directory.
///
/// Files that fail to parse and entries whose id is already taken are
/// skipped with a warning.
pub fn load_catalog_directory(dir: &Path) -> Result<Catalog> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut catalog = Catalog::default();
    collect_directory(dir, &mut catalog)?;
    Ok(catalog)
}

fn collect_directory(dir: &Path, catalog: &mut Catalog) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            collect_directory(&path, catalog)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(part) => merge(catalog, part, &path),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(())
}

fn merge(catalog: &mut Catalog, part: Catalog, source: &Path) {
    for dataset in part.datasets {
        if catalog.dataset(&dataset.id).is_some() {
            tracing::warn!(
                "{}: duplicate dataset id '{}', keeping the first",
                source.display(),
                dataset.id
            );
        } else {
            catalog.datasets.push(dataset);
        }
    }
    for quest in part.quests {
        if catalog.quest(&quest.id).is_some() {
            tracing::warn!(
                "{}: duplicate quest id '{}', keeping the first",
                source.display(),
                quest.id
            );
        } else {
            catalog.quests.push(quest);
        }
    }
}

/// Load a catalog file or directory and reject it if it is malformed.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let catalog = if path.is_dir() {
        load_catalog_directory(path)?
    } else {
        parse_catalog(path)?
    };

    catalog
        .validate()
        .with_context(|| format!("invalid catalog: {}", path.display()))?;

    tracing::info!(
        datasets = catalog.datasets.len(),
        quests = catalog.quests.len(),
        "loaded catalog from {}",
        path.display()
    );
    Ok(catalog)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The dataset or quest ID the warning is about.
    pub subject: String,
    /// Warning message.
    pub message: String,
}

/// Check a structurally valid catalog for content that looks wrong.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Values outside a declared range
    for ds in &catalog.datasets {
        for column in &ds.columns {
            let Some((min, max)) = column.range else {
                continue;
            };
            let outside = ds
                .rows
                .iter()
                .filter(|r| r.get(&column.key).is_some_and(|v| v < min || v > max))
                .count();
            if outside > 0 {
                warnings.push(ValidationWarning {
                    subject: ds.id.clone(),
                    message: format!(
                        "{outside} value(s) of '{}' outside [{min}, {max}]",
                        column.key
                    ),
                });
            }
        }
    }

    // Expected strength that the data does not show
    for quest in &catalog.quests {
        let Some(ds) = catalog.dataset(&quest.dataset) else {
            continue;
        };
        for key in &quest.valid_answer_keys {
            if let Ok(measured) = correlate_columns(ds, &quest.target, key) {
                if measured.strength != quest.expected_strength {
                    warnings.push(ValidationWarning {
                        subject: quest.id.clone(),
                        message: format!(
                            "expected {} but '{}' vs '{}' measures {} (r = {:.2})",
                            quest.expected_strength,
                            quest.target,
                            key,
                            measured.strength,
                            measured.r
                        ),
                    });
                }
            }
        }
    }

    // Answers that cannot be told apart from the target
    for quest in &catalog.quests {
        if quest.valid_answer_keys.contains(&quest.target) {
            warnings.push(ValidationWarning {
                subject: quest.id.clone(),
                message: "the target column is listed as a valid answer".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[datasets]]
id = "students"
name = "Students"
description = "Study habits of a small class"

[[datasets.columns]]
key = "hours"
label = "Hours studied"
range = [0, 12]

[[datasets.columns]]
key = "score"
label = "Exam score"
range = [0, 100]

[[datasets.columns]]
key = "height"
label = "Height (cm)"

[[datasets.rows]]
id = 1
hours = 1
score = 52.0
height = 170.0

[[datasets.rows]]
id = 2
hours = 3.5
score = 64.0
height = 181.0

[[datasets.rows]]
id = "transfer-1"
hours = 6
score = 80.0
height = 165.0

[[datasets.rows]]
id = 4
hours = 8
score = 91.0
height = 172.0

[[quests]]
id = "study-pays"
dataset = "students"
target = "hours"
answers = ["score"]
expected_strength = "very strong"
title = "Does studying pay off?"
"#;

    #[test]
    fn parse_valid_toml() {
        let catalog = parse_catalog_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(catalog.datasets.len(), 1);
        let ds = &catalog.datasets[0];
        assert_eq!(ds.columns.len(), 3);
        assert_eq!(ds.columns[0].range, Some((0.0, 12.0)));
        assert_eq!(ds.rows[2].id, RowId::Text("transfer-1".into()));
        assert_eq!(ds.rows[0].get("hours"), Some(1.0));
        assert_eq!(ds.rows[1].get("hours"), Some(3.5));

        let quest = &catalog.quests[0];
        assert_eq!(quest.expected_strength, StrengthLabel::VeryStrong);
        assert!(quest.valid_answer_keys.contains("score"));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn label_defaults_to_key() {
        let toml = r#"
[[datasets]]
id = "tiny"
name = "Tiny"

[[datasets.columns]]
key = "a"

[[datasets.columns]]
key = "b"

[[datasets.rows]]
id = 1
a = 1
b = 2
"#;
        let catalog = parse_catalog_str(toml, &PathBuf::from("tiny.toml")).unwrap();
        assert_eq!(catalog.datasets[0].columns[0].label, "a");
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let toml = r#"
[[datasets]]
id = "bad"
name = "Bad"

[[datasets.columns]]
key = "a"

[[datasets.rows]]
id = 1
a = "seven"
"#;
        let err = parse_catalog_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("not a number"));
    }

    #[test]
    fn unknown_strength_is_rejected() {
        let toml = r#"
[[quests]]
id = "q"
dataset = "students"
target = "hours"
answers = ["score"]
expected_strength = "moderate"
"#;
        assert!(parse_catalog_str(toml, &PathBuf::from("q.toml")).is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_catalog_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_catalog_rejects_empty_answers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        let broken = VALID_TOML.replace(r#"answers = ["score"]"#, "answers = []");
        std::fs::write(&path, broken).unwrap();

        let err = load_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("no valid answer keys"));
    }

    #[test]
    fn load_directory_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        let (data, quests) = VALID_TOML.split_at(VALID_TOML.find("[[quests]]").unwrap());
        std::fs::write(dir.path().join("a-data.toml"), data).unwrap();
        std::fs::create_dir(dir.path().join("quests")).unwrap();
        std::fs::write(dir.path().join("quests/b.toml"), quests).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[[[").unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.datasets.len(), 1);
        assert_eq!(catalog.quests.len(), 1);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        let renamed = VALID_TOML.replace("name = \"Students\"", "name = \"Copy\"");
        std::fs::write(dir.path().join("b.toml"), renamed).unwrap();

        let catalog = load_catalog_directory(dir.path()).unwrap();
        assert_eq!(catalog.datasets.len(), 1);
        assert_eq!(catalog.datasets[0].name, "Students");
        assert_eq!(catalog.quests.len(), 1);
    }

    #[test]
    fn warns_on_strength_mismatch_and_range() {
        let toml = VALID_TOML
            .replace("very strong", "weak")
            .replace("score = 91.0", "score = 191.0");
        let catalog = parse_catalog_str(&toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_catalog(&catalog);
        assert!(warnings
            .iter()
            .any(|w| w.subject == "study-pays" && w.message.contains("expected weak")));
        assert!(warnings
            .iter()
            .any(|w| w.subject == "students" && w.message.contains("outside [0, 100]")));
    }

    #[test]
    fn clean_catalog_has_no_warnings() {
        let catalog = parse_catalog_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert!(validate_catalog(&catalog).is_empty());
    }
}
