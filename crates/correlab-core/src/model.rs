//! Core data model types for correlab.
//!
//! Datasets, columns and rows are read-only inputs; quests declare which
//! column pairs count as a correct relationship to find.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One numeric attribute extractable from every row of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Key unique within the dataset.
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Expected `[min, max]` range of values, if declared.
    #[serde(default)]
    pub range: Option<(f64, f64)>,
}

/// Stable identifier of a row, unique within its dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Int(n)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}

/// A single observation: column key to value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new(id: impl Into<RowId>, values: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            id: id.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Value of `key`, if the row carries it.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// A named table of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Unique identifier within the catalog.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the data describes.
    #[serde(default)]
    pub description: String,
    /// Declared numeric columns.
    pub columns: Vec<Column>,
    /// Observations.
    pub rows: Vec<Row>,
}

impl DataSet {
    /// Look up a declared column.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    /// Extract every row's value for `key`, in row order.
    pub fn column_values(&self, key: &str) -> Result<Vec<f64>, CoreError> {
        if !self.has_column(key) {
            return Err(CoreError::UnknownColumn {
                dataset: self.id.clone(),
                key: key.to_string(),
            });
        }
        if self.rows.is_empty() {
            return Err(CoreError::EmptyDataset(self.id.clone()));
        }
        self.rows
            .iter()
            .map(|row| match row.get(key) {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(CoreError::NonFiniteValue {
                    dataset: self.id.clone(),
                    row: row.id.to_string(),
                    key: key.to_string(),
                }),
            })
            .collect()
    }

    /// Paired samples for two columns.
    pub fn pair(&self, x_key: &str, y_key: &str) -> Result<(Vec<f64>, Vec<f64>), CoreError> {
        Ok((self.column_values(x_key)?, self.column_values(y_key)?))
    }

    /// A filtered copy without the given rows. `self` is left untouched.
    pub fn without_rows(&self, ids: &[RowId]) -> DataSet {
        let excluded: HashSet<&RowId> = ids.iter().collect();
        DataSet {
            rows: self
                .rows
                .iter()
                .filter(|r| !excluded.contains(&r.id))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Check the invariants every computation relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        let keys: HashSet<&str> = self.columns.iter().map(|c| c.key.as_str()).collect();
        if keys.len() != self.columns.len() {
            return Err(CoreError::InvalidConfiguration(format!(
                "dataset '{}' declares duplicate column keys",
                self.id
            )));
        }
        if keys.len() < 2 {
            return Err(CoreError::InvalidConfiguration(format!(
                "dataset '{}' needs at least two columns",
                self.id
            )));
        }
        if self.rows.is_empty() {
            return Err(CoreError::EmptyDataset(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(&row.id) {
                return Err(CoreError::InvalidConfiguration(format!(
                    "dataset '{}' has duplicate row id {}",
                    self.id, row.id
                )));
            }
        }
        for column in &self.columns {
            self.column_values(&column.key)?;
        }
        Ok(())
    }
}

/// Ordered strength bands derived from `|r|`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    None,
    Weak,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    /// Position in the ordered band list, `None` = 0.
    pub fn band_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthLabel::None => write!(f, "none"),
            StrengthLabel::Weak => write!(f, "weak"),
            StrengthLabel::Strong => write!(f, "strong"),
            StrengthLabel::VeryStrong => write!(f, "very strong"),
        }
    }
}

impl FromStr for StrengthLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "none" | "no" => Ok(StrengthLabel::None),
            "weak" => Ok(StrengthLabel::Weak),
            "strong" => Ok(StrengthLabel::Strong),
            "very strong" => Ok(StrengthLabel::VeryStrong),
            other => Err(format!("unknown strength label: {other}")),
        }
    }
}

/// Sign qualifier for correlations at or above the weak band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "positive"),
            Direction::Negative => write!(f, "negative"),
        }
    }
}

/// A correlation coefficient with its derived labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub strength: StrengthLabel,
    /// `None` below the weak band, whatever the sign.
    pub direction: Option<Direction>,
}

impl Correlation {
    /// Human-readable description, e.g. "strong negative correlation".
    pub fn describe(&self) -> String {
        match self.direction {
            Some(direction) => format!("{} {direction} correlation", self.strength),
            None => "no correlation".to_string(),
        }
    }
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
}

/// A quiz declaring which variable relates to a dataset's target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Unique identifier within the catalog.
    pub id: String,
    /// Id of the dataset the quest is about.
    pub dataset: String,
    /// The column the user relates other columns to.
    pub target: String,
    /// Column keys accepted as a correct answer.
    pub valid_answer_keys: BTreeSet<String>,
    /// Strength of the relationship the user should find.
    pub expected_strength: StrengthLabel,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl Quest {
    /// Reject quests that could never be answered correctly.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.valid_answer_keys.is_empty() {
            return Err(CoreError::InvalidConfiguration(format!(
                "quest '{}' has no valid answer keys",
                self.id
            )));
        }
        Ok(())
    }

    /// Check the quest's column references against its dataset.
    pub fn validate_against(&self, dataset: &DataSet) -> Result<(), CoreError> {
        self.validate()?;
        for key in std::iter::once(&self.target).chain(&self.valid_answer_keys) {
            if !dataset.has_column(key) {
                return Err(CoreError::UnknownColumn {
                    dataset: dataset.id.clone(),
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One point of a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Immutable, process-wide datasets and quests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub datasets: Vec<DataSet>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl Catalog {
    pub fn dataset(&self, id: &str) -> Option<&DataSet> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// Dataset lookup that fails with [`CoreError::UnknownDataset`].
    pub fn require_dataset(&self, id: &str) -> Result<&DataSet, CoreError> {
        self.dataset(id)
            .ok_or_else(|| CoreError::UnknownDataset(id.to_string()))
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Validate every dataset and every quest's references.
    pub fn validate(&self) -> Result<(), CoreError> {
        for dataset in &self.datasets {
            dataset.validate()?;
        }
        for quest in &self.quests {
            let dataset = self.require_dataset(&quest.dataset)?;
            quest.validate_against(dataset)?;
        }
        Ok(())
    }
}
