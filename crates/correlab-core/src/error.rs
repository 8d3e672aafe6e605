//! Core error types.
//!
//! Only malformed configuration is an error. Degenerate numeric input and
//! out-of-order state-machine actions are handled without failing.

use thiserror::Error;

/// Errors raised at the boundary between the catalog and the core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A configuration value or catalog entry is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A quest or lookup referenced a dataset that is not in the catalog.
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    /// A column key is not declared on the dataset.
    #[error("unknown column '{key}' in dataset '{dataset}'")]
    UnknownColumn { dataset: String, key: String },

    /// The dataset has no rows to compute on.
    #[error("dataset '{0}' has no rows")]
    EmptyDataset(String),

    /// A row is missing a declared column or holds a non-finite number.
    #[error("row {row} of dataset '{dataset}' has no finite value for '{key}'")]
    NonFiniteValue {
        dataset: String,
        row: String,
        key: String,
    },

    /// A quest progression was started without quests.
    #[error("quest list is empty")]
    EmptyQuestList,
}

impl CoreError {
    /// Returns `true` if the error stems from the catalog rather than from a
    /// lookup made by the host.
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidConfiguration(_)
                | CoreError::EmptyDataset(_)
                | CoreError::NonFiniteValue { .. }
                | CoreError::EmptyQuestList
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = CoreError::UnknownColumn {
            dataset: "students".into(),
            key: "shoe_size".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown column 'shoe_size' in dataset 'students'"
        );
        assert_eq!(
            CoreError::InvalidConfiguration("total_rounds must be at least 1".into()).to_string(),
            "invalid configuration: total_rounds must be at least 1"
        );
    }

    #[test]
    fn catalog_error_classification() {
        assert!(CoreError::EmptyQuestList.is_catalog_error());
        assert!(CoreError::EmptyDataset("x".into()).is_catalog_error());
        assert!(!CoreError::UnknownDataset("x".into()).is_catalog_error());
    }
}
