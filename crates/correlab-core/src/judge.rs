//! Answer judging for variable-selection quizzes and correlation guesses.

use serde::{Deserialize, Serialize};

use crate::model::Quest;

/// Points awarded for an exact guess.
pub const MAX_POINTS: u32 = 100;

/// Outcome of judging a numeric guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericVerdict {
    /// `|true_r - guess_r|`.
    pub error: f64,
    /// Points in `0..=100`.
    pub points: u32,
}

/// Correct iff `selected_key` is one of the quest's valid answer keys.
pub fn judge_categorical(quest: &Quest, selected_key: &str) -> bool {
    quest.valid_answer_keys.contains(selected_key)
}

/// Score a correlation guess.
///
/// points = max(0, round((1 - 2 * error) * 100))
///
/// Linear in the error: 100 at zero error, 0 from an error of 0.5 upwards.
pub fn judge_numeric(true_r: f64, guess_r: f64) -> NumericVerdict {
    let error = (true_r - guess_r).abs();
    let raw = ((1.0 - 2.0 * error) * MAX_POINTS as f64).round();
    NumericVerdict {
        error,
        points: raw.clamp(0.0, MAX_POINTS as f64) as u32,
    }
}
