//! Statistics engine, answer judging, and session state machines for correlab.
//!
//! This crate computes Pearson correlation and least-squares regression over
//! catalog datasets, classifies correlation strength, and drives the scored
//! guessing game and quest progression that consume those numbers.

pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod judge;
pub mod model;
pub mod parser;
pub mod quest;
pub mod report;
pub mod statistics;
pub mod traits;

pub use error::CoreError;
pub use game::{GameAction, GamePhase, GameSession, GameSettings, GameState, Rank};
pub use judge::{judge_categorical, judge_numeric};
pub use model::{Catalog, Column, Correlation, DataSet, Quest, RegressionResult, Row, StrengthLabel};
pub use quest::{QuestAction, QuestPhase, QuestProgression, QuestState, Verdict};
pub use statistics::{classify_strength, correlation, predict, regression};
