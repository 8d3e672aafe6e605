//! Scored "guess the correlation" game session.
//!
//! ```text
//! intro -> practice_round -> practice_result -> playing(1) -> result(1)
//!       -> playing(2) -> ... -> result(N) -> finished --retry--> playing(1)
//! ```
//!
//! Actions that do not apply to the current phase are ignored, so a host
//! may deliver duplicate or out-of-order input events safely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::generator::{generate_round, GameRound};
use crate::judge::{judge_numeric, MAX_POINTS};
use crate::traits::RandomSource;

/// Rounds in a scored game.
pub const TOTAL_ROUNDS: u32 = 5;
/// Points per generated scatter.
pub const POINTS_PER_ROUND: usize = 30;
/// Guess shown before the player moves the slider.
pub const DEFAULT_GUESS: f64 = 0.0;
/// Upper bound on `total_rounds`.
pub const MAX_TOTAL_ROUNDS: u32 = 1_000;
/// Upper bound on `points_per_round`.
pub const MAX_POINTS_PER_ROUND: usize = 10_000;

/// Tunables for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub total_rounds: u32,
    pub points_per_round: usize,
    /// Offer an unscored practice round before round 1.
    pub practice: bool,
    pub default_guess: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_rounds: TOTAL_ROUNDS,
            points_per_round: POINTS_PER_ROUND,
            practice: true,
            default_guess: DEFAULT_GUESS,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.total_rounds == 0 {
            return Err(CoreError::InvalidConfiguration(
                "total_rounds must be at least 1".into(),
            ));
        }
        if self.total_rounds > MAX_TOTAL_ROUNDS {
            return Err(CoreError::InvalidConfiguration(format!(
                "total_rounds must be at most {MAX_TOTAL_ROUNDS}"
            )));
        }
        if self.points_per_round < 3 {
            return Err(CoreError::InvalidConfiguration(
                "points_per_round must be at least 3".into(),
            ));
        }
        if self.points_per_round > MAX_POINTS_PER_ROUND {
            return Err(CoreError::InvalidConfiguration(format!(
                "points_per_round must be at most {MAX_POINTS_PER_ROUND}"
            )));
        }
        if !(-1.0..=1.0).contains(&self.default_guess) {
            return Err(CoreError::InvalidConfiguration(
                "default_guess must be within [-1, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Intro,
    PracticeRound,
    PracticeResult,
    Playing,
    Result,
    Finished,
}

/// Input events the host dispatches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    /// Leave the intro.
    Start,
    /// Jump from the intro or the practice round straight to round 1.
    SkipPractice,
    /// Move the pending guess; clamped into `[-1, 1]`.
    SetGuess(f64),
    SubmitGuess,
    Advance,
    /// Start over from round 1 after finishing.
    Retry,
}

/// The reveal shown after a guess is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub true_r: f64,
    pub guess: f64,
    pub error: f64,
    pub points: u32,
}

/// A scored round in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: u32,
    pub true_r: f64,
    pub guess: f64,
    pub points: u32,
}

/// Final classification of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Beginner,
    Novice,
    Apprentice,
    Analyst,
    Oracle,
}

/// Minimum percentage of the maximum score for each rank, best first.
const RANK_THRESHOLDS: [(u32, Rank); 4] = [
    (90, Rank::Oracle),
    (70, Rank::Analyst),
    (50, Rank::Apprentice),
    (25, Rank::Novice),
];

impl Rank {
    pub fn for_score(score: u32, max_score: u32) -> Rank {
        let score = u64::from(score) * 100;
        let max_score = u64::from(max_score);
        RANK_THRESHOLDS
            .iter()
            .find(|(percent, _)| score >= u64::from(*percent) * max_score)
            .map(|&(_, rank)| rank)
            .unwrap_or(Rank::Beginner)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Beginner => write!(f, "Beginner"),
            Rank::Novice => write!(f, "Novice"),
            Rank::Apprentice => write!(f, "Apprentice"),
            Rank::Analyst => write!(f, "Analyst"),
            Rank::Oracle => write!(f, "Oracle"),
        }
    }
}

/// Read-only snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Current scored round, `1..=total_rounds`; `0` before round 1.
    pub round: u32,
    pub total_rounds: u32,
    pub score: u32,
    /// Pending guess for the current round.
    pub guess: f64,
    /// Scatter being guessed or revealed.
    pub current: Option<GameRound>,
    pub last_outcome: Option<RoundOutcome>,
    pub history: Vec<RoundRecord>,
}

impl GameState {
    fn initial(settings: &GameSettings) -> Self {
        Self {
            phase: GamePhase::Intro,
            round: 0,
            total_rounds: settings.total_rounds,
            score: 0,
            guess: settings.default_guess,
            current: None,
            last_outcome: None,
            history: Vec::new(),
        }
    }

    pub fn max_score(&self) -> u32 {
        self.total_rounds.saturating_mul(MAX_POINTS)
    }

    /// Rank, once the session is finished.
    pub fn rank(&self) -> Option<Rank> {
        (self.phase == GamePhase::Finished).then(|| Rank::for_score(self.score, self.max_score()))
    }

    pub fn is_practice(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::PracticeRound | GamePhase::PracticeResult
        )
    }
}

/// One player's run of the guessing game.
pub struct GameSession<R: RandomSource> {
    settings: GameSettings,
    source: R,
    state: GameState,
}

impl<R: RandomSource> GameSession<R> {
    pub fn new(settings: GameSettings, source: R) -> Result<Self, CoreError> {
        settings.validate()?;
        let state = GameState::initial(&settings);
        Ok(Self {
            settings,
            source,
            state,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Apply an action and return the resulting state.
    pub fn dispatch(&mut self, action: GameAction) -> &GameState {
        let before = self.state.phase;
        let applied = match (self.state.phase, action) {
            (GamePhase::Intro, GameAction::Start) if self.settings.practice => {
                self.enter_practice();
                true
            }
            (GamePhase::Intro, GameAction::Start)
            | (GamePhase::Intro | GamePhase::PracticeRound, GameAction::SkipPractice)
            | (GamePhase::PracticeResult, GameAction::Advance)
            | (GamePhase::Finished, GameAction::Retry) => {
                self.start_scored_game();
                true
            }
            (GamePhase::PracticeRound | GamePhase::Playing, GameAction::SetGuess(guess))
                if guess.is_finite() =>
            {
                self.state.guess = guess.clamp(-1.0, 1.0);
                true
            }
            (GamePhase::PracticeRound | GamePhase::Playing, GameAction::SubmitGuess) => {
                self.submit();
                true
            }
            (GamePhase::Result, GameAction::Advance) => {
                if self.state.round < self.settings.total_rounds {
                    self.state.round += 1;
                    self.enter_round(GamePhase::Playing);
                } else {
                    self.state.phase = GamePhase::Finished;
                    self.state.current = None;
                }
                true
            }
            _ => false,
        };

        if applied {
            tracing::debug!(
                ?action,
                from = ?before,
                to = ?self.state.phase,
                round = self.state.round,
                score = self.state.score,
                "game transition"
            );
        } else {
            tracing::debug!(?action, phase = ?before, "ignored game action");
        }
        &self.state
    }

    fn enter_practice(&mut self) {
        self.state.round = 0;
        self.enter_round(GamePhase::PracticeRound);
    }

    fn start_scored_game(&mut self) {
        self.state.score = 0;
        self.state.history.clear();
        self.state.round = 1;
        self.enter_round(GamePhase::Playing);
    }

    fn enter_round(&mut self, phase: GamePhase) {
        self.state.current = Some(generate_round(
            &mut self.source,
            self.settings.points_per_round,
        ));
        self.state.guess = self.settings.default_guess;
        self.state.last_outcome = None;
        self.state.phase = phase;
    }

    fn submit(&mut self) {
        let Some(round) = &self.state.current else {
            return;
        };
        let true_r = round.true_r;
        let guess = self.state.guess;
        let verdict = judge_numeric(true_r, guess);

        self.state.last_outcome = Some(RoundOutcome {
            true_r,
            guess,
            error: verdict.error,
            points: verdict.points,
        });

        if self.state.phase == GamePhase::PracticeRound {
            self.state.phase = GamePhase::PracticeResult;
        } else {
            self.state.score += verdict.points;
            self.state.history.push(RoundRecord {
                round: self.state.round,
                true_r,
                guess,
                points: verdict.points,
            });
            self.state.phase = GamePhase::Result;
        }
    }
}
