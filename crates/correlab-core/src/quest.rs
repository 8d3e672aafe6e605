//! Quest progression: a fixed, ordered list of variable-selection quizzes.
//!
//! ```text
//! presenting(i) --check--> checked(correct)   --advance--> presenting(i + 1) | complete
//!               --check--> checked(incorrect) --retry-->   presenting(i)
//! complete --restart--> presenting(0)
//! ```
//!
//! The index only moves forward, one step at a time, after a correct verdict.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::judge::judge_categorical;
use crate::model::{Catalog, Correlation, Quest};
use crate::statistics::correlate_columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestPhase {
    Presenting,
    Checked(Verdict),
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestAction {
    /// Choose a column key as the answer.
    Select(String),
    Check,
    Retry,
    Advance,
    Restart,
}

/// What the host shows after a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestFeedback {
    pub verdict: Verdict,
    pub selected: String,
    /// Measured relationship between the quest target and the selection.
    pub observed: Option<Correlation>,
}

/// Read-only snapshot of a progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestState {
    pub phase: QuestPhase,
    pub quest_index: usize,
    pub quest_count: usize,
    pub selected: Option<String>,
    pub feedback: Option<QuestFeedback>,
    /// Checks made per quest, indexed like the quest list.
    pub attempts: Vec<u32>,
}

impl QuestState {
    fn initial(quest_count: usize) -> Self {
        Self {
            phase: QuestPhase::Presenting,
            quest_index: 0,
            quest_count,
            selected: None,
            feedback: None,
            attempts: vec![0; quest_count],
        }
    }
}

/// Walks a player through the catalog's quests in order.
pub struct QuestProgression {
    catalog: Arc<Catalog>,
    quests: Vec<Quest>,
    state: QuestState,
}

impl QuestProgression {
    /// Progression over every quest in the catalog.
    pub fn new(catalog: Arc<Catalog>) -> Result<Self, CoreError> {
        let quests = catalog.quests.clone();
        Self::with_quests(catalog, quests)
    }

    /// Progression over the quests of a single dataset.
    pub fn for_dataset(catalog: Arc<Catalog>, dataset_id: &str) -> Result<Self, CoreError> {
        catalog.require_dataset(dataset_id)?;
        let quests = catalog
            .quests
            .iter()
            .filter(|q| q.dataset == dataset_id)
            .cloned()
            .collect();
        Self::with_quests(catalog, quests)
    }

    fn with_quests(catalog: Arc<Catalog>, quests: Vec<Quest>) -> Result<Self, CoreError> {
        if quests.is_empty() {
            return Err(CoreError::EmptyQuestList);
        }
        for quest in &quests {
            quest.validate_against(catalog.require_dataset(&quest.dataset)?)?;
        }
        let state = QuestState::initial(quests.len());
        Ok(Self {
            catalog,
            quests,
            state,
        })
    }

    pub fn state(&self) -> &QuestState {
        &self.state
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// The quest being presented or checked; `None` once complete.
    pub fn current_quest(&self) -> Option<&Quest> {
        match self.state.phase {
            QuestPhase::Complete => None,
            _ => self.quests.get(self.state.quest_index),
        }
    }

    /// Apply an action and return the resulting state.
    pub fn dispatch(&mut self, action: QuestAction) -> &QuestState {
        let before = self.state.phase;
        let applied = match (self.state.phase, &action) {
            (QuestPhase::Presenting, QuestAction::Select(key)) => {
                self.state.selected = Some(key.clone());
                true
            }
            (QuestPhase::Presenting, QuestAction::Check) => self.check(),
            (QuestPhase::Checked(Verdict::Incorrect), QuestAction::Retry) => {
                self.state.phase = QuestPhase::Presenting;
                self.state.selected = None;
                self.state.feedback = None;
                true
            }
            (QuestPhase::Checked(Verdict::Correct), QuestAction::Advance) => {
                self.state.selected = None;
                self.state.feedback = None;
                if self.state.quest_index + 1 < self.quests.len() {
                    self.state.quest_index += 1;
                    self.state.phase = QuestPhase::Presenting;
                } else {
                    self.state.phase = QuestPhase::Complete;
                }
                true
            }
            (QuestPhase::Complete, QuestAction::Restart) => {
                self.state = QuestState::initial(self.quests.len());
                true
            }
            _ => false,
        };

        if applied {
            tracing::debug!(
                ?action,
                from = ?before,
                to = ?self.state.phase,
                quest_index = self.state.quest_index,
                "quest transition"
            );
        } else {
            tracing::debug!(?action, phase = ?before, "ignored quest action");
        }
        &self.state
    }

    fn check(&mut self) -> bool {
        let Some(selected) = self.state.selected.clone() else {
            return false;
        };
        let quest = &self.quests[self.state.quest_index];
        let verdict = if judge_categorical(quest, &selected) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };

        let observed = self
            .catalog
            .dataset(&quest.dataset)
            .filter(|ds| selected != quest.target && ds.has_column(&selected))
            .and_then(|ds| correlate_columns(ds, &quest.target, &selected).ok());

        self.state.attempts[self.state.quest_index] += 1;
        self.state.feedback = Some(QuestFeedback {
            verdict,
            selected,
            observed,
        });
        self.state.phase = QuestPhase::Checked(verdict);
        true
    }
}
