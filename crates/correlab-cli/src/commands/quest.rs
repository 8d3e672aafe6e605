//! The `correlab quest` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use correlab_core::model::Catalog;
use correlab_core::parser::load_catalog;
use correlab_core::quest::{QuestAction, QuestPhase, QuestProgression, Verdict};

pub fn execute(catalog_path: PathBuf, dataset: Option<String>) -> Result<()> {
    let catalog = Arc::new(load_catalog(&catalog_path)?);
    let mut progression = match dataset {
        Some(id) => QuestProgression::for_dataset(Arc::clone(&catalog), &id)?,
        None => QuestProgression::new(Arc::clone(&catalog))?,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut progression, &catalog, stdin.lock(), stdout.lock())
}

/// Drive a progression from line-based input until it completes or input ends.
///
/// Wrong answers are retried automatically and correct ones advance.
pub fn run(
    progression: &mut QuestProgression,
    catalog: &Catalog,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    loop {
        let state = progression.state().clone();
        match state.phase {
            QuestPhase::Presenting => {
                let Some(quest) = progression.current_quest() else {
                    return Ok(());
                };
                let dataset = catalog.require_dataset(&quest.dataset)?;

                writeln!(
                    out,
                    "\nQuest {}/{}: {}",
                    state.quest_index + 1,
                    state.quest_count,
                    if quest.title.is_empty() { &quest.id } else { &quest.title }
                )?;
                if !quest.prompt.is_empty() {
                    writeln!(out, "{}", quest.prompt)?;
                }
                writeln!(out, "Dataset: {}", dataset.name)?;
                for column in dataset.columns.iter().filter(|c| c.key != quest.target) {
                    writeln!(out, "  {:<14} {}", column.key, column.label)?;
                }
                write!(out, "Which variable relates to '{}'? ", quest.target)?;
                out.flush()?;

                let hint = quest.hint.clone();
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    writeln!(out, "\nQuests abandoned.")?;
                    return Ok(());
                }
                let answer = line.trim();
                if answer.eq_ignore_ascii_case("hint") {
                    match hint {
                        Some(hint) => writeln!(out, "Hint: {hint}")?,
                        None => writeln!(out, "No hint for this quest.")?,
                    }
                    continue;
                }
                if answer.is_empty() {
                    continue;
                }
                progression.dispatch(QuestAction::Select(answer.to_string()));
                progression.dispatch(QuestAction::Check);
            }
            QuestPhase::Checked(verdict) => {
                if let Some(feedback) = &state.feedback {
                    let measured = feedback
                        .observed
                        .map(|c| format!(" (r = {:+.2}, {})", c.r, c.describe()))
                        .unwrap_or_default();
                    match verdict {
                        Verdict::Correct => {
                            writeln!(out, "Correct! '{}'{measured}", feedback.selected)?;
                        }
                        Verdict::Incorrect => {
                            writeln!(out, "Not quite: '{}'{measured}", feedback.selected)?;
                        }
                    }
                }
                match verdict {
                    Verdict::Correct => progression.dispatch(QuestAction::Advance),
                    Verdict::Incorrect => progression.dispatch(QuestAction::Retry),
                };
            }
            QuestPhase::Complete => {
                let attempts: u32 = state.attempts.iter().sum();
                writeln!(
                    out,
                    "\nAll {} quests complete in {} attempt(s).",
                    state.quest_count, attempts
                )?;
                return Ok(());
            }
        }
    }
}
