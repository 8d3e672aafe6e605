//! The `correlab play` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use correlab_core::config::load_config_from;
use correlab_core::game::{GameAction, GamePhase, GameSession};
use correlab_core::report::SessionReport;
use correlab_core::traits::{RandomSource, RngSource};

use crate::render::scatter;

pub fn execute(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    rounds: Option<u32>,
    no_practice: bool,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut settings = config.game_settings();
    if let Some(rounds) = rounds {
        settings.total_rounds = rounds;
    }
    if no_practice {
        settings.practice = false;
    }

    let source = RngSource::seeded(seed.or(config.seed));
    let mut session = GameSession::new(settings, source)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let reports = run(&mut session, stdin.lock(), stdout.lock())?;

    let Some(report) = reports.last() else {
        return Ok(());
    };
    let target = report_path.or_else(|| {
        config
            .report_dir
            .as_ref()
            .map(|dir| dir.join(report.file_name()))
    });
    if let Some(path) = target {
        report.save_json(&path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Drive a session from line-based input until the player stops or input ends.
///
/// Returns a report for every finished game.
pub fn run<R: RandomSource>(
    session: &mut GameSession<R>,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<Vec<SessionReport>> {
    let mut reports = Vec::new();

    loop {
        let state = session.state().clone();
        match state.phase {
            GamePhase::Intro => {
                writeln!(out, "Guess the correlation!")?;
                writeln!(
                    out,
                    "Each round shows a scatter plot. Enter your estimate of r between -1 and 1."
                )?;
                writeln!(
                    out,
                    "An exact guess earns 100 points; an error of 0.5 or more earns nothing.\n"
                )?;
                session.dispatch(GameAction::Start);
            }
            GamePhase::PracticeRound | GamePhase::Playing => {
                if state.is_practice() {
                    writeln!(out, "Practice round (not scored)")?;
                } else {
                    writeln!(out, "Round {}/{}", state.round, state.total_rounds)?;
                }
                if let Some(round) = &state.current {
                    write!(out, "{}", scatter(&round.points))?;
                }

                let Some(action) = prompt_guess(&mut input, &mut out, state.is_practice())? else {
                    writeln!(out, "\nGame abandoned.")?;
                    return Ok(reports);
                };
                match action {
                    GameAction::SetGuess(guess) => {
                        session.dispatch(GameAction::SetGuess(guess));
                        session.dispatch(GameAction::SubmitGuess);
                    }
                    other => {
                        session.dispatch(other);
                    }
                }
            }
            GamePhase::PracticeResult | GamePhase::Result => {
                if let Some(outcome) = state.last_outcome {
                    writeln!(
                        out,
                        "True r = {:+.2}, your guess {:+.2}: {} points",
                        outcome.true_r, outcome.guess, outcome.points
                    )?;
                }
                if state.phase == GamePhase::Result {
                    writeln!(out, "Score: {}\n", state.score)?;
                } else {
                    writeln!(out, "Now for real!\n")?;
                }
                session.dispatch(GameAction::Advance);
            }
            GamePhase::Finished => {
                let Some(report) = SessionReport::from_state(&state) else {
                    return Ok(reports);
                };
                print_summary(&mut out, &report)?;
                reports.push(report);

                write!(out, "Play again? [y/N] ")?;
                out.flush()?;
                match read_line(&mut input)? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => {
                        session.dispatch(GameAction::Retry);
                    }
                    _ => return Ok(reports),
                }
            }
        }
    }
}

fn prompt_guess(
    input: &mut impl BufRead,
    out: &mut impl Write,
    practice: bool,
) -> Result<Option<GameAction>> {
    loop {
        if practice {
            write!(out, "Your guess for r (or 'skip'): ")?;
        } else {
            write!(out, "Your guess for r: ")?;
        }
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if practice && line.eq_ignore_ascii_case("skip") {
            return Ok(Some(GameAction::SkipPractice));
        }
        match line.parse::<f64>() {
            Ok(guess) if (-1.0..=1.0).contains(&guess) => {
                return Ok(Some(GameAction::SetGuess(guess)));
            }
            _ => writeln!(out, "Please enter a number between -1 and 1.")?,
        }
    }
}

fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_summary(out: &mut impl Write, report: &SessionReport) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Round", "True r", "Guess", "Points"]);
    for record in &report.history {
        table.add_row(vec![
            record.round.to_string(),
            format!("{:+.2}", record.true_r),
            format!("{:+.2}", record.guess),
            record.points.to_string(),
        ]);
    }

    writeln!(out, "{table}")?;
    writeln!(
        out,
        "Final score: {}/{} (mean error {:.3})",
        report.score,
        report.max_score,
        report.mean_error()
    )?;
    writeln!(out, "Rank: {}", report.rank)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use correlab_core::game::GameSettings;
    use correlab_core::traits::SequenceSource;

    fn scripted_session(rounds: u32, practice: bool) -> GameSession<SequenceSource> {
        // Always the strong negative tier with points exactly on the line.
        let source = SequenceSource::new([0.99, 0.2, 0.5, 0.4, 0.5, 0.6, 0.5]);
        let settings = GameSettings {
            total_rounds: rounds,
            points_per_round: 3,
            practice,
            ..GameSettings::default()
        };
        GameSession::new(settings, source).unwrap()
    }

    #[test]
    fn plays_a_full_game() {
        let mut session = scripted_session(2, true);
        let input = "skip\n-1\nnonsense\n2\n-0.75\nn\n";
        let mut out = Vec::new();

        let reports = run(&mut session, input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].score, 150);
        assert!(text.contains("Practice round"));
        assert!(text.contains("Round 2/2"));
        assert!(text.contains("Please enter a number between -1 and 1."));
        assert!(text.contains("Final score: 150/200"));
        assert!(text.contains("Rank: Analyst"));
    }

    #[test]
    fn retry_plays_again() {
        let mut session = scripted_session(1, false);
        let input = "-1\ny\n0\nn\n";
        let mut out = Vec::new();

        let reports = run(&mut session, input.as_bytes(), &mut out).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].score, 100);
        assert_eq!(reports[1].score, 0);
    }

    #[test]
    fn input_ending_early_abandons_the_game() {
        let mut session = scripted_session(3, false);
        let mut out = Vec::new();

        let reports = run(&mut session, "-1\n".as_bytes(), &mut out).unwrap();
        assert!(reports.is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Game abandoned."));
    }
}
