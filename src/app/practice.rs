//! Terminal practice loop: exercise screen, answer checking and the round summary.
//!
//! Input and output are plain `BufRead`/`Write` handles so the loop can be driven
//! by stdin/stdout or by a scripted buffer.

use crate::core::prefetch::Prefetcher;
use crate::core::session::{Advance, AnswerStatus, PracticeSession, Scoreboard};
use crate::domain::model::{Exercise, Selection};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

const BLANK: &str = "_____";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeOutcome {
    pub rounds: usize,
    pub scoreboard: Scoreboard,
}

enum Command {
    Quit,
    Hint,
    Text(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        ":quit" | ":q" => Command::Quit,
        ":hint" | ":h" => Command::Hint,
        _ => Command::Text(line.to_string()),
    }
}

pub struct PracticeApp<R, W> {
    input: R,
    output: W,
    prefetcher: Prefetcher,
    session: PracticeSession,
    selection: Selection,
}

impl<R: BufRead, W: Write> PracticeApp<R, W> {
    pub fn new(prefetcher: Prefetcher, selection: Selection, input: R, output: W) -> Self {
        Self {
            input,
            output,
            prefetcher,
            session: PracticeSession::new(),
            selection,
        }
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.session.scoreboard()
    }

    /// Plays rounds until the user quits or input runs out.
    pub async fn run(&mut self) -> Result<PracticeOutcome> {
        let mut rounds = 0;

        loop {
            let exercises = self.prefetcher.next_round(&self.selection).await?;
            if exercises.is_empty() {
                writeln!(self.output, "No exercises could be built for this selection.")?;
                break;
            }

            rounds += 1;
            self.session.start_round(exercises);
            // 本輪開始後即在背景準備下一輪
            self.prefetcher.start(&self.selection);
            tracing::info!(
                "▶️ Round {} started with {} exercises",
                rounds,
                self.session.round_len()
            );

            if !self.play_round()? {
                break;
            }
            if !self.summary()? {
                break;
            }
        }

        let scoreboard = self.session.scoreboard();
        writeln!(
            self.output,
            "Final score: {} (best streak {})",
            scoreboard.score, scoreboard.best_streak
        )?;
        self.output.flush()?;
        tracing::info!("🏁 Practice finished after {} round(s)", rounds);

        Ok(PracticeOutcome { rounds, scoreboard })
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self) -> Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Returns false when the user quit in the middle of the round.
    fn play_round(&mut self) -> Result<bool> {
        loop {
            let Some(exercise) = self.session.current().cloned() else {
                return Ok(true);
            };
            self.render_exercise(&exercise)?;

            loop {
                let Some(line) = self.prompt()? else {
                    return Ok(false);
                };

                match parse_command(&line) {
                    Command::Quit => return Ok(false),
                    Command::Hint => {
                        if self.session.toggle_hint() {
                            writeln!(self.output, "💡 {}", exercise.hint)?;
                        } else {
                            writeln!(self.output, "(hint hidden)")?;
                        }
                    }
                    Command::Text(text) => {
                        if self.session.status() == AnswerStatus::Correct {
                            match self.session.advance() {
                                Advance::Next => break,
                                Advance::Finished => return Ok(true),
                            }
                        }

                        match self.session.check(&text) {
                            Some(AnswerStatus::Correct) => {
                                let board = self.session.scoreboard();
                                writeln!(self.output, "✅ Correct! {}", exercise.english_sentence())?;
                                writeln!(
                                    self.output,
                                    "Score: {}  Streak: {}",
                                    board.score, board.streak
                                )?;
                                writeln!(self.output, "Press Enter to continue")?;
                            }
                            Some(AnswerStatus::Incorrect) => {
                                writeln!(self.output, "❌ Not quite. Try again (:hint for help)")?;
                                self.session.retry();
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    fn render_exercise(&mut self, exercise: &Exercise) -> Result<()> {
        let (position, total) = self.session.progress();
        let out = &mut self.output;

        writeln!(out)?;
        writeln!(
            out,
            "[{}/{}] {} · {} ({})",
            position, total, exercise.tense, exercise.verb, exercise.spanish_verb
        )?;
        if exercise.origin.is_generated() {
            writeln!(out, "[Generated]")?;
        }
        writeln!(out, "ES: {}", exercise.spanish_sentence)?;
        writeln!(out, "EN: {}", exercise.parts.render(BLANK))?;
        writeln!(out, "Type the missing verb form (:hint, :quit)")?;
        Ok(())
    }

    /// Returns true when the user wants another round.
    fn summary(&mut self) -> Result<bool> {
        let board = self.session.scoreboard();
        let next_label = if self.prefetcher.is_ready() {
            "Start Next Round (Ready!)"
        } else if self.prefetcher.is_loading() {
            "Start Next Round (Loading...)"
        } else {
            "Start Next Round"
        };

        writeln!(self.output)?;
        writeln!(self.output, "🏁 Round complete!")?;
        writeln!(
            self.output,
            "Score: {}  Streak: {}  Best streak: {}",
            board.score, board.streak, board.best_streak
        )?;
        writeln!(self.output, "[n] {}   [q] Quit", next_label)?;

        loop {
            let Some(line) = self.prompt()? else {
                return Ok(false);
            };
            match line.trim().to_lowercase().as_str() {
                "" | "n" => return Ok(true),
                "q" | ":quit" | ":q" => return Ok(false),
                _ => writeln!(self.output, "Type n for the next round or q to quit")?,
            }
        }
    }
}
