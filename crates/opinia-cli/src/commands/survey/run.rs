//! The interactive round loop, independent of where lines come from.

use std::io::{BufRead, Write};

use anyhow::Context;
use rand::Rng;
use serde::Serialize;

use opinia_survey::{CoursePair, Progress, RoundSummary, SurveyError, SurveySession};

use super::input::{SurveyInput, parse_line};
use crate::cli::OutputFormat;
use crate::output::render;

/// One line of output per event.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurveyEvent {
    Started { progress: Progress, seeded: usize },
    Round { pair: CoursePair },
    Submitted { summary: RoundSummary },
    Skipped { pair: CoursePair },
    Suggestions { items: Vec<String> },
    Suggested { name: String, added: bool },
    Withdrawn { name: String },
    Progress { progress: Progress },
    Invalid { message: String },
    Finished { progress: Progress },
}

pub struct EventSink<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> EventSink<W> {
    pub const fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn emit(&mut self, event: &SurveyEvent) -> anyhow::Result<()> {
        writeln!(self.out, "{}", render(event, self.format)?)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Serve rounds until `q` or end of input. The survey running out of pairs
/// does not end the loop: suggestions can still be managed.
pub fn run_loop<R, W, G>(
    session: &mut SurveySession<'_>,
    rng: &mut G,
    input: R,
    sink: &mut EventSink<W>,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut lines = input.lines();
    let mut finished_announced = false;

    loop {
        let was_pending = session.pending().is_some();
        let pending_mode = match session.next_round(rng) {
            Some(pair) => {
                let mode = pair.mode;
                if !was_pending {
                    sink.emit(&SurveyEvent::Round { pair })?;
                }
                Some(mode)
            }
            None => {
                if !finished_announced {
                    sink.emit(&SurveyEvent::Finished {
                        progress: session.progress()?,
                    })?;
                    finished_announced = true;
                }
                None
            }
        };

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read survey input")?;

        let parsed = match parse_line(&line, pending_mode) {
            Ok(parsed) => parsed,
            Err(error) => {
                sink.emit(&SurveyEvent::Invalid {
                    message: format!("{error:#}"),
                })?;
                continue;
            }
        };

        let event = match parsed {
            SurveyInput::Quit => break,
            SurveyInput::Answer(answer) => SurveyEvent::Submitted {
                summary: session.submit(answer)?,
            },
            SurveyInput::Skip => match session.abandon() {
                Some(pair) => SurveyEvent::Skipped { pair },
                None => continue,
            },
            SurveyInput::Suggest(name) => match session.suggest(&name) {
                Ok(added) => SurveyEvent::Suggested { name, added },
                Err(error) => rejected(error)?,
            },
            SurveyInput::Withdraw(name) => match session.withdraw_suggestion(&name) {
                Ok(()) => SurveyEvent::Withdrawn { name },
                Err(error) => rejected(error)?,
            },
            SurveyInput::ListSuggestions => SurveyEvent::Suggestions {
                items: session.suggestions()?,
            },
            SurveyInput::Progress => SurveyEvent::Progress {
                progress: session.progress()?,
            },
        };
        sink.emit(&event)?;
    }

    if session.abandon().is_some() {
        tracing::debug!("left the survey with a round pending");
    }
    Ok(())
}

/// Respondent mistakes become `invalid` events; anything else aborts.
fn rejected(error: SurveyError) -> anyhow::Result<SurveyEvent> {
    match error {
        SurveyError::NotFound { .. } | SurveyError::InvalidArgument(_) | SurveyError::Core(_) => {
            Ok(SurveyEvent::Invalid {
                message: error.to_string(),
            })
        }
        other => Err(other.into()),
    }
}
