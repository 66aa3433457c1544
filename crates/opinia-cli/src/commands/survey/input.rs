//! Line grammar for the interactive survey loop.
//!
//! ```text
//! <y|n> <y|n> <u> <r>   answer: do you know A, B; usefulness; relatedness
//! <u> <r>               answer to an exploit round (both courses known)
//! + <name>              suggest a course
//! - <name>              withdraw a suggestion
//! ?                     list suggestions
//! p                     progress
//! s                     skip the current round
//! q                     quit
//! ```
//!
//! Verdicts are `-1` (first course), `0` (no clear preference) or `1`
//! (second course).

use anyhow::Context;
use opinia_core::{Preference, SamplingMode};
use opinia_survey::{Availability, RoundAnswer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyInput {
    Answer(RoundAnswer),
    Suggest(String),
    Withdraw(String),
    ListSuggestions,
    Progress,
    Skip,
    Quit,
}

/// Parse one input line. `pending` is the mode of the round awaiting an
/// answer, if any.
pub fn parse_line(line: &str, pending: Option<SamplingMode>) -> anyhow::Result<SurveyInput> {
    let line = line.trim();
    match line {
        "" => anyhow::bail!("empty input"),
        "q" | "quit" => return Ok(SurveyInput::Quit),
        "?" => return Ok(SurveyInput::ListSuggestions),
        "p" | "progress" => return Ok(SurveyInput::Progress),
        "s" | "skip" => {
            pending.context("no round to skip")?;
            return Ok(SurveyInput::Skip);
        }
        _ => {}
    }

    if let Some(name) = line.strip_prefix('+') {
        return Ok(SurveyInput::Suggest(course_name(name)?));
    }
    // "-1 0" is an answer; a withdrawal needs whitespace after the dash.
    if let Some(name) = line.strip_prefix("- ").or_else(|| line.strip_prefix("-\t")) {
        return Ok(SurveyInput::Withdraw(course_name(name)?));
    }

    let mode = pending.context("no round is pending; only +, -, ?, p and q are accepted")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let answer = match (tokens.as_slice(), mode) {
        ([first, second, usefulness, relatedness], _) => {
            RoundAnswer::known(verdict(usefulness)?, verdict(relatedness)?)
                .with_availability(availability(first)?, availability(second)?)
        }
        ([usefulness, relatedness], SamplingMode::Exploit) => {
            RoundAnswer::known(verdict(usefulness)?, verdict(relatedness)?)
        }
        (_, SamplingMode::Explore) => {
            anyhow::bail!("answer with <y|n> <y|n> <usefulness> <relatedness>")
        }
        (_, SamplingMode::Exploit) => anyhow::bail!("answer with <usefulness> <relatedness>"),
    };
    Ok(SurveyInput::Answer(answer))
}

fn course_name(raw: &str) -> anyhow::Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        anyhow::bail!("course name is missing");
    }
    Ok(name.to_string())
}

fn verdict(token: &str) -> anyhow::Result<Preference> {
    Ok(token.parse::<Preference>()?)
}

fn availability(token: &str) -> anyhow::Result<Availability> {
    match token.to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(Availability::Available),
        "n" | "no" => Ok(Availability::Unavailable),
        other => anyhow::bail!("expected y or n, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn explore_answer_needs_availability() {
        let parsed = parse_line("y n 1 -1", Some(SamplingMode::Explore)).unwrap();
        assert_eq!(
            parsed,
            SurveyInput::Answer(
                RoundAnswer::known(Preference::Second, Preference::First)
                    .with_availability(Availability::Available, Availability::Unavailable)
            )
        );
        assert!(parse_line("1 -1", Some(SamplingMode::Explore)).is_err());
    }

    #[test]
    fn exploit_answer_may_skip_availability() {
        let parsed = parse_line("-1 0", Some(SamplingMode::Exploit)).unwrap();
        assert_eq!(
            parsed,
            SurveyInput::Answer(RoundAnswer::known(Preference::First, Preference::Neutral))
        );
        let parsed = parse_line("Y no 0 0", Some(SamplingMode::Exploit)).unwrap();
        assert!(matches!(
            parsed,
            SurveyInput::Answer(RoundAnswer {
                second: Availability::Unavailable,
                ..
            })
        ));
    }

    #[test]
    fn bad_verdicts_are_rejected() {
        assert!(parse_line("2 0", Some(SamplingMode::Exploit)).is_err());
        assert!(parse_line("y y 0 x", Some(SamplingMode::Explore)).is_err());
        assert!(parse_line("maybe y 0 0", Some(SamplingMode::Explore)).is_err());
        assert!(parse_line("0", Some(SamplingMode::Exploit)).is_err());
    }

    #[test]
    fn answers_need_a_pending_round() {
        assert!(parse_line("0 0", None).is_err());
        assert!(parse_line("s", None).is_err());
        assert_eq!(parse_line("q", None).unwrap(), SurveyInput::Quit);
    }

    #[test]
    fn suggestion_commands() {
        assert_eq!(
            parse_line("+ Quantum Computing ", None).unwrap(),
            SurveyInput::Suggest("Quantum Computing".into())
        );
        assert_eq!(
            parse_line("+Compilers", None).unwrap(),
            SurveyInput::Suggest("Compilers".into())
        );
        assert_eq!(
            parse_line("- Compilers", None).unwrap(),
            SurveyInput::Withdraw("Compilers".into())
        );
        assert!(parse_line("+   ", None).is_err());
        assert_eq!(parse_line("?", None).unwrap(), SurveyInput::ListSuggestions);
        assert_eq!(parse_line(" p ", None).unwrap(), SurveyInput::Progress);
    }

    #[test]
    fn empty_line_is_rejected() {
        assert!(parse_line("   ", Some(SamplingMode::Exploit)).is_err());
    }
}
