//! Line-based question loop shared by `quiz ticket` and `quiz exam`.

use std::io::{BufRead, Write};

use anyhow::Result;
use quiz_core::model::{ChoiceKey, Question};
use quiz_services::{PersistStatus, QuizLoopService, QuizSession, SessionOutcome};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEnd {
    Finished(SessionOutcome),
    Quit,
}

enum Reply {
    Answer(ChoiceKey),
    Quit,
}

/// Drive `session` to completion, reading one answer per line from `input`.
///
/// `q` or end of input stops early; nothing is recorded in that case.
///
/// # Errors
///
/// Fails on I/O errors or state-machine misuse.
pub async fn play<R, W>(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    input: &mut R,
    out: &mut W,
) -> Result<PlayEnd>
where
    R: BufRead,
    W: Write,
{
    loop {
        let index = session.current_index();
        let question = session.current_question()?;
        print_question(out, index + 1, session.total(), question)?;

        let selected = match read_reply(input, out, question)? {
            Reply::Answer(key) => key,
            Reply::Quit => {
                writeln!(out, "Stopped after {index} of {} questions.", session.total())?;
                return Ok(PlayEnd::Quit);
            }
        };

        let grade = loop_svc.answer_current(session, selected)?;
        let question = session.current_question()?;
        if grade.is_correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(
                out,
                "Wrong. Correct answer: {}) {}",
                grade.correct_key,
                question.option(grade.correct_key)
            )?;
        }
        let (correct, seen) = session.running_score();
        writeln!(out, "Score: {correct}/{seen}")?;

        let advanced = loop_svc.advance(session).await?;
        let Some(outcome) = advanced.outcome else {
            continue;
        };

        if let PersistStatus::Failed(err) = advanced.persist {
            tracing::warn!(error = %err, "retrying ticket result write");
            if let Err(err) = loop_svc.finalize_result(session).await {
                writeln!(out, "Warning: result could not be saved: {err}")?;
            }
        }
        writeln!(
            out,
            "Result: {}/{} ({}%) {}",
            outcome.correct,
            outcome.total,
            outcome.percent,
            outcome.band.label()
        )?;
        return Ok(PlayEnd::Finished(outcome));
    }
}

fn print_question<W: Write>(
    out: &mut W,
    number: usize,
    total: usize,
    question: &Question,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Question {number}/{total}: {}", question.text())?;
    for (key, text) in question.available_options() {
        writeln!(out, "  {key}) {text}")?;
    }
    Ok(())
}

fn read_reply<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &Question,
) -> Result<Reply> {
    loop {
        write!(out, "Answer (q to quit): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(Reply::Quit);
        }
        let reply = line.trim().to_ascii_uppercase();
        if reply == "Q" {
            return Ok(Reply::Quit);
        }

        match reply.parse::<ChoiceKey>() {
            Ok(key) if !question.option(key).is_empty() => return Ok(Reply::Answer(key)),
            _ => {
                let keys: Vec<&str> = question
                    .available_options()
                    .map(|(key, _)| key.as_str())
                    .collect();
                writeln!(out, "Please enter one of {}.", keys.join(", "))?;
            }
        }
    }
}
