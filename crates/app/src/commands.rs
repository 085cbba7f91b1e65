use std::io::{self, Write};

use anyhow::{Context, Result};
use quiz_core::model::{DisplayPreferences, TicketNumber};
use quiz_core::{QuestionBank, validate_record};
use quiz_services::{AppServices, SessionError};

use crate::config::QuizConfig;
use crate::play::play;

async fn open(config: &QuizConfig) -> Result<AppServices> {
    let settings = config.settings()?;
    let bank = QuestionBank::from_path(&config.questions);
    AppServices::new_sqlite(&config.database, bank, settings)
        .await
        .with_context(|| format!("failed to open progress database {}", config.database))
}

fn theme_name(prefs: DisplayPreferences) -> &'static str {
    if prefs.dark_theme { "dark" } else { "light" }
}

pub async fn info(config: &QuizConfig) -> Result<()> {
    let services = open(config).await?;
    let overview = services.overview();
    let prefs = services.preferences().load().await?;

    println!(
        "{} questions ({} tickets)",
        overview.total_questions, overview.ticket_count
    );
    println!("Theme: {}", theme_name(prefs));
    Ok(())
}

pub async fn tickets(config: &QuizConfig) -> Result<()> {
    let services = open(config).await?;
    let statuses = services
        .progress()
        .ticket_overview(services.bank().len(), services.settings().ticket_size())
        .await?;

    if statuses.is_empty() {
        println!("No tickets: no questions loaded from {}.", config.questions.display());
        return Ok(());
    }
    for status in &statuses {
        match status.record {
            Some(record) => println!(
                "Ticket {}: {} questions, {}/{} ({}%) {}",
                status.ticket,
                status.question_count,
                record.score(),
                record.total(),
                record.percent(),
                status.standing().label()
            ),
            None => println!(
                "Ticket {}: {} questions, {}",
                status.ticket,
                status.question_count,
                status.standing().label()
            ),
        }
    }
    Ok(())
}

pub async fn ticket(config: &QuizConfig, number: TicketNumber) -> Result<()> {
    let services = open(config).await?;
    let ticket_count = services.overview().ticket_count;
    if number.index() >= ticket_count && ticket_count > 0 {
        anyhow::bail!("ticket {number} does not exist ({ticket_count} tickets)");
    }

    let loop_svc = services.session_loop();
    let mut session = loop_svc.start_ticket(number).map_err(|err| explain(err, config))?;
    println!("Ticket {number}: {} questions", session.total());
    play(&loop_svc, &mut session, &mut io::stdin().lock(), &mut io::stdout().lock()).await?;
    Ok(())
}

pub async fn exam(config: &QuizConfig) -> Result<()> {
    let services = open(config).await?;
    let loop_svc = services.session_loop();
    let mut session = loop_svc.start_exam().map_err(|err| explain(err, config))?;
    println!("Exam: {} questions", session.total());
    play(&loop_svc, &mut session, &mut io::stdin().lock(), &mut io::stdout().lock()).await?;
    Ok(())
}

pub fn validate(config: &QuizConfig) -> Result<()> {
    let path = &config.questions;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;
    let records = QuestionBank::read_source(&json)
        .with_context(|| format!("failed to parse question bank: {}", path.display()))?;

    let mut out = io::stdout().lock();
    let mut valid = 0;
    for (index, record) in records.iter().enumerate() {
        match validate_record(record) {
            Ok(_) => valid += 1,
            Err(reason) => writeln!(out, "  [record {}] {reason}", index + 1)?,
        }
    }
    writeln!(out, "{valid} of {} records valid.", records.len())?;
    Ok(())
}

pub async fn theme(config: &QuizConfig, dark: Option<bool>) -> Result<()> {
    let services = open(config).await?;
    let preferences = services.preferences();
    let prefs = match dark {
        Some(dark_theme) => {
            let prefs = DisplayPreferences { dark_theme };
            preferences.save(prefs).await?;
            prefs
        }
        None => preferences.toggle_theme().await?,
    };
    println!("Theme: {}", theme_name(prefs));
    Ok(())
}

fn explain(err: SessionError, config: &QuizConfig) -> anyhow::Error {
    match err {
        SessionError::EmptyBank => anyhow::anyhow!(
            "no questions loaded from {}",
            config.questions.display()
        ),
        other => other.into(),
    }
}
