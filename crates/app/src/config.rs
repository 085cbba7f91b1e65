//! `quiz.toml` loading and command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quiz_core::model::QuizSettings;
use serde::Deserialize;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "quiz.toml";

/// Binary configuration. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    /// JSON question bank.
    #[serde(default = "default_questions")]
    pub questions: PathBuf,
    /// sqlx `SQLite` URL or plain file path for progress storage.
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_ticket_size")]
    pub ticket_size: u32,
    #[serde(default = "default_exam_size")]
    pub exam_size: u32,
}

fn default_questions() -> PathBuf {
    PathBuf::from("questions.json")
}
fn default_database() -> String {
    "sqlite://quiz.sqlite3".to_string()
}
fn default_ticket_size() -> u32 {
    QuizSettings::DEFAULT_TICKET_SIZE
}
fn default_exam_size() -> u32 {
    QuizSettings::DEFAULT_EXAM_SIZE
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions: default_questions(),
            database: default_database(),
            ticket_size: default_ticket_size(),
            exam_size: default_exam_size(),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub questions: Option<PathBuf>,
    pub database: Option<String>,
}

impl QuizConfig {
    /// Load config from an explicit path, or `quiz.toml` in the working
    /// directory if present, then apply `overrides`.
    ///
    /// # Errors
    ///
    /// Fails if an explicit path does not exist or a file cannot be parsed.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => anyhow::bail!("config file not found: {}", p.display()),
            None => Some(PathBuf::from(CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut config = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?;
                Self::parse(&content)
                    .with_context(|| format!("failed to parse config: {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(questions) = overrides.questions {
            config.questions = questions;
        }
        if let Some(database) = overrides.database {
            config.database = database;
        }
        config.database = normalize_sqlite_url(&config.database);
        Ok(config)
    }

    /// Parse config text.
    ///
    /// # Errors
    ///
    /// Fails on invalid TOML or unknown keys.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validated session sizes.
    ///
    /// # Errors
    ///
    /// Fails if either size is zero.
    pub fn settings(&self) -> Result<QuizSettings> {
        QuizSettings::new(self.ticket_size, self.exam_size).context("invalid quiz.toml sizes")
    }
}

/// Accept plain file paths as well as sqlx URLs.
fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite://{trimmed}")
    }
}
