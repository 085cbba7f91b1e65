//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK: &str = r#"[
    {"question": "2 + 2?", "options": {"A": "3", "B": "4", "C": "", "D": ""}, "correct": "B"},
    {"question": "Largest planet?", "options": {"A": "Mars", "B": "Venus", "C": "Jupiter", "D": "Earth"}, "correct": "C"},
    {"question": "No options here", "correct": "A"},
    {"question": "H2O is?", "options": {"A": "Water", "B": "Salt"}, "correct": "A"}
]"#;

fn quiz(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quiz").unwrap();
    cmd.current_dir(dir)
        .env_remove("QUIZ_QUESTIONS")
        .env_remove("QUIZ_DB_URL")
        .env("RUST_LOG", "off");
    cmd
}

fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let bank = dir.path().join("questions.json");
    std::fs::write(&bank, BANK).unwrap();
    std::fs::write(dir.path().join("quiz.toml"), "ticket_size = 2\ndatabase = \"progress.db\"\n")
        .unwrap();
    (dir, bank)
}

#[test]
fn info_reports_valid_totals() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 questions (2 tickets)"))
        .stdout(predicate::str::contains("Theme: dark"));
}

#[test]
fn validate_lists_rejected_records() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("[record 3] missing options object"))
        .stdout(predicate::str::contains("3 of 4 records valid."));
}

#[test]
fn validate_missing_bank_fails() {
    let dir = TempDir::new().unwrap();
    quiz(dir.path())
        .args(["validate", "--questions", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn ticket_result_shows_up_in_ticket_list() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .args(["ticket", "1"])
        .write_stdin("B\nA\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket 1: 2 questions"))
        .stdout(predicate::str::contains("Wrong. Correct answer: C) Jupiter"))
        .stdout(predicate::str::contains("Result: 1/2 (50%) needs review"));

    quiz(dir.path())
        .arg("tickets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticket 1: 2 questions, 1/2 (50%) failed"))
        .stdout(predicate::str::contains("Ticket 2: 1 questions, not attempted"));
}

#[test]
fn unknown_ticket_is_rejected() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .args(["ticket", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ticket 3 does not exist"));

    quiz(dir.path())
        .args(["ticket", "0"])
        .assert()
        .failure();
}

#[test]
fn exam_is_never_saved() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .arg("exam")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam: 3 questions"))
        .stdout(predicate::str::contains("Stopped after 0 of 3 questions."));

    quiz(dir.path())
        .arg("tickets")
        .assert()
        .success()
        .stdout(predicate::str::contains("not attempted"))
        .stdout(predicate::str::contains("%").not());
}

#[test]
fn empty_bank_aborts_sessions() {
    let (dir, _) = workspace();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    quiz(dir.path())
        .args(["exam", "--questions", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions loaded"));
}

#[test]
fn env_override_selects_bank() {
    let (dir, bank) = workspace();
    let other = dir.path().join("other.json");
    std::fs::write(&other, "[]").unwrap();
    assert!(bank.exists());

    quiz(dir.path())
        .env("QUIZ_QUESTIONS", &other)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 questions (0 tickets)"));
}

#[test]
fn theme_toggles_and_persists() {
    let (dir, _) = workspace();
    quiz(dir.path())
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));

    quiz(dir.path())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: light"));

    quiz(dir.path())
        .args(["theme", "--dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"));

    quiz(dir.path())
        .args(["theme", "--dark", "--light"])
        .assert()
        .failure();
}
