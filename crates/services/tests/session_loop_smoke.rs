use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::QuestionBank;
use quiz_core::model::{ChoiceKey, QuizSettings, ScoreBand, TicketNumber};
use quiz_services::{
    AppServices, PersistStatus, ProgressService, QuizLoopService, SessionError, SessionState,
};
use quiz_storage::repository::{InMemoryStore, KeyValueStore, Storage, StorageError};

fn bank_json(len: usize) -> String {
    let records: Vec<String> = (0..len)
        .map(|i| {
            format!(
                r#"{{"question":"Q{i}","options":{{"A":"a","B":"b","C":"c","D":""}},"correct":"B"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn ticket(n: u32) -> TicketNumber {
    TicketNumber::new(n).unwrap()
}

/// Store whose writes always fail; reads see nothing.
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn put_all(&self, _entries: &[(&str, String)]) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }
}

#[tokio::test]
async fn ticket_completion_persists_score_pair() {
    let bank = QuestionBank::try_from_json_str(&bank_json(10)).unwrap();
    let storage = Storage::in_memory();
    let services = AppServices::from_storage(&storage, bank, QuizSettings::new(10, 60).unwrap());
    let loop_svc = services.session_loop();

    let mut session = loop_svc.start_ticket(ticket(1)).unwrap();
    let mut last = None;
    for i in 0..10 {
        let selected = if i == 0 { ChoiceKey::A } else { ChoiceKey::B };
        loop_svc.answer_current(&mut session, selected).unwrap();
        last = Some(loop_svc.advance(&mut session).await.unwrap());
    }

    let last = last.unwrap();
    assert_eq!(last.state, SessionState::Completed);
    assert!(matches!(last.persist, PersistStatus::Saved));
    let outcome = last.outcome.unwrap();
    assert_eq!((outcome.correct, outcome.total, outcome.percent), (9, 10, 90));
    assert_eq!(outcome.band, ScoreBand::Excellent);

    assert_eq!(storage.progress.get_i64("ticket_1_score").await.unwrap(), Some(9));
    assert_eq!(storage.progress.get_i64("ticket_1_total").await.unwrap(), Some(10));

    let record = services
        .progress()
        .read_ticket_result(ticket(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!((record.score(), record.total()), (9, 10));
}

#[tokio::test]
async fn exam_completion_is_never_persisted() {
    let store = InMemoryStore::new();
    let progress = Arc::new(ProgressService::new(Arc::new(store.clone())));
    let bank = Arc::new(QuestionBank::from_json_str(&bank_json(4)));
    let loop_svc = QuizLoopService::new(bank, QuizSettings::default(), progress);

    let mut session = loop_svc.start_exam().unwrap();
    assert_eq!(session.total(), 4);
    let mut result = None;
    while !session.is_complete() {
        loop_svc.answer_current(&mut session, ChoiceKey::B).unwrap();
        result = Some(loop_svc.advance(&mut session).await.unwrap());
    }

    let result = result.unwrap();
    assert!(matches!(result.persist, PersistStatus::NotApplicable));
    assert_eq!(result.outcome.unwrap().percent, 100);
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn empty_bank_and_missing_ticket_are_rejected() {
    let empty = AppServices::in_memory(
        QuestionBank::from_json_str("not json"),
        QuizSettings::default(),
    );
    assert!(matches!(
        empty.session_loop().start_exam(),
        Err(SessionError::EmptyBank)
    ));

    let services = AppServices::in_memory(
        QuestionBank::from_json_str(&bank_json(3)),
        QuizSettings::new(2, 60).unwrap(),
    );
    assert_eq!(services.overview().ticket_count, 2);
    let loop_svc = services.session_loop();
    assert_eq!(loop_svc.start_ticket(ticket(2)).unwrap().total(), 1);
    assert!(matches!(
        loop_svc.start_ticket(ticket(3)),
        Err(SessionError::Empty)
    ));
}

#[tokio::test]
async fn failed_write_still_reports_outcome_and_can_be_retried() {
    let progress = Arc::new(ProgressService::new(Arc::new(BrokenStore)));
    let bank = Arc::new(QuestionBank::from_json_str(&bank_json(2)));
    let loop_svc = QuizLoopService::new(bank, QuizSettings::default(), progress);

    let mut session = loop_svc.start_ticket(ticket(1)).unwrap();
    loop_svc.answer_current(&mut session, ChoiceKey::B).unwrap();
    loop_svc.advance(&mut session).await.unwrap();
    loop_svc.answer_current(&mut session, ChoiceKey::B).unwrap();
    let result = loop_svc.advance(&mut session).await.unwrap();

    assert!(result.persist.is_failed());
    assert_eq!(result.outcome.unwrap().percent, 100);
    assert!(matches!(
        loop_svc.finalize_result(&mut session).await,
        Err(SessionError::Progress(_))
    ));
}

#[tokio::test]
async fn finalize_does_not_rewrite_saved_result() {
    let store = InMemoryStore::new();
    let progress = Arc::new(ProgressService::new(Arc::new(store.clone())));
    let bank = Arc::new(QuestionBank::from_json_str(&bank_json(1)));
    let loop_svc = QuizLoopService::new(bank, QuizSettings::default(), progress);

    let mut session = loop_svc.start_ticket(ticket(1)).unwrap();
    assert!(matches!(
        loop_svc.finalize_result(&mut session).await,
        Err(SessionError::NotCompleted)
    ));
    loop_svc.answer_current(&mut session, ChoiceKey::B).unwrap();
    loop_svc.advance(&mut session).await.unwrap();

    store.put("ticket_1_score", "0".to_string()).await.unwrap();
    loop_svc.finalize_result(&mut session).await.unwrap();
    assert_eq!(store.get("ticket_1_score").await.unwrap().as_deref(), Some("0"));
}
