use std::sync::Arc;

use quiz_core::model::{ProgressRecord, ScoreBand, TicketNumber};
use quiz_core::tickets::ticket_sizes;
use quiz_storage::repository::{KeyValueStore, StorageError};

use crate::error::ProgressServiceError;

fn score_key(ticket: TicketNumber) -> String {
    format!("ticket_{ticket}_score")
}

fn total_key(ticket: TicketNumber) -> String {
    format!("ticket_{ticket}_total")
}

/// Coloring of a ticket in the ticket list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStanding {
    Passed,
    Medium,
    Failed,
    NotAttempted,
}

impl TicketStanding {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TicketStanding::Passed => "passed",
            TicketStanding::Medium => "medium",
            TicketStanding::Failed => "failed",
            TicketStanding::NotAttempted => "not attempted",
        }
    }
}

impl From<Option<ScoreBand>> for TicketStanding {
    fn from(band: Option<ScoreBand>) -> Self {
        match band {
            Some(ScoreBand::Excellent) => TicketStanding::Passed,
            Some(ScoreBand::Good) => TicketStanding::Medium,
            Some(ScoreBand::NeedsReview) => TicketStanding::Failed,
            None => TicketStanding::NotAttempted,
        }
    }
}

/// Status of one ticket for the ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStatus {
    pub ticket: TicketNumber,
    pub question_count: usize,
    pub record: Option<ProgressRecord>,
}

impl TicketStatus {
    /// Band of the last recorded attempt; `None` if the ticket was never finished.
    #[must_use]
    pub fn band(&self) -> Option<ScoreBand> {
        self.record.map(|record| record.band())
    }

    #[must_use]
    pub fn standing(&self) -> TicketStanding {
        TicketStanding::from(self.band())
    }
}

/// Reads and writes per-ticket results in the progress namespace.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store the result of a completed ticket, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` if the pair is invalid, or
    /// `ProgressServiceError::Storage` if the write fails.
    pub async fn record_ticket_result(
        &self,
        ticket: TicketNumber,
        score: u32,
        total: u32,
    ) -> Result<ProgressRecord, ProgressServiceError> {
        let record = ProgressRecord::new(score, total)?;
        let score_key = score_key(ticket);
        let total_key = total_key(ticket);
        self.store
            .put_all(&[
                (score_key.as_str(), record.score().to_string()),
                (total_key.as_str(), record.total().to_string()),
            ])
            .await?;
        tracing::debug!(%ticket, score, total, "ticket result recorded");
        Ok(record)
    }

    /// Last recorded result for `ticket`, or `None` if it was never completed.
    ///
    /// Incomplete, non-numeric or inconsistent stored pairs read as not
    /// attempted.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn read_ticket_result(
        &self,
        ticket: TicketNumber,
    ) -> Result<Option<ProgressRecord>, ProgressServiceError> {
        let score = self.store.get_i64(&score_key(ticket)).await;
        let total = self.store.get_i64(&total_key(ticket)).await;
        let (score, total) = match (score, total) {
            (Ok(score), Ok(total)) => (score, total),
            (Err(StorageError::Serialization(reason)), _)
            | (_, Err(StorageError::Serialization(reason))) => {
                tracing::warn!(%ticket, %reason, "ignoring non-numeric ticket result");
                return Ok(None);
            }
            (Err(err), _) | (_, Err(err)) => return Err(err.into()),
        };

        match (score, total) {
            (Some(score), Some(total)) => match ProgressRecord::from_persisted(score, total) {
                Ok(record) => Ok(Some(record)),
                Err(err) => {
                    tracing::warn!(
                        %ticket,
                        score,
                        total,
                        error = %err,
                        "ignoring invalid ticket result"
                    );
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                tracing::warn!(%ticket, "ignoring half-written ticket result");
                Ok(None)
            }
        }
    }

    /// Every ticket of a bank with its size and last recorded result.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn ticket_overview(
        &self,
        bank_size: usize,
        ticket_size: usize,
    ) -> Result<Vec<TicketStatus>, ProgressServiceError> {
        let mut statuses = Vec::new();
        for (ticket, question_count) in ticket_sizes(bank_size, ticket_size) {
            let record = self.read_ticket_result(ticket).await?;
            statuses.push(TicketStatus {
                ticket,
                question_count,
                record,
            });
        }
        Ok(statuses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_storage::repository::InMemoryStore;

    fn ticket(n: u32) -> TicketNumber {
        TicketNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn records_use_flat_ticket_keys() {
        let store = InMemoryStore::new();
        let service = ProgressService::new(Arc::new(store.clone()));

        service.record_ticket_result(ticket(4), 9, 10).await.unwrap();

        assert_eq!(store.get_i64("ticket_4_score").await.unwrap(), Some(9));
        assert_eq!(store.get_i64("ticket_4_total").await.unwrap(), Some(10));
        let record = service.read_ticket_result(ticket(4)).await.unwrap().unwrap();
        assert_eq!((record.score(), record.total()), (9, 10));
        assert_eq!(record.band(), ScoreBand::Excellent);
    }

    #[tokio::test]
    async fn unattempted_ticket_reads_as_none() {
        let service = ProgressService::new(Arc::new(InMemoryStore::new()));
        assert_eq!(service.read_ticket_result(ticket(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn later_result_overwrites_earlier() {
        let service = ProgressService::new(Arc::new(InMemoryStore::new()));
        service.record_ticket_result(ticket(2), 3, 10).await.unwrap();
        service.record_ticket_result(ticket(2), 8, 10).await.unwrap();

        let record = service.read_ticket_result(ticket(2)).await.unwrap().unwrap();
        assert_eq!(record.score(), 8);
        assert_eq!(record.band(), ScoreBand::Good);
    }

    #[tokio::test]
    async fn zero_total_is_rejected_before_writing() {
        let store = InMemoryStore::new();
        let service = ProgressService::new(Arc::new(store.clone()));
        let err = service.record_ticket_result(ticket(1), 0, 0).await.unwrap_err();
        assert!(matches!(err, ProgressServiceError::Progress(_)));
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn half_written_or_invalid_pairs_are_ignored() {
        let store = InMemoryStore::new();
        store.put_i64("ticket_1_score", 5).await.unwrap();
        store.put_i64("ticket_2_score", 5).await.unwrap();
        store.put_i64("ticket_2_total", 0).await.unwrap();
        let service = ProgressService::new(Arc::new(store));

        assert_eq!(service.read_ticket_result(ticket(1)).await.unwrap(), None);
        assert_eq!(service.read_ticket_result(ticket(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_numeric_values_read_as_not_attempted() {
        let store = InMemoryStore::new();
        store.put("ticket_1_score", "nine".to_string()).await.unwrap();
        store.put_i64("ticket_1_total", 10).await.unwrap();
        store.put_i64("ticket_2_score", 4).await.unwrap();
        store.put("ticket_2_total", String::new()).await.unwrap();
        let service = ProgressService::new(Arc::new(store));
        service.record_ticket_result(ticket(3), 7, 10).await.unwrap();

        assert_eq!(service.read_ticket_result(ticket(1)).await.unwrap(), None);
        assert_eq!(service.read_ticket_result(ticket(2)).await.unwrap(), None);

        let overview = service.ticket_overview(30, 10).await.unwrap();
        let standings: Vec<TicketStanding> = overview.iter().map(TicketStatus::standing).collect();
        assert_eq!(
            standings,
            vec![
                TicketStanding::NotAttempted,
                TicketStanding::NotAttempted,
                TicketStanding::Medium,
            ]
        );
    }

    #[tokio::test]
    async fn overview_lists_every_ticket() {
        let service = ProgressService::new(Arc::new(InMemoryStore::new()));
        service.record_ticket_result(ticket(2), 1, 5).await.unwrap();

        let overview = service.ticket_overview(125, 60).await.unwrap();
        assert_eq!(overview.len(), 3);
        assert_eq!(overview[0].question_count, 60);
        assert_eq!(overview[0].band(), None);
        assert_eq!(overview[0].standing(), TicketStanding::NotAttempted);
        assert_eq!(overview[1].band(), Some(ScoreBand::NeedsReview));
        assert_eq!(overview[1].standing(), TicketStanding::Failed);
        assert_eq!(overview[2].question_count, 5);

        assert!(service.ticket_overview(0, 60).await.unwrap().is_empty());
    }
}
