use serde::Serialize;
use tokio::task;
use tracing::{info, warn};

use super::attendee::{
    Attendee, find_by_lunch_token, find_by_lunch_token_mut, find_by_token, find_by_token_mut,
};
use super::lunch;
use super::presence::PresenceMachine;
use crate::error::{CheckpointError, Rejection, StorageError};
use crate::issuance::{QrIssuer, assign_lunch_tokens};
use crate::store::{AttendeeStore, Mutation};

/// Result of a scan as reported back to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Accepted(String),
    Rejected(Rejection),
}

/// Wire form of a [`ScanOutcome`]: `{"status": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReply {
    pub status: &'static str,
    pub message: String,
}

impl From<ScanOutcome> for ScanReply {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Accepted(message) => Self {
                status: "success",
                message,
            },
            ScanOutcome::Rejected(rejection) => Self {
                status: "error",
                message: rejection.to_string(),
            },
        }
    }
}

/// Runs every check-in operation against the attendee store.
///
/// Each call reloads the data file; nothing is cached between calls.
pub struct CheckinService {
    store: AttendeeStore,
    issuer: QrIssuer,
}

impl CheckinService {
    pub fn new(store: AttendeeStore, issuer: QrIssuer) -> Self {
        Self { store, issuer }
    }

    pub fn store(&self) -> &AttendeeStore {
        &self.store
    }

    pub async fn roster(&self) -> Result<Vec<Attendee>, StorageError> {
        self.store.load().await
    }

    pub async fn ticket(&self, token: &str) -> Result<Option<Attendee>, StorageError> {
        let attendees = self.store.load().await?;
        Ok(find_by_token(&attendees, token).cloned())
    }

    pub async fn lunch_ticket(&self, lunch_token: &str) -> Result<Option<Attendee>, StorageError> {
        let attendees = self.store.load().await?;
        Ok(find_by_lunch_token(&attendees, lunch_token).cloned())
    }

    /// Toggle the attendee's presence at the gate.
    pub async fn verify_entry(&self, token: &str) -> Result<ScanOutcome, StorageError> {
        let outcome = self
            .store
            .update(|attendees| match find_by_token_mut(attendees, token) {
                Some(attendee) => {
                    let passage = PresenceMachine::scan(attendee);
                    info!(id = attendee.id, status = %attendee.status, ?passage, "gate scan");
                    Mutation::Commit(ScanOutcome::Accepted(passage.message(&attendee.name)))
                }
                None => Mutation::Skip(ScanOutcome::Rejected(Rejection::InvalidEntryToken)),
            })
            .await?;

        if let ScanOutcome::Rejected(rejection) = &outcome {
            warn!(%rejection, "gate scan rejected");
        }
        Ok(outcome)
    }

    /// Redeem a lunch voucher. Succeeds once per lunch token.
    pub async fn claim_lunch(&self, lunch_token: &str) -> Result<ScanOutcome, StorageError> {
        let outcome = self
            .store
            .update(|attendees| {
                let Some(attendee) = find_by_lunch_token_mut(attendees, lunch_token) else {
                    return Mutation::Skip(ScanOutcome::Rejected(Rejection::InvalidLunchToken));
                };
                match lunch::claim(attendee) {
                    Ok(()) => {
                        info!(id = attendee.id, "lunch claimed");
                        let message = lunch::claimed_message(&attendee.name);
                        Mutation::Commit(ScanOutcome::Accepted(message))
                    }
                    Err(rejection) => Mutation::Skip(ScanOutcome::Rejected(rejection)),
                }
            })
            .await?;

        if let ScanOutcome::Rejected(rejection) = &outcome {
            warn!(%rejection, "lunch scan rejected");
        }
        Ok(outcome)
    }

    /// Render entry codes for all paid attendees. Does not write the store.
    pub async fn issue_entry_qrs(&self, base_url: &str) -> Result<usize, CheckpointError> {
        let attendees = self.store.load().await?;
        let issuer = self.issuer.clone();
        let base_url = base_url.to_string();
        task::spawn_blocking(move || issuer.issue_entry_qrs(&attendees, &base_url))
            .await
            .map_err(|e| CheckpointError::Io(std::io::Error::other(e)))?
    }

    /// Render lunch codes for all paid attendees, then persist their lunch
    /// tokens. A rendering failure leaves the store untouched.
    pub async fn issue_lunch_qrs(&self, base_url: &str) -> Result<usize, CheckpointError> {
        let attendees = self.store.load().await?;
        let issuer = self.issuer.clone();
        let base_url = base_url.to_string();
        let rendered = task::spawn_blocking(move || issuer.issue_lunch_qrs(&attendees, &base_url))
            .await
            .map_err(|e| CheckpointError::Io(std::io::Error::other(e)))??;

        let assigned = self
            .store
            .update(|attendees| Mutation::Commit(assign_lunch_tokens(attendees).len()))
            .await?;
        if assigned != rendered {
            warn!(rendered, assigned, "roster changed during lunch issuance");
        }
        Ok(assigned)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::checkin::Presence;
    use crate::issuance::tests::{BrokenRenderer, RecordingRenderer};
    use tempfile::TempDir;

    async fn service(dir: &TempDir) -> (CheckinService, Arc<RecordingRenderer>) {
        let store = AttendeeStore::new(dir.path().join("attendees.json"));
        store
            .replace(&[
                Attendee::new(1, "Simran Patel".into(), "simran@x".into(), "abc123".into(), true),
                Attendee::new(2, "Rohan Gupta".into(), "rohan@x".into(), "xyz789".into(), false),
            ])
            .await
            .unwrap();
        let renderer = Arc::new(RecordingRenderer::default());
        let issuer = QrIssuer::new(renderer.clone(), &dir.path().join("static"));
        (CheckinService::new(store, issuer), renderer)
    }

    #[tokio::test]
    async fn verify_walks_outside_then_inside() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir).await;

        let first = svc.verify_entry("abc123").await.unwrap();
        assert_eq!(first, ScanOutcome::Accepted("Exit recorded for Simran Patel".into()));
        assert_eq!(svc.ticket("abc123").await.unwrap().unwrap().status, Presence::Outside);

        let second = svc.verify_entry("abc123").await.unwrap();
        assert_eq!(second, ScanOutcome::Accepted("Entry allowed for Simran Patel".into()));
        assert_eq!(svc.ticket("abc123").await.unwrap().unwrap().status, Presence::Inside);
    }

    #[tokio::test]
    async fn unknown_token_is_invalid_qr() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir).await;

        let outcome = svc.verify_entry("zzz").await.unwrap();
        assert_eq!(
            ScanReply::from(outcome),
            ScanReply {
                status: "error",
                message: "Invalid QR".into()
            }
        );
    }

    #[tokio::test]
    async fn lunch_can_be_claimed_once() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir).await;
        svc.issue_lunch_qrs("http://localhost:5000").await.unwrap();

        let first = svc.claim_lunch("lunch_abc123").await.unwrap();
        assert_eq!(first, ScanOutcome::Accepted("Lunch claimed for Simran Patel".into()));

        for _ in 0..2 {
            let again = svc.claim_lunch("lunch_abc123").await.unwrap();
            assert_eq!(again, ScanOutcome::Rejected(Rejection::AlreadyClaimed));
        }
        let attendee = svc.lunch_ticket("lunch_abc123").await.unwrap().unwrap();
        assert_eq!(attendee.lunch_scanned, Some(true));
    }

    #[tokio::test]
    async fn unpaid_attendee_has_no_lunch_ticket() {
        let dir = TempDir::new().unwrap();
        let (svc, renderer) = service(&dir).await;

        let count = svc.issue_lunch_qrs("http://localhost:5000").await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(renderer.rendered.lock().len(), 1);

        let outcome = svc.claim_lunch("lunch_xyz789").await.unwrap();
        assert_eq!(outcome, ScanOutcome::Rejected(Rejection::InvalidLunchToken));
        let roster = svc.roster().await.unwrap();
        assert_eq!(roster[1].lunch_token, None);
    }

    #[tokio::test]
    async fn failed_lunch_rendering_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let (svc, _) = service(&dir).await;
        let before = std::fs::read(svc.store().path()).unwrap();
        let broken = CheckinService::new(
            AttendeeStore::new(svc.store().path()),
            QrIssuer::new(Arc::new(BrokenRenderer), &dir.path().join("static")),
        );

        let result = broken.issue_lunch_qrs("http://localhost:5000").await;

        assert!(matches!(result, Err(CheckpointError::Render { .. })));
        assert_eq!(std::fs::read(svc.store().path()).unwrap(), before);
        let attendee = broken.ticket("abc123").await.unwrap().unwrap();
        assert_eq!(attendee.lunch_token, None);
        assert!(broken.lunch_ticket("lunch_abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn entry_issuance_leaves_store_alone() {
        let dir = TempDir::new().unwrap();
        let (svc, renderer) = service(&dir).await;
        let before = std::fs::read(svc.store().path()).unwrap();

        let count = svc.issue_entry_qrs("http://gate.local").await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(renderer.rendered.lock()[0].0, "http://gate.local/ticket/abc123");
        assert_eq!(std::fs::read(svc.store().path()).unwrap(), before);
    }

    #[tokio::test]
    async fn missing_store_is_fatal() {
        let dir = TempDir::new().unwrap();
        let issuer = QrIssuer::new(Arc::new(RecordingRenderer::default()), dir.path());
        let svc = CheckinService::new(AttendeeStore::new(dir.path().join("absent.json")), issuer);

        assert!(matches!(
            svc.verify_entry("abc123").await,
            Err(StorageError::Missing { .. })
        ));
    }
}
