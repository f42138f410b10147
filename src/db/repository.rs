use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::document::{
    Decision, DocumentId, DocumentRecord, DocumentStatus, SubmissionPayload,
};

/// Repository trait for submissions.
///
/// This is the backend contract the pages and API handlers depend on; it
/// allows swapping the store and mocking it in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<DocumentRecord>, AppError>;

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<DocumentRecord>, AppError>;

    /// Persist a new submission under the next free id. Records start pending.
    async fn create(&self, payload: SubmissionPayload) -> Result<DocumentRecord, AppError>;

    /// Record an approval or rejection.
    ///
    /// Only a pending record may transition; a second decision is a
    /// `Conflict`.
    async fn decide(
        &self,
        id: DocumentId,
        decision: Decision,
        decided_at: DateTime<Utc>,
    ) -> Result<DocumentRecord, AppError>;
}

struct Store {
    records: Vec<DocumentRecord>,
    next_id: u64,
}

/// Process-local repository. Ids start at 1 and are never reused.
pub struct InMemoryDocumentRepository {
    store: RwLock<Store>,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn poisoned() -> AppError {
        AppError::Internal("document store lock poisoned".into())
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn list(&self) -> Result<Vec<DocumentRecord>, AppError> {
        let store = self.store.read().map_err(|_| Self::poisoned())?;
        Ok(store.records.clone())
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<DocumentRecord>, AppError> {
        let store = self.store.read().map_err(|_| Self::poisoned())?;
        Ok(store.records.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, payload: SubmissionPayload) -> Result<DocumentRecord, AppError> {
        let mut store = self.store.write().map_err(|_| Self::poisoned())?;

        let id = DocumentId(store.next_id);
        store.next_id += 1;

        let record = DocumentRecord {
            id,
            requestor_name: payload.requestor_name,
            bu_fu: payload.bu_fu,
            extension: payload.extension,
            documents: payload.documents,
            submit_date: Some(payload.submit_date),
            approval_date: None,
            document_status: Some(DocumentStatus::Pending.as_str().to_string()),
            document_stage: None,
        };
        store.records.push(record.clone());

        Ok(record)
    }

    async fn decide(
        &self,
        id: DocumentId,
        decision: Decision,
        decided_at: DateTime<Utc>,
    ) -> Result<DocumentRecord, AppError> {
        let mut store = self.store.write().map_err(|_| Self::poisoned())?;

        let record = store
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

        if !record.is_pending() {
            let current = record.document_status.as_deref().unwrap_or("decided");
            return Err(AppError::Conflict(format!(
                "Document {id} is already {current}"
            )));
        }

        let status = decision.resulting_status().as_str().to_string();
        record.document_status = Some(status.clone());
        record.approval_date = Some(decided_at);
        for entry in &mut record.documents {
            entry.document_status = Some(status.clone());
        }

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentEntry;

    fn payload(name: &str) -> SubmissionPayload {
        SubmissionPayload {
            requestor_name: name.to_string(),
            bu_fu: "fbit".to_string(),
            extension: "203".to_string(),
            documents: vec![DocumentEntry {
                urgency: "urgent".into(),
                document_type: "1".into(),
                document_title: "Test".into(),
                document_number: "0000000".into(),
                ..Default::default()
            }],
            submit_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryDocumentRepository::new();
        let a = repo.create(payload("A")).await.unwrap();
        let b = repo.create(payload("B")).await.unwrap();

        assert_eq!(a.id, DocumentId(1));
        assert_eq!(b.id, DocumentId(2));
        assert_eq!(a.status(), Some(DocumentStatus::Pending));
        assert_eq!(a.approval_date, None);

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.requestor_name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = InMemoryDocumentRepository::new();
        repo.create(payload("A")).await.unwrap();

        assert!(repo.find_by_id(DocumentId(1)).await.unwrap().is_some());
        assert!(repo.find_by_id(DocumentId(0)).await.unwrap().is_none());
        assert!(repo.find_by_id(DocumentId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_decide_sets_status_and_approval_date() {
        let repo = InMemoryDocumentRepository::new();
        let created = repo.create(payload("A")).await.unwrap();
        let now = Utc::now();

        let decided = repo.decide(created.id, Decision::Approve, now).await.unwrap();
        assert_eq!(decided.status(), Some(DocumentStatus::Approved));
        assert_eq!(decided.approval_date, Some(now));
        assert_eq!(decided.documents[0].document_status.as_deref(), Some("Approved"));

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored, decided);
    }

    #[tokio::test]
    async fn test_second_decision_conflicts() {
        let repo = InMemoryDocumentRepository::new();
        let created = repo.create(payload("A")).await.unwrap();
        repo.decide(created.id, Decision::Reject, Utc::now()).await.unwrap();

        let err = repo
            .decide(created.id, Decision::Approve, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status(), Some(DocumentStatus::Rejected));
    }

    #[tokio::test]
    async fn test_decide_unknown_id_is_not_found() {
        let repo = InMemoryDocumentRepository::new();
        let err = repo
            .decide(DocumentId(7), Decision::Approve, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
