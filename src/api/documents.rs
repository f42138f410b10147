use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::form::normalize_payload;
use crate::form::schema::validate_payload;
use crate::listing::{FilterOptions, ListPage, ListScope, ListView, SortDirection, SortField, SortState};
use crate::models::document::{Decision, DocumentId, DocumentRecord, DocumentStatus, SubmissionPayload};

/// Query string of `GET /api/v1/documents`.
///
/// Every parameter is optional; blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub requestor_name: Option<String>,
    pub document_type: Option<String>,
    pub urgency: Option<String>,
    pub document_status: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// camelCase column name, e.g. `submitDate`.
    pub sort: Option<String>,
    /// `asc` (default) or `desc`.
    pub dir: Option<String>,
    pub page: Option<usize>,
    /// `all` (default), `recent`, `pending` or `approved`.
    pub scope: Option<String>,
}

impl ListQuery {
    /// Build the view with every filter already applied.
    pub fn into_view(self) -> Result<ListView, AppError> {
        let scope = match present(self.scope) {
            Some(name) => ListScope::from_name(&name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown scope '{name}'")))?,
            None => ListScope::All,
        };

        let mut view = ListView::new(scope);
        view.query = self.q.unwrap_or_default();
        view.draft.requestor_name = present(self.requestor_name);
        view.draft.document_type = present(self.document_type);
        view.draft.urgency = present(self.urgency);
        view.draft.document_status = present(self.document_status);
        view.draft.start_date = parse_query_date("start_date", self.start_date)?;
        view.draft.end_date = parse_query_date("end_date", self.end_date)?;
        view.apply_filters();

        view.sort = parse_sort(present(self.sort), present(self.dir))?;
        view.set_page(self.page.unwrap_or(1));
        Ok(view)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_query_date(param: &str, value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    present(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Invalid {param} '{raw}', expected YYYY-MM-DD"))
            })
        })
        .transpose()
}

fn parse_sort(field: Option<String>, dir: Option<String>) -> Result<SortState, AppError> {
    let direction = match dir.as_deref() {
        None | Some("asc") => SortDirection::Asc,
        Some("desc") => SortDirection::Desc,
        Some(other) => {
            return Err(AppError::BadRequest(format!("Invalid sort direction '{other}'")))
        }
    };

    match field {
        None => Ok(SortState::Unsorted),
        Some(name) => SortField::from_name(&name)
            .map(|f| SortState::by(f, direction))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown sort column '{name}'"))),
    }
}

/// What a detail page shows for a raw route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "camelCase")]
pub enum DetailState {
    InvalidId(String),
    NotFound(DocumentId),
    Found(DocumentRecord),
}

/// Body of `POST /api/v1/documents/{id}/decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_submitted: usize,
    pub pending_approval: usize,
    pub total_approved: usize,
    pub total_rejected: usize,
}

impl DashboardSummary {
    pub fn from_records(records: &[DocumentRecord]) -> Self {
        let mut summary = Self {
            total_submitted: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.status() {
                Some(DocumentStatus::Approved) => summary.total_approved += 1,
                Some(DocumentStatus::Rejected) => summary.total_rejected += 1,
                Some(DocumentStatus::Pending) | None => summary.pending_approval += 1,
            }
        }
        summary
    }
}

/// Run the list pipeline for one query.
pub async fn process_list(
    repo: &dyn DocumentRepository,
    query: ListQuery,
    now: DateTime<Utc>,
) -> Result<ListPage, AppError> {
    let view = query.into_view()?;
    let records = repo.list().await?;
    Ok(view.run(&records, now))
}

/// Resolve a detail-page route parameter.
///
/// Invalid and unknown ids are states, not errors; only backend failures
/// come back as `Err`.
pub async fn process_detail(repo: &dyn DocumentRepository, raw_id: &str) -> Result<DetailState, AppError> {
    let id = match DocumentId::parse(raw_id) {
        Ok(id) => id,
        Err(_) => return Ok(DetailState::InvalidId(raw_id.to_string())),
    };

    Ok(match repo.find_by_id(id).await? {
        Some(record) => DetailState::Found(record),
        None => DetailState::NotFound(id),
    })
}

/// Fetch a record; invalid and unknown ids become distinct errors.
pub async fn process_get(repo: &dyn DocumentRepository, raw_id: &str) -> Result<DocumentRecord, AppError> {
    let id = DocumentId::parse(raw_id)?;
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

/// Validate a submission and persist it.
pub async fn process_create(
    repo: &dyn DocumentRepository,
    payload: SubmissionPayload,
) -> Result<DocumentRecord, AppError> {
    if let Err(errors) = validate_payload(&payload) {
        tracing::warn!(fields = errors.len(), "Rejected invalid submission");
        return Err(AppError::Validation(errors));
    }

    let record = repo.create(normalize_payload(payload)).await?;
    tracing::info!(
        id = %record.id,
        requestor = %record.requestor_name,
        entries = record.documents.len(),
        "Created submission"
    );
    Ok(record)
}

/// Approve or reject a pending record.
pub async fn process_decide(
    repo: &dyn DocumentRepository,
    raw_id: &str,
    decision: Decision,
    now: DateTime<Utc>,
) -> Result<DocumentRecord, AppError> {
    let id = DocumentId::parse(raw_id)?;
    match repo.decide(id, decision, now).await {
        Ok(record) => {
            tracing::info!(%id, ?decision, "Recorded decision");
            Ok(record)
        }
        Err(e) => {
            tracing::warn!(%id, ?decision, "Decision refused: {e}");
            Err(e)
        }
    }
}

pub async fn process_dashboard(repo: &dyn DocumentRepository) -> Result<DashboardSummary, AppError> {
    let records = repo.list().await?;
    Ok(DashboardSummary::from_records(&records))
}

/// Picker options, always derived from the unfiltered collection.
pub async fn process_filter_options(repo: &dyn DocumentRepository) -> Result<FilterOptions, AppError> {
    let records = repo.list().await?;
    Ok(FilterOptions::from_records(&records))
}

/// Axum handler for `GET /api/v1/documents`.
#[cfg(feature = "ssr")]
pub async fn list_documents_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Query(query): axum::extract::Query<ListQuery>,
) -> Result<axum::Json<ListPage>, AppError> {
    let page = process_list(state.document_repo.as_ref(), query, Utc::now()).await?;
    Ok(axum::Json(page))
}

/// Axum handler for `GET /api/v1/documents/{id}`.
#[cfg(feature = "ssr")]
pub async fn get_document_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(raw_id): axum::extract::Path<String>,
) -> Result<axum::Json<DocumentRecord>, AppError> {
    let record = process_get(state.document_repo.as_ref(), &raw_id).await?;
    Ok(axum::Json(record))
}

/// Axum handler for `POST /api/v1/documents`.
#[cfg(feature = "ssr")]
pub async fn create_document_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::Json(payload): axum::Json<SubmissionPayload>,
) -> Result<axum::Json<DocumentRecord>, AppError> {
    let record = process_create(state.document_repo.as_ref(), payload).await?;
    Ok(axum::Json(record))
}

/// Axum handler for `POST /api/v1/documents/{id}/decision`.
#[cfg(feature = "ssr")]
pub async fn decide_document_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(raw_id): axum::extract::Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Result<axum::Json<DocumentRecord>, AppError> {
    let record = process_decide(
        state.document_repo.as_ref(),
        &raw_id,
        request.decision,
        Utc::now(),
    )
    .await?;
    Ok(axum::Json(record))
}

/// Axum handler for `GET /api/v1/dashboard`.
#[cfg(feature = "ssr")]
pub async fn dashboard_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<axum::Json<DashboardSummary>, AppError> {
    let summary = process_dashboard(state.document_repo.as_ref()).await?;
    Ok(axum::Json(summary))
}

/// Axum handler for `GET /api/v1/filter-options`.
#[cfg(feature = "ssr")]
pub async fn filter_options_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<axum::Json<FilterOptions>, AppError> {
    let options = process_filter_options(state.document_repo.as_ref()).await?;
    Ok(axum::Json(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{InMemoryDocumentRepository, MockDocumentRepository};
    use crate::models::document::DocumentEntry;

    fn entry(title: &str, number: &str) -> DocumentEntry {
        DocumentEntry {
            urgency: "urgent".into(),
            document_type: "1".into(),
            document_title: title.into(),
            document_number: number.into(),
            ..Default::default()
        }
    }

    fn payload(name: &str, title: &str, submitted: &str) -> SubmissionPayload {
        SubmissionPayload {
            requestor_name: name.into(),
            bu_fu: "fbit".into(),
            extension: "203".into(),
            documents: vec![entry(title, "N-1")],
            submit_date: DateTime::parse_from_rfc3339(submitted)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn seeded() -> InMemoryDocumentRepository {
        let repo = InMemoryDocumentRepository::new();
        for (name, title, date) in [
            ("Dara", "Budget", "2024-01-15T08:00:00Z"),
            ("Sokha", "Invoice", "2024-01-19T08:00:00Z"),
            ("Dara", "Price list", "2024-01-25T08:00:00Z"),
        ] {
            process_create(&repo, payload(name, title, date)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let repo = InMemoryDocumentRepository::new();
        let mut bad = payload("", "Budget", "2024-01-15T08:00:00Z");
        bad.documents[0].urgency = "asap".into();

        match process_create(&repo, bad).await.unwrap_err() {
            AppError::Validation(errors) => {
                assert_eq!(errors.get("requestorName"), Some("Requestor Name is required"));
                assert_eq!(errors.get("documents.0.urgency"), Some("Invalid Urgency 'asap'"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_stores_trimmed_text() {
        let repo = InMemoryDocumentRepository::new();
        let mut padded = payload("Dara ", " Test ", "2024-01-15T08:30:00Z");
        padded.documents[0].document_description = Some("   ".into());

        let record = process_create(&repo, padded).await.unwrap();
        assert_eq!(record.requestor_name, "Dara");
        assert_eq!(record.documents[0].document_title, "Test");
        assert_eq!(record.documents[0].document_description, None);
        assert_eq!(
            record.submit_date,
            Some(DateTime::parse_from_rfc3339("2024-01-15T08:30:00Z").unwrap().with_timezone(&Utc))
        );

        let query = ListQuery {
            requestor_name: Some("Dara".into()),
            ..Default::default()
        };
        let page = process_list(&repo, query, now()).await.unwrap();
        assert_eq!(page.total_count, 1);

        let options = process_filter_options(&repo).await.unwrap();
        assert_eq!(options.requestor_names, vec!["Dara"]);
    }

    #[tokio::test]
    async fn test_list_applies_query() {
        let repo = seeded().await;
        let query = ListQuery {
            requestor_name: Some("Dara".into()),
            sort: Some("submitDate".into()),
            dir: Some("desc".into()),
            ..Default::default()
        };

        let page = process_list(&repo, query, now()).await.unwrap();
        let titles: Vec<&str> = page
            .rows
            .iter()
            .map(|r| r.documents[0].document_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Price list", "Budget"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_list_recent_scope_and_date_range() {
        let repo = seeded().await;
        let query = ListQuery {
            scope: Some("recent".into()),
            ..Default::default()
        };
        let page = process_list(&repo, query, now()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].requestor_name, "Sokha");

        let query = ListQuery {
            start_date: Some("2024-01-10".into()),
            end_date: Some("2024-01-20".into()),
            ..Default::default()
        };
        let page = process_list(&repo, query, now()).await.unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn test_list_rejects_malformed_parameters() {
        let repo = seeded().await;
        for query in [
            ListQuery { start_date: Some("15/01/2024".into()), ..Default::default() },
            ListQuery { sort: Some("colour".into()), ..Default::default() },
            ListQuery { sort: Some("id".into()), dir: Some("up".into()), ..Default::default() },
            ListQuery { scope: Some("mine".into()), ..Default::default() },
        ] {
            let err = process_list(&repo, query, now()).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn test_blank_parameters_are_ignored() {
        let repo = seeded().await;
        let query = ListQuery {
            q: Some(String::new()),
            requestor_name: Some(String::new()),
            start_date: Some(" ".into()),
            sort: Some(String::new()),
            ..Default::default()
        };
        let page = process_list(&repo, query, now()).await.unwrap();
        assert_eq!(page.total_count, 3);
    }

    #[tokio::test]
    async fn test_detail_states() {
        let repo = seeded().await;

        assert!(matches!(
            process_detail(&repo, "1").await.unwrap(),
            DetailState::Found(r) if r.id == DocumentId(1)
        ));
        assert_eq!(
            process_detail(&repo, "999").await.unwrap(),
            DetailState::NotFound(DocumentId(999))
        );
        assert_eq!(
            process_detail(&repo, "abc").await.unwrap(),
            DetailState::InvalidId("abc".into())
        );
    }

    #[tokio::test]
    async fn test_get_maps_states_to_errors() {
        let repo = seeded().await;
        assert!(matches!(process_get(&repo, "abc").await, Err(AppError::InvalidId(_))));
        assert!(matches!(process_get(&repo, "0").await, Err(AppError::NotFound(_))));
        assert!(process_get(&repo, "000000002").await.is_ok());
    }

    #[tokio::test]
    async fn test_decide_and_dashboard() {
        let repo = seeded().await;
        process_decide(&repo, "1", Decision::Approve, now()).await.unwrap();
        process_decide(&repo, "2", Decision::Reject, now()).await.unwrap();

        let err = process_decide(&repo, "1", Decision::Reject, now()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let summary = process_dashboard(&repo).await.unwrap();
        assert_eq!(
            summary,
            DashboardSummary {
                total_submitted: 3,
                pending_approval: 1,
                total_approved: 1,
                total_rejected: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_filter_options_ignore_active_filters() {
        let repo = seeded().await;
        let options = process_filter_options(&repo).await.unwrap();
        assert_eq!(options.requestor_names, vec!["Dara", "Sokha"]);
        assert_eq!(options.urgencies, vec!["urgent"]);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let mut mock = MockDocumentRepository::new();
        mock.expect_list()
            .returning(|| Err(AppError::Internal("connection reset".into())));

        let err = process_list(&mock, ListQuery::default(), now()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(process_dashboard(&mock).await.is_err());
    }
}
