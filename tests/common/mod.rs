use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use docflow::app::{api_routes, AppState};
use docflow::db::repository::{DocumentRepository, InMemoryDocumentRepository};
use docflow::storage::client::{FsStorageClient, StorageClient};

/// In-process collaborators plus the API router under test.
///
/// The attachment directory lives as long as this struct.
pub struct TestEnv {
    _data_dir: TempDir,
    pub router: Router,
    pub repo: Arc<dyn DocumentRepository>,
    pub storage: Arc<dyn StorageClient>,
}

impl TestEnv {
    pub async fn start() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryDocumentRepository::new());
        let storage: Arc<dyn StorageClient> = Arc::new(
            FsStorageClient::new(data_dir.path().join("attachments"))
                .await
                .expect("Failed to create attachment storage"),
        );

        let leptos_options = leptos::prelude::LeptosOptions::builder()
            .output_name("docflow")
            .build();

        let app_state = AppState {
            document_repo: repo.clone(),
            storage_client: storage.clone(),
            leptos_options,
        };

        // API routes only, no Leptos SSR
        let router = api_routes().with_state(app_state);

        Self {
            _data_dir: data_dir,
            router,
            repo,
            storage,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Helper: submit one valid submission via the API and return its id.
    pub async fn submit(
        &self,
        server: &axum_test::TestServer,
        requestor: &str,
        title: &str,
        submit_date: &str,
    ) -> u64 {
        let response = server
            .post("/api/v1/documents")
            .json(&submission(requestor, title, submit_date))
            .await;
        let body: serde_json::Value = response.json();
        body["id"].as_u64().expect("Created record should have an id")
    }
}

/// A valid submission body with a single entry.
pub fn submission(requestor: &str, title: &str, submit_date: &str) -> serde_json::Value {
    serde_json::json!({
        "requestorName": requestor,
        "buFu": "fbit",
        "extension": "203",
        "submitDate": submit_date,
        "documents": [{
            "urgency": "urgent",
            "documentType": "1",
            "documentTitle": title,
            "documentNumber": format!("{title}-001"),
        }]
    })
}
