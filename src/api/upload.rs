use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::storage::client::StorageClient;

/// Largest attachment accepted by the upload endpoint.
pub const MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// Upload endpoint.
pub const ATTACHMENT_UPLOAD_PATH: &str = "/api/v1/attachments";

/// URL prefix under which stored attachments are served.
pub const ATTACHMENT_URL_PREFIX: &str = "/api/v1/attachments/";

/// Multipart field carrying the file.
pub const ATTACHMENT_FIELD: &str = "file";

/// Response from a successful attachment upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Durable reference, stored as the entry's `documentUrl`.
    pub url: String,
}

/// Content-addressed key: SHA-256 of the bytes plus the original extension.
///
/// Uploading the same file twice yields the same key.
pub fn attachment_key(file_name: &str, data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

    match extension_of(file_name) {
        Some(ext) => format!("{hex}.{ext}"),
        None => hex,
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    let valid = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

pub fn content_type_for(key: &str) -> &'static str {
    match extension_of(key).as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Core upload logic, separated from multipart parsing for testability.
pub async fn process_upload(
    storage: &dyn StorageClient,
    file_name: &str,
    data: Vec<u8>,
) -> Result<UploadResponse, AppError> {
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if data.len() > MAX_ATTACHMENT_BYTES {
        return Err(AppError::BadRequest(format!(
            "Attachment exceeds {} bytes",
            MAX_ATTACHMENT_BYTES
        )));
    }

    let key = attachment_key(file_name, &data);
    let size = data.len();
    storage.put_object(&key, data).await?;
    tracing::info!(%key, size, "Stored attachment");

    Ok(UploadResponse {
        url: format!("{ATTACHMENT_URL_PREFIX}{key}"),
    })
}

/// Axum handler for `POST /api/v1/attachments`.
///
/// Accepts a multipart form with a single file field named [`ATTACHMENT_FIELD`].
#[cfg(feature = "ssr")]
pub async fn upload_attachment_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    mut multipart: axum::extract::Multipart,
) -> Result<axum::Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(ATTACHMENT_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

        let response = process_upload(state.storage_client.as_ref(), &file_name, data.to_vec()).await?;
        return Ok(axum::Json(response));
    }

    Err(AppError::BadRequest("No file field found in request".into()))
}

/// Send a file picked in the browser to the upload endpoint and return the
/// stored reference.
#[cfg(feature = "hydrate")]
pub async fn upload_from_browser(file: web_sys::File) -> Result<String, String> {
    let form = web_sys::FormData::new().map_err(|_| "Could not prepare the upload".to_string())?;
    form.append_with_blob_and_filename(ATTACHMENT_FIELD, &file, &file.name())
        .map_err(|_| "Could not read the selected file".to_string())?;

    let response = gloo_net::http::Request::post(ATTACHMENT_UPLOAD_PATH)
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.ok() {
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body["error"].as_str().map(str::to_string),
            Err(_) => None,
        };
        return Err(message.unwrap_or_else(|| format!("Upload failed ({})", response.status())));
    }

    let uploaded: UploadResponse = response.json().await.map_err(|e| e.to_string())?;
    Ok(uploaded.url)
}

/// Axum handler for `GET /api/v1/attachments/{key}`.
#[cfg(feature = "ssr")]
pub async fn serve_attachment_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(key): axum::extract::Path<String>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    if !crate::storage::client::is_valid_key(&key) {
        return Err(AppError::NotFound("Attachment not found".into()));
    }

    let data = state
        .storage_client
        .get_object(&key)
        .await?
        .ok_or_else(|| AppError::NotFound("Attachment not found".into()))?;

    Ok(([(axum::http::header::CONTENT_TYPE, content_type_for(&key))], data).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockStorage {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                objects: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StorageClient for MockStorage {
        async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError> {
            self.objects.lock().unwrap().insert(key.to_string(), content);
            Ok(())
        }

        async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
            Ok(self.objects.lock().unwrap().get(key).cloned())
        }
    }

    #[test]
    fn test_key_is_content_addressed() {
        let a = attachment_key("Report.PDF", b"hello");
        let b = attachment_key("other-name.pdf", b"hello");
        assert_eq!(a, b);
        assert_eq!(
            a,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824.pdf"
        );
        assert_ne!(a, attachment_key("Report.pdf", b"hello!"));
    }

    #[test]
    fn test_odd_extensions_are_dropped() {
        let key = attachment_key("archive", b"x");
        assert!(!key.contains('.'));
        let key = attachment_key("weird.p/df", b"x");
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_content_type_lookup() {
        assert_eq!(content_type_for("abc.pdf"), "application/pdf");
        assert_eq!(content_type_for("abc.JPG"), "image/jpeg");
        assert_eq!(content_type_for("abc"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_stores_and_returns_url() {
        let storage = MockStorage::new();
        let response = process_upload(&storage, "scan.pdf", b"%PDF".to_vec()).await.unwrap();

        let key = response.url.trim_start_matches(ATTACHMENT_URL_PREFIX);
        assert!(key.ends_with(".pdf"));
        assert_eq!(
            storage.get_object(key).await.unwrap(),
            Some(b"%PDF".to_vec())
        );
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let storage = MockStorage::new();
        let err = process_upload(&storage, "scan.pdf", Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
