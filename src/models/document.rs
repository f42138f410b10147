use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// What an absent or unparseable identifier renders as.
pub const EMPTY_ID_DISPLAY: &str = "000000000";

/// Numeric identifier of a submission, assigned by the backend on creation.
///
/// Rendered everywhere as a 9-digit zero-padded decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// Parse a raw route parameter.
    ///
    /// Surrounding whitespace is tolerated; anything else that is not a plain
    /// decimal number is an `InvalidId` error, distinct from "not found".
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidId("Please provide a valid document ID.".into()));
        }
        trimmed
            .parse::<u64>()
            .map(DocumentId)
            .map_err(|_| AppError::InvalidId(format!("'{trimmed}' is not a valid number")))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

/// Format a raw (possibly missing) identifier for display.
pub fn format_document_id(raw: Option<&str>) -> String {
    raw.and_then(|r| DocumentId::parse(r).ok())
        .map(|id| id.to_string())
        .unwrap_or_else(|| EMPTY_ID_DISPLAY.to_string())
}

/// Format an optional timestamp as `YYYY-MM-DD`, or `-` when absent.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Workflow status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Approved => "Approved",
            DocumentStatus::Rejected => "Rejected",
        }
    }

    /// Parse the stored free-text status. Unknown values yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Pending" => Some(DocumentStatus::Pending),
            "Approved" => Some(DocumentStatus::Approved),
            "Rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DocumentStatus::Pending)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's decision on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn resulting_status(&self) -> DocumentStatus {
        match self {
            Decision::Approve => DocumentStatus::Approved,
            Decision::Reject => DocumentStatus::Rejected,
        }
    }
}

/// One physical document within a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub urgency: String,
    pub document_type: String,
    pub document_title: String,
    pub document_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_description: Option<String>,
    /// Reference returned by the attachment upload endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_stage: Option<String>,
}

/// A persisted submission as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub requestor_name: String,
    pub bu_fu: String,
    pub extension: String,
    pub documents: Vec<DocumentEntry>,
    /// Malformed timestamps deserialize as `None` so that date filters
    /// exclude the record instead of failing the whole payload.
    #[serde(default, with = "lenient_datetime")]
    pub submit_date: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_datetime")]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_stage: Option<String>,
}

impl DocumentRecord {
    /// The entry whose fields represent the record in single-valued columns.
    pub fn primary_entry(&self) -> Option<&DocumentEntry> {
        self.documents.first()
    }

    pub fn status(&self) -> Option<DocumentStatus> {
        self.document_status
            .as_deref()
            .and_then(DocumentStatus::from_label)
    }

    /// A record without a recorded decision is awaiting review.
    pub fn is_pending(&self) -> bool {
        matches!(self.status(), None | Some(DocumentStatus::Pending))
    }

    pub fn submit_day(&self) -> Option<NaiveDate> {
        self.submit_date.map(|d| d.date_naive())
    }
}

/// Requestor metadata plus entries, as sent by the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub requestor_name: String,
    pub bu_fu: String,
    pub extension: String,
    pub documents: Vec<DocumentEntry>,
    pub submit_date: DateTime<Utc>,
}

mod lenient_datetime {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DocumentRecord {
        DocumentRecord {
            id: DocumentId(42),
            requestor_name: "Sovannborith".to_string(),
            bu_fu: "fbit".to_string(),
            extension: "203".to_string(),
            documents: vec![DocumentEntry {
                urgency: "urgent".to_string(),
                document_type: "1".to_string(),
                document_title: "Test".to_string(),
                document_number: "0000000".to_string(),
                ..Default::default()
            }],
            submit_date: lenient_datetime::parse("2024-01-15T09:30:00Z"),
            approval_date: None,
            document_status: Some("Pending".to_string()),
            document_stage: None,
        }
    }

    #[test]
    fn test_id_display_is_zero_padded() {
        assert_eq!(DocumentId(42).to_string(), "000000042");
        assert_eq!(DocumentId(123456789).to_string(), "123456789");
    }

    #[test]
    fn test_format_document_id_missing_or_invalid() {
        assert_eq!(format_document_id(None), "000000000");
        assert_eq!(format_document_id(Some("abc")), "000000000");
        assert_eq!(format_document_id(Some("42")), "000000042");
    }

    #[test]
    fn test_parse_distinguishes_invalid_ids() {
        assert_eq!(DocumentId::parse(" 7 ").unwrap(), DocumentId(7));
        assert!(matches!(DocumentId::parse("12x"), Err(AppError::InvalidId(_))));
        assert!(matches!(DocumentId::parse(""), Err(AppError::InvalidId(_))));
        assert!(matches!(DocumentId::parse("-3"), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn test_format_date() {
        let record = sample_record();
        assert_eq!(format_date(record.submit_date.as_ref()), "2024-01-15");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["requestorName"], "Sovannborith");
        assert_eq!(json["buFu"], "fbit");
        assert_eq!(json["documents"][0]["documentTitle"], "Test");
        assert!(json["approvalDate"].is_null());
    }

    #[test]
    fn test_malformed_submit_date_becomes_absent() {
        let json = r###"{
            "id": 3,
            "requestorName": "Dara",
            "buFu": "edc",
            "extension": "110",
            "documents": [],
            "submitDate": "not-a-date"
        }"###;

        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.submit_date, None);
        assert_eq!(record.approval_date, None);
        assert_eq!(record.document_status, None);
    }

    #[test]
    fn test_bare_date_is_accepted() {
        let json = r###"{
            "id": 3,
            "requestorName": "Dara",
            "buFu": "edc",
            "extension": "110",
            "documents": [],
            "submitDate": "2024-01-20"
        }"###;

        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.submit_day(),
            NaiveDate::from_ymd_opt(2024, 1, 20)
        );
    }

    #[test]
    fn test_status_helpers() {
        let mut record = sample_record();
        assert!(record.is_pending());
        record.document_status = Some("Approved".to_string());
        assert_eq!(record.status(), Some(DocumentStatus::Approved));
        assert!(!record.is_pending());
        assert!(DocumentStatus::Rejected.is_terminal());
        assert_eq!(Decision::Reject.resulting_status(), DocumentStatus::Rejected);
    }
}
