//! Submission form: the editable draft, its declarative schema and the
//! entry-list manager that drives the "new documents" page.

pub mod manager;
pub mod schema;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentEntry, SubmissionPayload};

pub use manager::{EntryField, RequestorField, SubmissionForm};
pub use schema::{validate_draft, validate_payload, ValidationErrors};

/// Date format of the submit-date input.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Form values exactly as typed, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub requestor_name: String,
    pub bu_fu: String,
    pub extension: String,
    pub submit_date: String,
    pub documents: Vec<DocumentEntry>,
}

impl SubmissionDraft {
    /// One blank entry, submit date preset to `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            requestor_name: String::new(),
            bu_fu: String::new(),
            extension: String::new(),
            submit_date: today.format(DATE_INPUT_FORMAT).to_string(),
            documents: vec![DocumentEntry::default()],
        }
    }

    pub fn from_payload(payload: &SubmissionPayload) -> Self {
        Self {
            requestor_name: payload.requestor_name.clone(),
            bu_fu: payload.bu_fu.clone(),
            extension: payload.extension.clone(),
            submit_date: payload.submit_date.format(DATE_INPUT_FORMAT).to_string(),
            documents: payload.documents.clone(),
        }
    }

    /// Validate and convert into the payload handed to the backend.
    pub fn to_payload(&self) -> Result<SubmissionPayload, ValidationErrors> {
        validate_draft(self)?;

        let mut errors = ValidationErrors::default();
        let Some(day) = parse_input_date(&self.submit_date) else {
            errors.insert(
                schema::SUBMIT_DATE.name,
                schema::invalid_message(&schema::SUBMIT_DATE, &self.submit_date),
            );
            return Err(errors);
        };

        Ok(normalize_payload(SubmissionPayload {
            requestor_name: self.requestor_name.clone(),
            bu_fu: self.bu_fu.clone(),
            extension: self.extension.clone(),
            documents: self.documents.clone(),
            submit_date: day.and_time(NaiveTime::MIN).and_utc(),
        }))
    }
}

/// Canonical stored form of a submission, whichever path it arrived by.
///
/// Free text is trimmed and blank optionals become `None`; the submit
/// timestamp is kept as given.
pub fn normalize_payload(payload: SubmissionPayload) -> SubmissionPayload {
    SubmissionPayload {
        requestor_name: payload.requestor_name.trim().to_string(),
        extension: payload.extension.trim().to_string(),
        documents: payload.documents.iter().map(normalize_entry).collect(),
        ..payload
    }
}

pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT).ok()
}

/// Trim free text and turn blank optionals into `None`.
fn normalize_entry(entry: &DocumentEntry) -> DocumentEntry {
    let optional = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    DocumentEntry {
        urgency: entry.urgency.clone(),
        document_type: entry.document_type.clone(),
        document_title: entry.document_title.trim().to_string(),
        document_number: entry.document_number.trim().to_string(),
        document_description: optional(&entry.document_description),
        document_url: optional(&entry.document_url),
        document_status: None,
        document_stage: None,
    }
}
