use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::document::DocumentRecord;

/// Criteria edited in the filter sheet.
///
/// Held twice by a [`super::ListView`]: once as a draft the user is editing
/// and once as the applied value the pipeline actually uses. An empty or
/// `None` criterion imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilters {
    #[serde(default)]
    pub requestor_name: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub document_status: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl AdvancedFilters {
    pub fn is_empty(&self) -> bool {
        set(&self.requestor_name).is_none()
            && set(&self.document_type).is_none()
            && set(&self.urgency).is_none()
            && set(&self.document_status).is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn matches(&self, record: &DocumentRecord) -> bool {
        if let Some(name) = set(&self.requestor_name) {
            if record.requestor_name != name {
                return false;
            }
        }

        if let Some(doc_type) = set(&self.document_type) {
            if !record.documents.iter().any(|e| e.document_type == doc_type) {
                return false;
            }
        }

        if let Some(urgency) = set(&self.urgency) {
            if !record.documents.iter().any(|e| e.urgency == urgency) {
                return false;
            }
        }

        if let Some(status) = set(&self.document_status) {
            if record.document_status.as_deref() != Some(status) {
                return false;
            }
        }

        self.matches_date_range(record)
    }

    /// Day-granular, inclusive on both ends. A record without a submit date
    /// never satisfies a date constraint.
    fn matches_date_range(&self, record: &DocumentRecord) -> bool {
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }

        let Some(day) = record.submit_day() else {
            return false;
        };

        if let Some(start) = self.start_date {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }
        true
    }
}

/// The complete criteria set fed to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Matched against entry titles and numbers, case-insensitively.
    #[serde(default)]
    pub free_text_query: String,
    #[serde(flatten)]
    pub advanced: AdvancedFilters,
}

impl FilterState {
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        matches_free_text(record, &self.free_text_query) && self.advanced.matches(record)
    }

    /// Keep the matching records, preserving their order.
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a DocumentRecord>) -> Vec<&'a DocumentRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// A blank (or whitespace-only) query matches everything.
pub fn matches_free_text(record: &DocumentRecord, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record.documents.iter().any(|entry| {
        entry.document_title.to_lowercase().contains(&needle)
            || entry.document_number.to_lowercase().contains(&needle)
    })
}

fn set(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
