use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schema::{
    self, entry_path, entry_value, requestor_value, validate_field, FieldSpec, ValidationErrors,
};
use super::SubmissionDraft;
use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::models::document::{DocumentEntry, DocumentRecord, SubmissionPayload};

/// Submission-level inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestorField {
    RequestorName,
    BuFu,
    Extension,
    SubmitDate,
}

impl RequestorField {
    pub fn spec(&self) -> &'static FieldSpec {
        match self {
            RequestorField::RequestorName => &schema::REQUESTOR_NAME,
            RequestorField::BuFu => &schema::BU_FU,
            RequestorField::Extension => &schema::EXTENSION,
            RequestorField::SubmitDate => &schema::SUBMIT_DATE,
        }
    }
}

/// Inputs repeated once per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryField {
    Urgency,
    DocumentType,
    DocumentTitle,
    DocumentNumber,
    DocumentDescription,
    DocumentUrl,
}

impl EntryField {
    pub fn spec(&self) -> &'static FieldSpec {
        match self {
            EntryField::Urgency => &schema::URGENCY,
            EntryField::DocumentType => &schema::DOCUMENT_TYPE,
            EntryField::DocumentTitle => &schema::DOCUMENT_TITLE,
            EntryField::DocumentNumber => &schema::DOCUMENT_NUMBER,
            EntryField::DocumentDescription => &schema::DOCUMENT_DESCRIPTION,
            EntryField::DocumentUrl => &schema::DOCUMENT_URL,
        }
    }

    fn write(&self, entry: &mut DocumentEntry, value: String) {
        match self {
            EntryField::Urgency => entry.urgency = value,
            EntryField::DocumentType => entry.document_type = value,
            EntryField::DocumentTitle => entry.document_title = value,
            EntryField::DocumentNumber => entry.document_number = value,
            EntryField::DocumentDescription => entry.document_description = Some(value),
            EntryField::DocumentUrl => entry.document_url = Some(value),
        }
    }
}

/// State of the submission page.
///
/// Holds the draft plus the messages currently shown next to fields. Field
/// setters validate the touched field immediately; the full schema runs on
/// a submit attempt. Entry operations keep the list non-empty, and the set
/// of touched fields travels with its entry when entries are reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    today: NaiveDate,
    draft: SubmissionDraft,
    errors: ValidationErrors,
    /// Parallel to `draft.documents`.
    touched: Vec<BTreeSet<EntryField>>,
    submit_attempted: bool,
}

impl SubmissionForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            draft: SubmissionDraft::blank(today),
            errors: ValidationErrors::default(),
            touched: vec![BTreeSet::new()],
            submit_attempted: false,
        }
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn entries(&self) -> &[DocumentEntry] {
        &self.draft.documents
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    pub fn set_field(&mut self, field: RequestorField, value: impl Into<String>) {
        let value = value.into();
        match field {
            RequestorField::RequestorName => self.draft.requestor_name = value,
            RequestorField::BuFu => self.draft.bu_fu = value,
            RequestorField::Extension => self.draft.extension = value,
            RequestorField::SubmitDate => self.draft.submit_date = value,
        }

        let spec = field.spec();
        let result = validate_field(spec, requestor_value(&self.draft, spec));
        self.record(spec.name.to_string(), result);
    }

    /// Returns `false` when `index` is out of range.
    pub fn set_entry_field(&mut self, index: usize, field: EntryField, value: impl Into<String>) -> bool {
        let Some(entry) = self.draft.documents.get_mut(index) else {
            return false;
        };
        field.write(entry, value.into());
        if let Some(touched) = self.touched.get_mut(index) {
            touched.insert(field);
        }

        let spec = field.spec();
        let result = validate_field(spec, entry_value(entry, spec));
        self.record(entry_path(index, spec), result);
        true
    }

    /// Append a blank entry.
    pub fn add_entry(&mut self) {
        self.draft.documents.push(DocumentEntry::default());
        self.touched.push(BTreeSet::new());
        self.revalidate_entries();
    }

    /// Rejected when it would leave the form without entries.
    pub fn remove_entry(&mut self, index: usize) -> bool {
        if self.draft.documents.len() <= 1 || index >= self.draft.documents.len() {
            tracing::debug!(index, "Refusing to remove entry");
            return false;
        }
        self.draft.documents.remove(index);
        self.touched.remove(index);
        self.revalidate_entries();
        true
    }

    /// Insert a copy of the entry right after it.
    pub fn duplicate_entry(&mut self, index: usize) -> bool {
        let Some(entry) = self.draft.documents.get(index).cloned() else {
            return false;
        };
        self.draft.documents.insert(index + 1, entry);
        let touched = self.touched.get(index).cloned().unwrap_or_default();
        self.touched.insert(index + 1, touched);
        self.revalidate_entries();
        true
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.draft.documents.len() {
            return false;
        }
        self.draft.documents.swap(index - 1, index);
        self.touched.swap(index - 1, index);
        self.revalidate_entries();
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index.saturating_add(1) >= self.draft.documents.len() {
            return false;
        }
        self.draft.documents.swap(index, index + 1);
        self.touched.swap(index, index + 1);
        self.revalidate_entries();
        true
    }

    /// Back to one blank entry and today's date.
    pub fn reset(&mut self) {
        *self = Self::new(self.today);
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        schema::validate_draft(&self.draft).is_ok()
    }

    /// Run the full schema and, if it passes, build the payload.
    ///
    /// On failure every message is surfaced on the form.
    pub fn prepare_submission(&mut self) -> Result<SubmissionPayload, ValidationErrors> {
        self.submit_attempted = true;
        match self.draft.to_payload() {
            Ok(payload) => {
                self.errors = ValidationErrors::default();
                Ok(payload)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate, hand the payload to the backend and reset on success.
    ///
    /// This is the in-process path, used by the demo seeder. The page
    /// sends [`Self::prepare_submission`]'s payload through a server action
    /// instead.
    pub async fn submit(&mut self, repo: &dyn DocumentRepository) -> Result<DocumentRecord, AppError> {
        let payload = match self.prepare_submission() {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::warn!(fields = errors.len(), "Submission blocked by validation");
                return Err(AppError::Validation(errors));
            }
        };

        let entries = payload.documents.len();
        let record = repo.create(payload).await?;
        tracing::info!(id = %record.id, entries, "Submitted documents");
        self.reset();
        Ok(record)
    }

    fn record(&mut self, path: String, result: Result<(), String>) {
        match result {
            Ok(()) => self.errors.remove(&path),
            Err(message) => self.errors.insert(path, message),
        }
    }

    /// Entry indices shift on structural edits, so entry messages are
    /// recomputed. Before the first submit attempt only touched fields are
    /// checked; afterwards every entry field is.
    fn revalidate_entries(&mut self) {
        self.errors.retain_outside(schema::DOCUMENTS_PATH);

        if self.submit_attempted {
            if let Err(errors) = schema::validate_draft(&self.draft) {
                for (path, message) in errors.iter() {
                    if path.starts_with(schema::DOCUMENTS_PATH) {
                        self.errors.insert(path, message);
                    }
                }
            }
            return;
        }

        for (index, (entry, touched)) in self.draft.documents.iter().zip(&self.touched).enumerate() {
            for field in touched {
                let spec = field.spec();
                if let Err(message) = validate_field(spec, entry_value(entry, spec)) {
                    self.errors.insert(entry_path(index, spec), message);
                }
            }
        }
    }
}
