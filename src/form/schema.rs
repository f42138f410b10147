//! Declarative validation schema for submissions.
//!
//! Each field is described once by a [`FieldSpec`]. The same table drives
//! per-field validation while the user types and whole-form validation on
//! submit, both in the browser and on the server.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{parse_input_date, SubmissionDraft};
use crate::models::document::{DocumentEntry, SubmissionPayload};
use crate::models::options::{
    is_allowed, SelectOption, BU_FU_OPTIONS, DOCUMENT_TYPE_OPTIONS, URGENCY_OPTIONS,
};

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Enumerated(&'static [SelectOption]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key used in error paths.
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Shown when a required field is left empty.
    pub missing_message: &'static str,
}

pub const REQUESTOR_NAME: FieldSpec = FieldSpec {
    name: "requestorName",
    label: "Requestor Name",
    required: true,
    kind: FieldKind::Text,
    missing_message: "Requestor Name is required",
};

pub const BU_FU: FieldSpec = FieldSpec {
    name: "buFu",
    label: "BU/FU",
    required: true,
    kind: FieldKind::Enumerated(BU_FU_OPTIONS),
    missing_message: "BU/FU is required",
};

pub const EXTENSION: FieldSpec = FieldSpec {
    name: "extension",
    label: "Extension",
    required: true,
    kind: FieldKind::Text,
    missing_message: "Extension is required",
};

pub const SUBMIT_DATE: FieldSpec = FieldSpec {
    name: "submitDate",
    label: "Submit Date",
    required: true,
    kind: FieldKind::Date,
    missing_message: "Submit Date is required",
};

pub const URGENCY: FieldSpec = FieldSpec {
    name: "urgency",
    label: "Urgency",
    required: true,
    kind: FieldKind::Enumerated(URGENCY_OPTIONS),
    missing_message: "Urgency is required",
};

pub const DOCUMENT_TYPE: FieldSpec = FieldSpec {
    name: "documentType",
    label: "Document Type",
    required: true,
    kind: FieldKind::Enumerated(DOCUMENT_TYPE_OPTIONS),
    missing_message: "Document Type is required",
};

pub const DOCUMENT_TITLE: FieldSpec = FieldSpec {
    name: "documentTitle",
    label: "Document Title",
    required: true,
    kind: FieldKind::Text,
    missing_message: "Document Title must be at least 1 character",
};

pub const DOCUMENT_NUMBER: FieldSpec = FieldSpec {
    name: "documentNumber",
    label: "Document Number",
    required: true,
    kind: FieldKind::Text,
    missing_message: "Document Number must be at least 1 character",
};

pub const DOCUMENT_DESCRIPTION: FieldSpec = FieldSpec {
    name: "documentDescription",
    label: "Document Description",
    required: false,
    kind: FieldKind::Text,
    missing_message: "",
};

pub const DOCUMENT_URL: FieldSpec = FieldSpec {
    name: "documentUrl",
    label: "Document Upload",
    required: false,
    kind: FieldKind::Text,
    missing_message: "",
};

/// Submission-level fields, in form order.
pub const REQUESTOR_FIELDS: [FieldSpec; 4] = [REQUESTOR_NAME, BU_FU, EXTENSION, SUBMIT_DATE];

/// Per-entry fields, in form order.
pub const ENTRY_FIELDS: [FieldSpec; 6] = [
    URGENCY,
    DOCUMENT_TYPE,
    DOCUMENT_TITLE,
    DOCUMENT_NUMBER,
    DOCUMENT_DESCRIPTION,
    DOCUMENT_URL,
];

/// Path key for the entry list as a whole.
pub const DOCUMENTS_PATH: &str = "documents";
pub const DOCUMENTS_REQUIRED_MESSAGE: &str = "At least one document is required";

/// Field-level messages keyed by path (`requestorName`, `documents.0.urgency`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn remove(&mut self, path: &str) {
        self.0.remove(path);
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Drop every message under `prefix` (e.g. all of `documents.`).
    pub fn retain_outside(&mut self, prefix: &str) {
        self.0.retain(|path, _| !path.starts_with(prefix));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

pub fn entry_path(index: usize, field: &FieldSpec) -> String {
    format!("{DOCUMENTS_PATH}.{index}.{}", field.name)
}

pub fn invalid_message(spec: &FieldSpec, value: &str) -> String {
    format!("Invalid {} '{}'", spec.label, value)
}

/// Validate one value against its spec.
///
/// Whitespace-only text counts as empty. Optional fields accept anything,
/// including the empty string.
pub fn validate_field(spec: &FieldSpec, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return if spec.required {
            Err(spec.missing_message.to_string())
        } else {
            Ok(())
        };
    }

    match spec.kind {
        FieldKind::Text => Ok(()),
        FieldKind::Date => match parse_input_date(value) {
            Some(_) => Ok(()),
            None => Err(invalid_message(spec, value)),
        },
        FieldKind::Enumerated(options) => {
            if is_allowed(options, value) {
                Ok(())
            } else {
                Err(invalid_message(spec, value))
            }
        }
    }
}

/// Value of a per-entry field.
pub fn entry_value<'a>(entry: &'a DocumentEntry, spec: &FieldSpec) -> &'a str {
    match spec.name {
        "urgency" => &entry.urgency,
        "documentType" => &entry.document_type,
        "documentTitle" => &entry.document_title,
        "documentNumber" => &entry.document_number,
        "documentDescription" => entry.document_description.as_deref().unwrap_or_default(),
        "documentUrl" => entry.document_url.as_deref().unwrap_or_default(),
        _ => "",
    }
}

/// Value of a submission-level field.
pub fn requestor_value<'a>(draft: &'a SubmissionDraft, spec: &FieldSpec) -> &'a str {
    match spec.name {
        "requestorName" => &draft.requestor_name,
        "buFu" => &draft.bu_fu,
        "extension" => &draft.extension,
        "submitDate" => &draft.submit_date,
        _ => "",
    }
}

pub fn validate_entry(index: usize, entry: &DocumentEntry, errors: &mut ValidationErrors) {
    for spec in &ENTRY_FIELDS {
        if let Err(message) = validate_field(spec, entry_value(entry, spec)) {
            errors.insert(entry_path(index, spec), message);
        }
    }
}

/// Whole-form validation run on a submit attempt.
pub fn validate_draft(draft: &SubmissionDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for spec in &REQUESTOR_FIELDS {
        if let Err(message) = validate_field(spec, requestor_value(draft, spec)) {
            errors.insert(spec.name, message);
        }
    }

    if draft.documents.is_empty() {
        errors.insert(DOCUMENTS_PATH, DOCUMENTS_REQUIRED_MESSAGE);
    }
    for (index, entry) in draft.documents.iter().enumerate() {
        validate_entry(index, entry, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Server-side check of a payload received over the wire.
pub fn validate_payload(payload: &SubmissionPayload) -> Result<(), ValidationErrors> {
    validate_draft(&SubmissionDraft::from_payload(payload))
}
