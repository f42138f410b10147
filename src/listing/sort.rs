use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::document::DocumentRecord;

/// Columns the document table can be sorted by.
///
/// Entry-level columns read the record's first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    DocumentTitle,
    DocumentDescription,
    RequestorName,
    BuFu,
    Extension,
    SubmitDate,
    ApprovalDate,
    Urgency,
    DocumentType,
    DocumentNumber,
    DocumentStatus,
    DocumentStage,
}

impl SortField {
    pub const ALL: [SortField; 13] = [
        SortField::Id,
        SortField::DocumentTitle,
        SortField::DocumentDescription,
        SortField::RequestorName,
        SortField::BuFu,
        SortField::Extension,
        SortField::SubmitDate,
        SortField::ApprovalDate,
        SortField::Urgency,
        SortField::DocumentType,
        SortField::DocumentNumber,
        SortField::DocumentStatus,
        SortField::DocumentStage,
    ];

    /// The camelCase name used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::DocumentTitle => "documentTitle",
            SortField::DocumentDescription => "documentDescription",
            SortField::RequestorName => "requestorName",
            SortField::BuFu => "buFu",
            SortField::Extension => "extension",
            SortField::SubmitDate => "submitDate",
            SortField::ApprovalDate => "approvalDate",
            SortField::Urgency => "urgency",
            SortField::DocumentType => "documentType",
            SortField::DocumentNumber => "documentNumber",
            SortField::DocumentStatus => "documentStatus",
            SortField::DocumentStage => "documentStage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// The single active sort column, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum SortState {
    #[default]
    Unsorted,
    Sorted {
        field: SortField,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        SortState::Sorted { field, direction }
    }

    /// Header-click transition: asc → desc → unsorted on the same column,
    /// and a fresh ascending sort on any other column.
    pub fn toggle(self, clicked: SortField) -> Self {
        match self {
            SortState::Sorted { field, direction } if field == clicked => match direction {
                SortDirection::Asc => SortState::by(field, SortDirection::Desc),
                SortDirection::Desc => SortState::Unsorted,
            },
            _ => SortState::by(clicked, SortDirection::Asc),
        }
    }

    /// Direction shown for a column header (`None` when not the active column).
    pub fn direction_for(&self, column: SortField) -> Option<SortDirection> {
        match self {
            SortState::Sorted { field, direction } if *field == column => Some(*direction),
            _ => None,
        }
    }

    /// Stable in-place sort. Unsorted leaves the natural order untouched.
    pub fn sort(&self, rows: &mut [&DocumentRecord]) {
        let SortState::Sorted { field, direction } = *self else {
            return;
        };
        match direction {
            SortDirection::Asc => rows.sort_by_cached_key(|r| sort_key(r, field)),
            SortDirection::Desc => rows.sort_by_cached_key(|r| Reverse(sort_key(r, field))),
        }
    }
}

/// Comparable projection of one column.
///
/// All keys produced for a given field share a variant, so the derived
/// cross-variant ordering never comes into play.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(u64),
    Date(DateTime<Utc>),
    Text(String),
}

fn sort_key(record: &DocumentRecord, field: SortField) -> SortKey {
    let entry = record.primary_entry();

    match field {
        SortField::Id => SortKey::Number(record.id.0),
        SortField::RequestorName => SortKey::Text(record.requestor_name.to_lowercase()),
        SortField::BuFu => SortKey::Text(record.bu_fu.to_lowercase()),
        SortField::Extension => SortKey::Text(record.extension.to_lowercase()),
        SortField::SubmitDate => SortKey::Date(record.submit_date.unwrap_or(DateTime::<Utc>::MIN_UTC)),
        SortField::ApprovalDate => {
            SortKey::Date(record.approval_date.unwrap_or(DateTime::<Utc>::MIN_UTC))
        }
        SortField::DocumentStatus => optional_text(record.document_status.as_deref()),
        SortField::DocumentStage => optional_text(record.document_stage.as_deref()),
        SortField::DocumentTitle => optional_text(entry.map(|e| e.document_title.as_str())),
        SortField::DocumentNumber => optional_text(entry.map(|e| e.document_number.as_str())),
        SortField::Urgency => optional_text(entry.map(|e| e.urgency.as_str())),
        SortField::DocumentType => optional_text(entry.map(|e| e.document_type.as_str())),
        SortField::DocumentDescription => {
            optional_text(entry.and_then(|e| e.document_description.as_deref()))
        }
    }
}

fn optional_text(value: Option<&str>) -> SortKey {
    SortKey::Text(value.unwrap_or_default().to_lowercase())
}
