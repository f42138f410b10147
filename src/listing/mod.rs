//! Filter → sort → paginate pipeline behind every document table.
//!
//! The pipeline is a pure function of a record collection and a
//! serializable [`ListView`]; nothing here renders UI or performs I/O, so
//! the same code runs in the browser, in server functions and in tests.

pub mod filter;
pub mod paginate;
pub mod scope;
pub mod sort;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::document::DocumentRecord;

pub use filter::{AdvancedFilters, FilterState};
pub use paginate::{PageItem, PageSelector, PAGE_SIZE};
pub use scope::ListScope;
pub use sort::{SortDirection, SortField, SortState};

/// One rendered page of the pipeline output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub rows: Vec<DocumentRecord>,
    /// Rows remaining after filtering, across all pages.
    pub total_count: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub selector: PageSelector,
}

/// Run the pipeline over `records`, which are assumed to be in natural order.
pub fn run_pipeline<'a>(
    records: impl IntoIterator<Item = &'a DocumentRecord>,
    filter: &FilterState,
    sort: SortState,
    page: usize,
) -> ListPage {
    let mut rows = filter.apply(records);
    sort.sort(&mut rows);

    let total_count = rows.len();
    let page_count = paginate::page_count(total_count, PAGE_SIZE);
    let visible = paginate::page_slice(&rows, page, PAGE_SIZE);

    tracing::debug!(
        total_count,
        page,
        page_count,
        ?sort,
        "Ran document list pipeline"
    );

    ListPage {
        rows: visible.iter().map(|r| (*r).clone()).collect(),
        total_count,
        page,
        page_count,
        page_size: PAGE_SIZE,
        selector: PageSelector::new(page, page_count),
    }
}

/// View state of one document table.
///
/// The free-text box is live; the advanced filters are edited as a draft and
/// only reach the pipeline once applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub scope: ListScope,
    pub query: String,
    pub draft: AdvancedFilters,
    pub applied: AdvancedFilters,
    pub sort: SortState,
    pub page: usize,
    pub picker_search: PickerSearch,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(ListScope::All)
    }
}

impl ListView {
    pub fn new(scope: ListScope) -> Self {
        Self {
            scope,
            query: String::new(),
            draft: AdvancedFilters::default(),
            applied: AdvancedFilters::default(),
            sort: SortState::Unsorted,
            page: 1,
            picker_search: PickerSearch::default(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Commit the draft filters.
    pub fn apply_filters(&mut self) {
        self.applied = self.draft.clone();
        self.page = 1;
    }

    /// Clear draft, applied filters and picker searches.
    pub fn reset_filters(&mut self) {
        self.draft = AdvancedFilters::default();
        self.applied = AdvancedFilters::default();
        self.picker_search = PickerSearch::default();
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggle(field);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState {
            free_text_query: self.query.clone(),
            advanced: self.applied.clone(),
        }
    }

    /// Scope, then filter, sort and paginate.
    pub fn run(&self, records: &[DocumentRecord], now: chrono::DateTime<chrono::Utc>) -> ListPage {
        let scoped = self.scope.narrow(records, now);
        run_pipeline(scoped, &self.filter_state(), self.sort, self.page)
    }
}

/// Search text typed into each filter picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerSearch {
    pub requestor_name: String,
    pub document_type: String,
    pub urgency: String,
}

/// Distinct values offered by the filter pickers, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub requestor_names: Vec<String>,
    pub document_types: Vec<String>,
    pub urgencies: Vec<String>,
}

impl FilterOptions {
    /// Derived from the full, unfiltered collection.
    pub fn from_records(records: &[DocumentRecord]) -> Self {
        let mut names = BTreeSet::new();
        let mut types = BTreeSet::new();
        let mut urgencies = BTreeSet::new();

        for record in records {
            names.insert(record.requestor_name.clone());
            for entry in &record.documents {
                types.insert(entry.document_type.clone());
                urgencies.insert(entry.urgency.clone());
            }
        }

        Self {
            requestor_names: names.into_iter().collect(),
            document_types: types.into_iter().collect(),
            urgencies: urgencies.into_iter().collect(),
        }
    }

    /// Narrow each list by its picker's search text.
    pub fn searched(&self, search: &PickerSearch) -> Self {
        Self {
            requestor_names: search_options(&self.requestor_names, &search.requestor_name),
            document_types: search_options(&self.document_types, &search.document_type),
            urgencies: search_options(&self.urgencies, &search.urgency),
        }
    }
}

/// Case-insensitive substring search over picker options.
pub fn search_options(options: &[String], needle: &str) -> Vec<String> {
    if needle.is_empty() {
        return options.to_vec();
    }
    let needle = needle.to_lowercase();
    options
        .iter()
        .filter(|o| o.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};

    use crate::models::document::{DocumentEntry, DocumentId, DocumentRecord};

    pub fn record(id: u64, requestor: &str, title: &str, number: &str) -> DocumentRecord {
        DocumentRecord {
            id: DocumentId(id),
            requestor_name: requestor.to_string(),
            bu_fu: "fbit".to_string(),
            extension: "100".to_string(),
            documents: vec![DocumentEntry {
                urgency: "urgent".to_string(),
                document_type: "1".to_string(),
                document_title: title.to_string(),
                document_number: number.to_string(),
                ..Default::default()
            }],
            submit_date: Some(at("2024-01-15T09:00:00Z")),
            approval_date: None,
            document_status: Some("Pending".to_string()),
            document_stage: None,
        }
    }

    pub fn record_on(id: u64, submitted: &str) -> DocumentRecord {
        let mut r = record(id, "Requestor", "Memo", &id.to_string());
        r.submit_date = Some(at(submitted));
        r
    }

    pub fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .expect("valid RFC 3339 timestamp")
            .with_timezone(&Utc)
    }
}
