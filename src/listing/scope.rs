use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::document::{DocumentRecord, DocumentStatus};

/// How far back the "recent documents" view looks.
pub const RECENT_WINDOW_DAYS: i64 = 3;

/// Which slice of the collection a list page starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    #[default]
    All,
    Recent,
    Pending,
    Approved,
}

impl ListScope {
    pub const ALL: [ListScope; 4] = [
        ListScope::All,
        ListScope::Recent,
        ListScope::Pending,
        ListScope::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListScope::All => "all",
            ListScope::Recent => "recent",
            ListScope::Pending => "pending",
            ListScope::Approved => "approved",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListScope::All => "All Documents",
            ListScope::Recent => "Recent Documents",
            ListScope::Pending => "My Pending Approval Documents",
            ListScope::Approved => "My Approved Documents",
        }
    }

    pub fn includes(&self, record: &DocumentRecord, now: DateTime<Utc>) -> bool {
        match self {
            ListScope::All => true,
            ListScope::Recent => record
                .submit_date
                .is_some_and(|d| d >= now - Duration::days(RECENT_WINDOW_DAYS) && d <= now),
            ListScope::Pending => record.is_pending(),
            ListScope::Approved => record.status() == Some(DocumentStatus::Approved),
        }
    }

    /// Narrow the collection, keeping insertion order.
    pub fn narrow<'a>(&self, records: &'a [DocumentRecord], now: DateTime<Utc>) -> Vec<&'a DocumentRecord> {
        records.iter().filter(|r| self.includes(r, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::test_support::{record, record_on};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_recent_scope_uses_three_day_window() {
        let fresh = record_on(1, "2024-01-19T08:00:00Z");
        let edge = record_on(2, "2024-01-17T12:00:00Z");
        let stale = record_on(3, "2024-01-10T08:00:00Z");
        let records = vec![fresh, edge, stale];

        let ids: Vec<u64> = ListScope::Recent
            .narrow(&records, now())
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_pending_and_approved_scopes() {
        let pending = record(1, "A", "Memo", "1");
        let mut approved = record(2, "B", "Memo", "2");
        approved.document_status = Some("Approved".into());
        let mut rejected = record(3, "C", "Memo", "3");
        rejected.document_status = Some("Rejected".into());
        let records = vec![pending, approved, rejected];

        let pending_ids: Vec<u64> = ListScope::Pending
            .narrow(&records, now())
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(pending_ids, vec![1]);

        let approved_ids: Vec<u64> = ListScope::Approved
            .narrow(&records, now())
            .iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(approved_ids, vec![2]);

        assert_eq!(ListScope::All.narrow(&records, now()).len(), 3);
    }

    #[test]
    fn test_undated_record_is_never_recent() {
        let mut undated = record(1, "A", "Memo", "1");
        undated.submit_date = None;
        assert!(!ListScope::Recent.includes(&undated, now()));
    }

    #[test]
    fn test_scope_names() {
        for scope in ListScope::ALL {
            assert_eq!(ListScope::from_name(scope.as_str()), Some(scope));
        }
        assert_eq!(ListScope::from_name("mine"), None);
    }
}
