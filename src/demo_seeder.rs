use chrono::{DateTime, Duration, Utc};

use crate::db::repository::DocumentRepository;
use crate::error::AppError;
use crate::form::{EntryField, RequestorField, SubmissionForm};
use crate::models::document::Decision;

struct DemoSubmission {
    requestor: &'static str,
    bu_fu: &'static str,
    extension: &'static str,
    days_ago: i64,
    /// (urgency, document type, title, number)
    entries: &'static [(&'static str, &'static str, &'static str, &'static str)],
    decision: Option<Decision>,
}

const DEMO_SUBMISSIONS: &[DemoSubmission] = &[
    DemoSubmission {
        requestor: "Sovannborith",
        bu_fu: "fbit",
        extension: "203",
        days_ago: 1,
        entries: &[("urgent", "2", "Laptop replacement", "PR-2024-0113")],
        decision: None,
    },
    DemoSubmission {
        requestor: "Dara",
        bu_fu: "edc",
        extension: "110",
        days_ago: 2,
        entries: &[
            ("non-urgent", "3", "Q1 price list", "PL-0042"),
            ("non-urgent", "6", "Quotation for Angkor Foods", "QT-0317"),
        ],
        decision: None,
    },
    DemoSubmission {
        requestor: "Sokha",
        bu_fu: "fhrf",
        extension: "145",
        days_ago: 5,
        entries: &[("e-signature", "4", "Training bond - K. Vann", "TB-0009")],
        decision: Some(Decision::Approve),
    },
    DemoSubmission {
        requestor: "Dara",
        bu_fu: "edc",
        extension: "110",
        days_ago: 8,
        entries: &[("urgent", "8", "Warehouse stock adjustment", "SA-0201")],
        decision: Some(Decision::Reject),
    },
    DemoSubmission {
        requestor: "Chanthy",
        bu_fu: "fsco",
        extension: "221",
        days_ago: 12,
        entries: &[
            ("revision(bufu)", "1", "Costing sheet - packaging", "CC-0077"),
            ("non-urgent", "7", "Travel expense exception", "EX-0015"),
        ],
        decision: Some(Decision::Approve),
    },
    DemoSubmission {
        requestor: "Sovannborith",
        bu_fu: "fbit",
        extension: "203",
        days_ago: 20,
        entries: &[("revision(edc)", "5", "Letter to Calmette", "LC-0003")],
        decision: None,
    },
    DemoSubmission {
        requestor: "Piseth",
        bu_fu: "TSS",
        extension: "302",
        days_ago: 34,
        entries: &[("non-urgent", "9", "Vendor onboarding checklist", "OT-0120")],
        decision: Some(Decision::Approve),
    },
];

/// Populate an empty repository with sample submissions.
///
/// Each sample is typed into a [`SubmissionForm`] and submitted, so it passes
/// the same validation as user input. Returns the number of records
/// created; a non-empty repository is left untouched.
pub async fn seed_demo_data(repo: &dyn DocumentRepository, now: DateTime<Utc>) -> Result<usize, AppError> {
    if !repo.list().await?.is_empty() {
        tracing::info!("Repository already has documents, skipping demo seeding.");
        return Ok(0);
    }

    tracing::info!("Starting demo data seeding...");

    for demo in DEMO_SUBMISSIONS {
        let submitted = now - Duration::days(demo.days_ago);
        let mut form = SubmissionForm::new(submitted.date_naive());
        form.set_field(RequestorField::RequestorName, demo.requestor);
        form.set_field(RequestorField::BuFu, demo.bu_fu);
        form.set_field(RequestorField::Extension, demo.extension);
        for (index, (urgency, doc_type, title, number)) in demo.entries.iter().enumerate() {
            if index > 0 {
                form.add_entry();
            }
            form.set_entry_field(index, EntryField::Urgency, *urgency);
            form.set_entry_field(index, EntryField::DocumentType, *doc_type);
            form.set_entry_field(index, EntryField::DocumentTitle, *title);
            form.set_entry_field(index, EntryField::DocumentNumber, *number);
        }

        let record = form.submit(repo).await?;
        if let Some(decision) = demo.decision {
            repo.decide(record.id, decision, submitted + Duration::days(1)).await?;
        }
        tracing::info!(id = %record.id, requestor = demo.requestor, "Seeded demo submission");
    }

    tracing::info!("Demo data seeding completed.");
    Ok(DEMO_SUBMISSIONS.len())
}
