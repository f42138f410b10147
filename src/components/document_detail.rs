use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::api::documents::DetailState;
use crate::models::document::{format_date, Decision, DocumentEntry, DocumentRecord, DocumentStatus};
use crate::models::options::{label_for, DOCUMENT_TYPE_OPTIONS, URGENCY_OPTIONS};

/// Server function resolving the detail page for a raw route parameter.
#[server(GetDocumentDetail, "/api")]
pub async fn get_document_detail(raw_id: String) -> Result<DetailState, ServerFnError> {
    let state = expect_context::<crate::app::AppState>();
    crate::api::documents::process_detail(state.document_repo.as_ref(), &raw_id)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

/// Server function recording an approval or rejection.
#[server(DecideDocument, "/api")]
pub async fn decide_document(raw_id: String, decision: Decision) -> Result<DocumentRecord, ServerFnError> {
    let state = expect_context::<crate::app::AppState>();
    crate::api::documents::process_decide(
        state.document_repo.as_ref(),
        &raw_id,
        decision,
        chrono::Utc::now(),
    )
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))
}

#[component]
pub fn DocumentDetailPage() -> impl IntoView {
    let params = use_params_map();
    let raw_id = Memo::new(move |_| params.read().get("id").unwrap_or_default());
    let decide = ServerAction::<DecideDocument>::new();
    let detail = Resource::new(
        move || (raw_id.get(), decide.version().get()),
        |(id, _)| get_document_detail(id),
    );

    view! {
        <div class="flex flex-col gap-6">
            <a href="/documents" class="link">"← Back to documents"</a>

            {move || decide.value().get().map(|result| match result {
                Ok(record) => view! {
                    <div class="alert alert-success">
                        <span>{format!(
                            "Document {} {}",
                            record.id,
                            record.document_status.unwrap_or_default().to_lowercase(),
                        )}</span>
                    </div>
                }.into_any(),
                Err(e) => view! {
                    <div class="alert alert-error">
                        <span>{format!("Decision failed: {e}")}</span>
                    </div>
                }.into_any(),
            })}

            <Suspense fallback=move || view! {
                <div class="flex justify-center py-12">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }>
                {move || detail.get().map(|result| match result {
                    Ok(DetailState::InvalidId(raw)) => view! {
                        <div class="alert alert-warning">
                            <span>{format!("'{raw}' is not a valid document ID.")}</span>
                        </div>
                    }.into_any(),
                    Ok(DetailState::NotFound(id)) => view! {
                        <div class="alert alert-info">
                            <span>{format!("Document {id} was not found.")}</span>
                        </div>
                    }.into_any(),
                    Ok(DetailState::Found(record)) => view! {
                        <RecordView record=record decide=decide/>
                    }.into_any(),
                    Err(e) => view! {
                        <div class="alert alert-error">
                            <span>{format!("Error loading document: {e}")}</span>
                        </div>
                    }.into_any(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn RecordView(record: DocumentRecord, decide: ServerAction<DecideDocument>) -> impl IntoView {
    let pending = record.is_pending();
    let raw_id = record.id.0.to_string();
    let status = record
        .document_status
        .clone()
        .unwrap_or_else(|| DocumentStatus::Pending.to_string());

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h1 class="card-title font-mono">{format!("Document {}", record.id)}</h1>
                <dl class="grid grid-cols-2 gap-2">
                    <dt class="font-semibold">"Requestor"</dt><dd>{record.requestor_name.clone()}</dd>
                    <dt class="font-semibold">"BU/FU"</dt><dd>{record.bu_fu.clone()}</dd>
                    <dt class="font-semibold">"Extension"</dt><dd>{record.extension.clone()}</dd>
                    <dt class="font-semibold">"Submitted"</dt><dd>{format_date(record.submit_date.as_ref())}</dd>
                    <dt class="font-semibold">"Decided"</dt><dd>{format_date(record.approval_date.as_ref())}</dd>
                    <dt class="font-semibold">"Status"</dt><dd>{status}</dd>
                </dl>

                <h2 class="text-xl font-bold mt-4">"Documents"</h2>
                {record
                    .documents
                    .into_iter()
                    .enumerate()
                    .map(|(i, entry)| view! { <EntryCard index=i entry=entry/> })
                    .collect_view()}

                {pending.then(|| view! { <DecisionControls raw_id=raw_id decide=decide/> })}
            </div>
        </div>
    }
}

#[component]
fn EntryCard(index: usize, entry: DocumentEntry) -> impl IntoView {
    view! {
        <div class="border rounded p-4">
            <h3 class="font-semibold">{format!("{}. {}", index + 1, entry.document_title)}</h3>
            <p class="font-mono text-sm">{entry.document_number.clone()}</p>
            <p class="text-sm">
                {label_for(DOCUMENT_TYPE_OPTIONS, &entry.document_type).to_string()}
                " · "
                {label_for(URGENCY_OPTIONS, &entry.urgency).to_string()}
            </p>
            {entry.document_description.map(|d| view! { <p class="mt-2">{d}</p> })}
            {entry.document_url.map(|url| view! {
                <a href=url class="link link-primary" target="_blank">"Open attachment"</a>
            })}
        </div>
    }
}

/// Approve / reject buttons with a confirmation step.
#[component]
fn DecisionControls(raw_id: String, decide: ServerAction<DecideDocument>) -> impl IntoView {
    let confirming = RwSignal::new(None::<Decision>);
    let raw_id = StoredValue::new(raw_id);

    let confirm = move |_| {
        if let Some(decision) = confirming.get() {
            decide.dispatch(DecideDocument {
                raw_id: raw_id.get_value(),
                decision,
            });
            confirming.set(None);
        }
    };

    view! {
        <div class="card-actions justify-end mt-4">
            {move || match confirming.get() {
                None => view! {
                    <button class="btn btn-success" on:click=move |_| confirming.set(Some(Decision::Approve))>
                        "Approve"
                    </button>
                    <button class="btn btn-error" on:click=move |_| confirming.set(Some(Decision::Reject))>
                        "Reject"
                    </button>
                }.into_any(),
                Some(decision) => {
                    let verb = match decision {
                        Decision::Approve => "approve",
                        Decision::Reject => "reject",
                    };
                    view! {
                        <span>{format!("Are you sure you want to {verb} this document?")}</span>
                        <button class="btn btn-primary" disabled=move || decide.pending().get() on:click=confirm>
                            "Confirm"
                        </button>
                        <button class="btn btn-ghost" on:click=move |_| confirming.set(None)>
                            "Cancel"
                        </button>
                    }.into_any()
                }
            }}
        </div>
    }
}
