use chrono::Utc;
use leptos::prelude::*;

use crate::form::parse_input_date;
use crate::listing::{FilterOptions, ListScope, ListView, PageItem, SortDirection, SortField};
use crate::models::document::{format_date, DocumentRecord, DocumentStatus};
use crate::models::options::{label_for, DOCUMENT_TYPE_OPTIONS, URGENCY_OPTIONS};

/// Server function returning the whole collection in natural order.
///
/// Filtering, sorting and paging run in the page itself.
#[server(ListDocuments, "/api")]
pub async fn list_documents() -> Result<Vec<DocumentRecord>, ServerFnError> {
    use crate::db::repository::DocumentRepository;

    let state = expect_context::<crate::app::AppState>();
    state
        .document_repo
        .list()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

const COLUMNS: [(SortField, &str); 10] = [
    (SortField::Id, "ID"),
    (SortField::DocumentTitle, "Title"),
    (SortField::DocumentNumber, "Number"),
    (SortField::DocumentType, "Type"),
    (SortField::Urgency, "Urgency"),
    (SortField::RequestorName, "Requestor"),
    (SortField::BuFu, "BU/FU"),
    (SortField::SubmitDate, "Submitted"),
    (SortField::ApprovalDate, "Decided"),
    (SortField::DocumentStatus, "Status"),
];

#[component]
pub fn DocumentTablePage(scope: ListScope) -> impl IntoView {
    let records = Resource::new(|| (), |_| list_documents());
    let view_state = RwSignal::new(ListView::new(scope));

    view! {
        <div>
            <h1 class="text-3xl font-bold mb-6">{scope.title()}</h1>
            <Suspense fallback=move || view! {
                <div class="flex justify-center py-12">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }>
                {move || records.get().map(|result| match result {
                    Ok(records) => view! { <DocumentTable records=records view_state=view_state/> }.into_any(),
                    Err(e) => view! {
                        <div class="alert alert-error">
                            <span>{format!("Error loading documents: {e}")}</span>
                        </div>
                    }.into_any(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn DocumentTable(records: Vec<DocumentRecord>, view_state: RwSignal<ListView>) -> impl IntoView {
    let options = FilterOptions::from_records(&records);
    let records = StoredValue::new(records);
    let page = Memo::new(move |_| {
        view_state.with(|v| records.with_value(|all| v.run(all, Utc::now())))
    });

    view! {
        <div class="flex flex-col gap-4">
            <input
                type="text"
                class="input input-bordered w-full max-w-md"
                placeholder="Search by title or number"
                prop:value=move || view_state.with(|v| v.query.clone())
                on:input=move |ev| view_state.update(|v| v.set_query(event_target_value(&ev)))
            />

            <FilterPanel options=options view_state=view_state/>

            <p class="text-sm text-base-content/60">
                {move || page.with(|p| format!("{} document(s)", p.total_count))}
            </p>

            <div class="overflow-x-auto">
                <table class="table table-zebra">
                    <thead>
                        <tr>
                            {COLUMNS
                                .into_iter()
                                .map(|(field, label)| view! { <SortHeader field=field label=label view_state=view_state/> })
                                .collect_view()}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = page.with(|p| p.rows.clone());
                            if rows.is_empty() {
                                view! {
                                    <tr>
                                        <td colspan="10" class="text-center py-8">"No documents found."</td>
                                    </tr>
                                }.into_any()
                            } else {
                                rows.into_iter()
                                    .map(|record| view! { <DocumentRow record=record/> })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </tbody>
                </table>
            </div>

            <Pagination view_state=view_state page=page/>
        </div>
    }
}

#[component]
fn SortHeader(field: SortField, label: &'static str, view_state: RwSignal<ListView>) -> impl IntoView {
    let indicator = move || match view_state.with(|v| v.sort.direction_for(field)) {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    };

    view! {
        <th class="cursor-pointer select-none" on:click=move |_| view_state.update(|v| v.toggle_sort(field))>
            {label}
            {indicator}
        </th>
    }
}

#[component]
fn DocumentRow(record: DocumentRecord) -> impl IntoView {
    let href = format!("/documents/{}", record.id.0);
    let entry = record.primary_entry().cloned().unwrap_or_default();
    let extra = record.documents.len().saturating_sub(1);
    let badge = match record.status() {
        Some(DocumentStatus::Approved) => "badge badge-success",
        Some(DocumentStatus::Rejected) => "badge badge-error",
        _ => "badge badge-warning",
    };

    view! {
        <tr>
            <td><a href=href class="link font-mono">{record.id.to_string()}</a></td>
            <td>
                {entry.document_title.clone()}
                {(extra > 0).then(|| view! { <span class="badge badge-ghost ml-2">{format!("+{extra}")}</span> })}
            </td>
            <td class="font-mono">{entry.document_number.clone()}</td>
            <td>{label_for(DOCUMENT_TYPE_OPTIONS, &entry.document_type).to_string()}</td>
            <td>{label_for(URGENCY_OPTIONS, &entry.urgency).to_string()}</td>
            <td>{record.requestor_name.clone()}</td>
            <td>{record.bu_fu.clone()}</td>
            <td>{format_date(record.submit_date.as_ref())}</td>
            <td>{format_date(record.approval_date.as_ref())}</td>
            <td><span class=badge>{record.document_status.clone().unwrap_or_else(|| "Pending".to_string())}</span></td>
        </tr>
    }
}

/// Draft filters plus picker searches. Nothing reaches the table until
/// "Apply" is pressed.
#[component]
fn FilterPanel(options: FilterOptions, view_state: RwSignal<ListView>) -> impl IntoView {
    let searched = Memo::new(move |_| view_state.with(|v| options.searched(&v.picker_search)));

    let requestors = Signal::derive(move || {
        searched.with(|o| {
            o.requestor_names
                .iter()
                .map(|n| (n.clone(), n.clone()))
                .collect::<Vec<_>>()
        })
    });
    let types = Signal::derive(move || {
        searched.with(|o| {
            o.document_types
                .iter()
                .map(|t| (t.clone(), label_for(DOCUMENT_TYPE_OPTIONS, t).to_string()))
                .collect::<Vec<_>>()
        })
    });
    let urgencies = Signal::derive(move || {
        searched.with(|o| {
            o.urgencies
                .iter()
                .map(|u| (u.clone(), label_for(URGENCY_OPTIONS, u).to_string()))
                .collect::<Vec<_>>()
        })
    });

    view! {
        <details class="collapse collapse-arrow bg-base-200">
            <summary class="collapse-title font-medium">"Filters"</summary>
            <div class="collapse-content grid grid-cols-1 md:grid-cols-3 gap-4">
                <Picker
                    label="Requestor"
                    choices=requestors
                    selected=Signal::derive(move || view_state.with(|v| v.draft.requestor_name.clone().unwrap_or_default()))
                    search=Signal::derive(move || view_state.with(|v| v.picker_search.requestor_name.clone()))
                    on_search=move |s: String| view_state.update(|v| v.picker_search.requestor_name = s)
                    on_select=move |s: String| view_state.update(|v| v.draft.requestor_name = non_empty(s))
                />
                <Picker
                    label="Document Type"
                    choices=types
                    selected=Signal::derive(move || view_state.with(|v| v.draft.document_type.clone().unwrap_or_default()))
                    search=Signal::derive(move || view_state.with(|v| v.picker_search.document_type.clone()))
                    on_search=move |s: String| view_state.update(|v| v.picker_search.document_type = s)
                    on_select=move |s: String| view_state.update(|v| v.draft.document_type = non_empty(s))
                />
                <Picker
                    label="Urgency"
                    choices=urgencies
                    selected=Signal::derive(move || view_state.with(|v| v.draft.urgency.clone().unwrap_or_default()))
                    search=Signal::derive(move || view_state.with(|v| v.picker_search.urgency.clone()))
                    on_search=move |s: String| view_state.update(|v| v.picker_search.urgency = s)
                    on_select=move |s: String| view_state.update(|v| v.draft.urgency = non_empty(s))
                />

                <label class="form-control">
                    <span class="label-text">"Status"</span>
                    <select
                        class="select select-bordered"
                        prop:value=move || view_state.with(|v| v.draft.document_status.clone().unwrap_or_default())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            view_state.update(|v| v.draft.document_status = non_empty(value));
                        }
                    >
                        <option value="">"Any status"</option>
                        {[DocumentStatus::Pending, DocumentStatus::Approved, DocumentStatus::Rejected]
                            .into_iter()
                            .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                            .collect_view()}
                    </select>
                </label>

                <label class="form-control">
                    <span class="label-text">"Submitted from"</span>
                    <input
                        type="date"
                        class="input input-bordered"
                        prop:value=move || view_state.with(|v| v.draft.start_date.map(|d| d.to_string()).unwrap_or_default())
                        on:change=move |ev| {
                            let raw = event_target_value(&ev);
                            view_state.update(|v| v.draft.start_date = parse_input_date(&raw));
                        }
                    />
                </label>
                <label class="form-control">
                    <span class="label-text">"Submitted until"</span>
                    <input
                        type="date"
                        class="input input-bordered"
                        prop:value=move || view_state.with(|v| v.draft.end_date.map(|d| d.to_string()).unwrap_or_default())
                        on:change=move |ev| {
                            let raw = event_target_value(&ev);
                            view_state.update(|v| v.draft.end_date = parse_input_date(&raw));
                        }
                    />
                </label>

                <div class="flex gap-2 md:col-span-3">
                    <button class="btn btn-primary" on:click=move |_| view_state.update(|v| v.apply_filters())>
                        "Apply"
                    </button>
                    <button class="btn btn-ghost" on:click=move |_| view_state.update(|v| v.reset_filters())>
                        "Reset"
                    </button>
                </div>
            </div>
        </details>
    }
}

/// A select whose option list can be narrowed by a search box.
#[component]
fn Picker(
    label: &'static str,
    #[prop(into)] choices: Signal<Vec<(String, String)>>,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] search: Signal<String>,
    #[prop(into)] on_search: Callback<String>,
    #[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="form-control gap-1">
            <span class="label-text">{label}</span>
            <input
                type="search"
                class="input input-bordered input-sm"
                placeholder="Search..."
                prop:value=move || search.get()
                on:input=move |ev| on_search.run(event_target_value(&ev))
            />
            <select
                class="select select-bordered"
                prop:value=move || selected.get()
                on:change=move |ev| on_select.run(event_target_value(&ev))
            >
                <option value="">"Any"</option>
                {move || choices
                    .get()
                    .into_iter()
                    .map(|(value, text)| view! { <option value=value>{text}</option> })
                    .collect_view()}
            </select>
        </div>
    }
}

#[component]
fn Pagination(view_state: RwSignal<ListView>, page: Memo<crate::listing::ListPage>) -> impl IntoView {
    move || {
        let selector = page.with(|p| p.selector.clone());
        if !selector.is_visible() {
            return ().into_any();
        }
        let current = selector.current;

        view! {
            <div class="join self-center">
                <button
                    class="join-item btn"
                    disabled={!selector.has_previous}
                    on:click=move |_| view_state.update(|v| v.set_page(current.saturating_sub(1)))
                >
                    "«"
                </button>
                {selector
                    .items
                    .into_iter()
                    .map(|item| match item {
                        PageItem::Page(n) => view! {
                            <button
                                class={if n == current { "join-item btn btn-active" } else { "join-item btn" }}
                                on:click=move |_| view_state.update(|v| v.set_page(n))
                            >
                                {n}
                            </button>
                        }.into_any(),
                        PageItem::Ellipsis => view! {
                            <button class="join-item btn btn-disabled">"…"</button>
                        }.into_any(),
                    })
                    .collect_view()}
                <button
                    class="join-item btn"
                    disabled={!selector.has_next}
                    on:click=move |_| view_state.update(|v| v.set_page(current + 1))
                >
                    "»"
                </button>
            </div>
        }
        .into_any()
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
