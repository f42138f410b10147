use chrono::Utc;
use leptos::prelude::*;
use leptos::server_fn::codec::Json;
use leptos_router::hooks::use_navigate;

use crate::form::schema::{entry_path, entry_value, requestor_value};
use crate::form::{EntryField, RequestorField, SubmissionForm};
use crate::models::document::{DocumentRecord, SubmissionPayload};
use crate::models::options::{SelectOption, BU_FU_OPTIONS, DOCUMENT_TYPE_OPTIONS, URGENCY_OPTIONS};

/// Server function persisting a new submission.
#[server(name = CreateSubmission, prefix = "/api", input = Json)]
pub async fn create_submission(payload: SubmissionPayload) -> Result<DocumentRecord, ServerFnError> {
    let state = expect_context::<crate::app::AppState>();
    crate::api::documents::process_create(state.document_repo.as_ref(), payload)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

#[component]
pub fn SubmissionPage() -> impl IntoView {
    let form = RwSignal::new(SubmissionForm::new(Utc::now().date_naive()));
    let create = ServerAction::<CreateSubmission>::new();
    let entry_count = Memo::new(move |_| form.with(|f| f.entries().len()));

    let navigate = use_navigate();
    Effect::new(move |_| {
        if let Some(Ok(_)) = create.value().get() {
            form.update(|f| f.reset());
            navigate("/documents/recent", Default::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(Ok(payload)) = form.try_update(|f| f.prepare_submission()) {
            create.dispatch(CreateSubmission { payload });
        }
    };

    view! {
        <form class="flex flex-col gap-6" on:submit=on_submit>
            <h1 class="text-3xl font-bold">"New submission"</h1>

            {move || create.value().get().and_then(|r| r.err()).map(|e| view! {
                <div class="alert alert-error">
                    <span>{format!("Submission failed: {e}")}</span>
                </div>
            })}

            <section class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <TextInput label="Requestor Name" form=form field=RequestorField::RequestorName/>
                <label class="form-control">
                    <span class="label-text">"BU/FU"</span>
                    <OptionSelect
                        options=BU_FU_OPTIONS
                        placeholder="Select BU/FU"
                        value=requestor_signal(form, RequestorField::BuFu)
                        on_change=move |v: String| form.update(|f| f.set_field(RequestorField::BuFu, v))
                    />
                    <FieldError form=form path="buFu"/>
                </label>
                <TextInput label="Extension" form=form field=RequestorField::Extension/>
                <TextInput label="Submit Date" input_type="date" form=form field=RequestorField::SubmitDate/>
            </section>

            <section class="flex flex-col gap-4">
                <h2 class="text-xl font-bold">"Documents"</h2>
                {move || (0..entry_count.get())
                    .map(|index| view! { <EntryEditor index=index form=form entry_count=entry_count/> })
                    .collect_view()}
                <FieldError form=form path="documents"/>
                <button type="button" class="btn btn-outline self-start" on:click=move |_| form.update(|f| f.add_entry())>
                    "Add document"
                </button>
            </section>

            <div class="flex gap-2">
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled={move || !form.with(|f| f.can_submit()) || create.pending().get()}
                >
                    "Submit"
                </button>
                <button type="button" class="btn btn-ghost" on:click=move |_| form.update(|f| f.reset())>
                    "Reset"
                </button>
            </div>
        </form>
    }
}

#[component]
fn EntryEditor(index: usize, form: RwSignal<SubmissionForm>, entry_count: Memo<usize>) -> impl IntoView {
    let set = move |field: EntryField| {
        move |v: String| {
            form.update(|f| {
                f.set_entry_field(index, field, v);
            })
        }
    };

    view! {
        <div class="card bg-base-200">
            <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-4">
                <div class="md:col-span-2 flex items-center gap-2">
                    <h3 class="font-semibold grow">{format!("Document {}", index + 1)}</h3>
                    <button type="button" class="btn btn-xs" disabled={index == 0}
                        on:click=move |_| form.update(|f| { f.move_up(index); })>"↑"</button>
                    <button type="button" class="btn btn-xs" disabled={move || index + 1 >= entry_count.get()}
                        on:click=move |_| form.update(|f| { f.move_down(index); })>"↓"</button>
                    <button type="button" class="btn btn-xs"
                        on:click=move |_| form.update(|f| { f.duplicate_entry(index); })>"Duplicate"</button>
                    <button type="button" class="btn btn-xs btn-error" disabled={move || entry_count.get() <= 1}
                        on:click=move |_| form.update(|f| { f.remove_entry(index); })>"Remove"</button>
                </div>

                <label class="form-control">
                    <span class="label-text">"Urgency"</span>
                    <OptionSelect
                        options=URGENCY_OPTIONS
                        placeholder="Select urgency"
                        value=entry_signal(form, index, EntryField::Urgency)
                        on_change=set(EntryField::Urgency)
                    />
                    <FieldError form=form path=entry_path(index, EntryField::Urgency.spec())/>
                </label>
                <label class="form-control">
                    <span class="label-text">"Document Type"</span>
                    <OptionSelect
                        options=DOCUMENT_TYPE_OPTIONS
                        placeholder="Select type"
                        value=entry_signal(form, index, EntryField::DocumentType)
                        on_change=set(EntryField::DocumentType)
                    />
                    <FieldError form=form path=entry_path(index, EntryField::DocumentType.spec())/>
                </label>
                <EntryTextInput label="Document Title" form=form index=index field=EntryField::DocumentTitle/>
                <EntryTextInput label="Document Number" form=form index=index field=EntryField::DocumentNumber/>
                <EntryTextInput label="Description" form=form index=index field=EntryField::DocumentDescription/>
                <AttachmentInput form=form index=index/>
            </div>
        </div>
    }
}

#[component]
fn TextInput(
    label: &'static str,
    form: RwSignal<SubmissionForm>,
    field: RequestorField,
    #[prop(default = "text")] input_type: &'static str,
) -> impl IntoView {
    view! {
        <label class="form-control">
            <span class="label-text">{label}</span>
            <input
                type=input_type
                class="input input-bordered"
                prop:value=requestor_signal(form, field)
                on:input=move |ev| form.update(|f| f.set_field(field, event_target_value(&ev)))
            />
            <FieldError form=form path=field.spec().name/>
        </label>
    }
}

#[component]
fn EntryTextInput(
    label: &'static str,
    form: RwSignal<SubmissionForm>,
    index: usize,
    field: EntryField,
) -> impl IntoView {
    view! {
        <label class="form-control">
            <span class="label-text">{label}</span>
            <input
                type="text"
                class="input input-bordered"
                prop:value=entry_signal(form, index, field)
                on:input=move |ev| form.update(|f| {
                    f.set_entry_field(index, field, event_target_value(&ev));
                })
            />
            <FieldError form=form path=entry_path(index, field.spec())/>
        </label>
    }
}

/// File picker that uploads immediately and stores the returned reference
/// as the entry's `documentUrl`.
#[component]
fn AttachmentInput(form: RwSignal<SubmissionForm>, index: usize) -> impl IntoView {
    let uploading = RwSignal::new(false);
    let upload_error = RwSignal::new(None::<String>);
    let current = entry_signal(form, index, EntryField::DocumentUrl);

    let on_pick = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            uploading.set(true);
            upload_error.set(None);
            leptos::task::spawn_local(async move {
                match crate::api::upload::upload_from_browser(file).await {
                    Ok(url) => form.update(|f| {
                        f.set_entry_field(index, EntryField::DocumentUrl, url);
                    }),
                    Err(message) => upload_error.set(Some(message)),
                }
                uploading.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    view! {
        <label class="form-control">
            <span class="label-text">"Attachment"</span>
            <input
                type="file"
                class="file-input file-input-bordered"
                disabled=move || uploading.get()
                on:change=on_pick
            />
            {move || uploading.get().then(|| view! { <span class="text-sm">"Uploading..."</span> })}
            {move || upload_error.get().map(|message| view! { <span class="text-error text-sm">{message}</span> })}
            {move || {
                let url = current.get();
                (!url.is_empty()).then(|| view! {
                    <a href=url.clone() class="link link-primary text-sm" target="_blank">"Uploaded file"</a>
                })
            }}
        </label>
    }
}

#[component]
fn OptionSelect(
    options: &'static [SelectOption],
    placeholder: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="select select-bordered"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="" disabled=true>{placeholder}</option>
            {options
                .iter()
                .map(|o| view! { <option value=o.value>{o.label}</option> })
                .collect_view()}
        </select>
    }
}

#[component]
fn FieldError(form: RwSignal<SubmissionForm>, #[prop(into)] path: String) -> impl IntoView {
    move || {
        form.with(|f| f.error_for(&path).map(str::to_string))
            .map(|message| view! { <span class="text-error text-sm">{message}</span> })
    }
}

fn requestor_signal(form: RwSignal<SubmissionForm>, field: RequestorField) -> Signal<String> {
    Signal::derive(move || form.with(|f| requestor_value(f.draft(), field.spec()).to_string()))
}

fn entry_signal(form: RwSignal<SubmissionForm>, index: usize, field: EntryField) -> Signal<String> {
    Signal::derive(move || {
        form.with(|f| {
            f.entries()
                .get(index)
                .map(|e| entry_value(e, field.spec()).to_string())
                .unwrap_or_default()
        })
    })
}
