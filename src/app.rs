use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::*;
use leptos_router::path;

use crate::components::dashboard::DashboardPage;
use crate::components::document_detail::DocumentDetailPage;
use crate::components::document_table::DocumentTablePage;
use crate::components::submission_form::SubmissionPage;
use crate::listing::ListScope;

/// Shared server state, available to axum handlers through `State` and to
/// server functions through the Leptos context.
#[cfg(feature = "ssr")]
#[derive(Clone)]
pub struct AppState {
    pub document_repo: std::sync::Arc<dyn crate::db::repository::DocumentRepository>,
    pub storage_client: std::sync::Arc<dyn crate::storage::client::StorageClient>,
    pub leptos_options: LeptosOptions,
}

#[cfg(feature = "ssr")]
impl axum::extract::FromRef<AppState> for LeptosOptions {
    fn from_ref(state: &AppState) -> Self {
        state.leptos_options.clone()
    }
}

/// JSON API routes, without the SSR pages.
#[cfg(feature = "ssr")]
pub fn api_routes() -> axum::Router<AppState> {
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post};

    use crate::api::documents::{
        create_document_handler, dashboard_handler, decide_document_handler,
        filter_options_handler, get_document_handler, list_documents_handler,
    };
    use crate::api::upload::{
        serve_attachment_handler, upload_attachment_handler, ATTACHMENT_UPLOAD_PATH,
        MAX_ATTACHMENT_BYTES,
    };

    axum::Router::new()
        .route(
            "/api/v1/documents",
            get(list_documents_handler).post(create_document_handler),
        )
        .route("/api/v1/documents/{id}", get(get_document_handler))
        .route(
            "/api/v1/documents/{id}/decision",
            post(decide_document_handler),
        )
        .route("/api/v1/dashboard", get(dashboard_handler))
        .route("/api/v1/filter-options", get(filter_options_handler))
        .route(
            ATTACHMENT_UPLOAD_PATH,
            post(upload_attachment_handler)
                // multipart framing on top of the file itself
                .layer(DefaultBodyLimit::max(MAX_ATTACHMENT_BYTES + 64 * 1024)),
        )
        .route("/api/v1/attachments/{key}", get(serve_attachment_handler))
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/docflow.css"/>
        <Title text="Docflow - Document Approval"/>

        <Router>
            <nav class="navbar bg-base-200 gap-4 px-6">
                <a href="/" class="text-xl font-bold">"Docflow"</a>
                <a href="/documents" class="link link-hover">"All"</a>
                <a href="/documents/recent" class="link link-hover">"Recent"</a>
                <a href="/documents/pending" class="link link-hover">"Pending"</a>
                <a href="/documents/approved" class="link link-hover">"Approved"</a>
                <a href="/documents/new" class="btn btn-primary btn-sm ml-auto">"New submission"</a>
            </nav>
            <main class="container mx-auto p-6">
                <Routes fallback=|| view! { "Page not found." }.into_view()>
                    <Route path=path!("/") view=DashboardPage/>
                    <Route
                        path=path!("/documents")
                        view=|| view! { <DocumentTablePage scope=ListScope::All/> }
                    />
                    <Route
                        path=path!("/documents/recent")
                        view=|| view! { <DocumentTablePage scope=ListScope::Recent/> }
                    />
                    <Route
                        path=path!("/documents/pending")
                        view=|| view! { <DocumentTablePage scope=ListScope::Pending/> }
                    />
                    <Route
                        path=path!("/documents/approved")
                        view=|| view! { <DocumentTablePage scope=ListScope::Approved/> }
                    />
                    <Route path=path!("/documents/new") view=SubmissionPage/>
                    <Route path=path!("/documents/:id") view=DocumentDetailPage/>
                </Routes>
            </main>
        </Router>
    }
}
