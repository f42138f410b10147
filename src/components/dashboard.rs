use leptos::prelude::*;

use crate::api::documents::DashboardSummary;

/// Server function returning the dashboard counts.
#[server(GetDashboard, "/api")]
pub async fn get_dashboard() -> Result<DashboardSummary, ServerFnError> {
    let state = expect_context::<crate::app::AppState>();
    crate::api::documents::process_dashboard(state.document_repo.as_ref())
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let summary = Resource::new(|| (), |_| get_dashboard());

    view! {
        <div>
            <h1 class="text-3xl font-bold mb-6">"Dashboard"</h1>
            <Suspense fallback=move || view! {
                <div class="flex justify-center py-12">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }>
                {move || summary.get().map(|result| match result {
                    Ok(s) => view! {
                        <div class="stats shadow">
                            <StatCard title="Total Submitted" value=s.total_submitted href="/documents"/>
                            <StatCard title="Pending Approval" value=s.pending_approval href="/documents/pending"/>
                            <StatCard title="Total Approved" value=s.total_approved href="/documents/approved"/>
                            <StatCard title="Rejected" value=s.total_rejected href="/documents"/>
                        </div>
                    }.into_any(),
                    Err(e) => view! {
                        <div class="alert alert-error">
                            <span>{format!("Error loading dashboard: {e}")}</span>
                        </div>
                    }.into_any(),
                })}
            </Suspense>
            <div class="mt-8">
                <a href="/documents/recent" class="link">"View recent documents"</a>
            </div>
        </div>
    }
}

#[component]
fn StatCard(title: &'static str, value: usize, href: &'static str) -> impl IntoView {
    view! {
        <a href=href class="stat">
            <div class="stat-title">{title}</div>
            <div class="stat-value">{value}</div>
        </a>
    }
}
