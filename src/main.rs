#![recursion_limit = "256"]

#[cfg(feature = "ssr")]
#[derive(clap::Parser, Debug)]
#[command(name = "docflow", about = "Document submission and approval server")]
struct Args {
    /// Path to a TOML config file (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Seed sample submissions, overriding the config value
    #[arg(long)]
    seed_demo: bool,
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use axum::Router;
    use clap::Parser;
    use docflow::app::{api_routes, shell, App, AppState};
    use docflow::config::ServerConfig;
    use docflow::db::repository::{DocumentRepository, InMemoryDocumentRepository};
    use docflow::storage::client::{FsStorageClient, StorageClient};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower::ServiceBuilder;
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    let args = Args::parse();
    let config = ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docflow=info,tower_http=info".into());
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting Docflow server...");

    // Load Leptos options from Cargo.toml metadata
    let conf = get_configuration(None).context("Failed to read Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = match &config.listen_addr {
        Some(raw) => raw
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid listen_addr '{raw}'"))?,
        None => leptos_options.site_addr,
    };
    let site_root = leptos_options.site_root.to_string();

    let document_repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryDocumentRepository::new());

    let attachments_dir = config.attachments_dir();
    let storage_client: Arc<dyn StorageClient> = Arc::new(
        FsStorageClient::new(&attachments_dir)
            .await
            .context("Failed to initialize attachment storage")?,
    );
    tracing::info!("Attachment storage at {}", attachments_dir.display());

    if config.demo_mode || args.seed_demo {
        let seeded = docflow::demo_seeder::seed_demo_data(document_repo.as_ref(), chrono::Utc::now())
            .await
            .context("Failed to seed demo data")?;
        tracing::info!(seeded, "Demo mode enabled");
    }

    // Build application state
    let app_state = AppState {
        document_repo,
        storage_client,
        leptos_options: leptos_options.clone(),
    };

    // Generate the Leptos route list for SSR
    let routes = generate_route_list(App);

    let app = Router::new()
        .merge(api_routes())
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let state = app_state.clone();
                move || provide_context(state.clone())
            },
            {
                let options = leptos_options.clone();
                move || shell(options.clone())
            },
        )
        .fallback_service(ServeDir::new(&site_root))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// When compiled for WASM (client-side), there's no main function.
// The hydrate() function in lib.rs handles client-side initialization.
#[cfg(not(feature = "ssr"))]
fn main() {}
