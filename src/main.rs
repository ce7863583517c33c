//! RIZA HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use riza::accounts::UserStore;
use riza::activity::ActivityLog;
use riza::assistant::ChatAssistant;
use riza::catalogue::SqliteCatalogue;
use riza::config::Config;
use riza::gateway::{AppState, create_router};
use riza::llm::{AssistConfig, CompletionProvider, RemoteProvider};
use riza::matching::{AssistedRanker, RelevanceMatcher};
use riza::observations::ObservationStore;
use riza::session::SessionStore;
use riza::storage::{Database, Schema};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;
    let assist = AssistConfig::from_env();

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        data_dir = %config.data_dir.display(),
        ai_available = assist.is_available(),
        "RIZA starting"
    );

    let catalogue_db = Database::open(&config.catalogue_db_path(), Schema::Catalogue)?;
    let admin_db = Database::open(&config.admin_db_path(), Schema::Admin)?;

    let users = UserStore::new(admin_db.clone());
    if let Some(admin) = &config.bootstrap_admin
        && users.ensure_admin(&admin.email, &admin.password).await?
    {
        tracing::info!(email = %admin.email, "Bootstrap administrator created");
    }

    let provider: Option<Arc<dyn CompletionProvider>> = if assist.is_available() {
        let remote = RemoteProvider::new(&assist);
        tracing::info!(model = remote.model(), "AI assistance enabled");
        Some(Arc::new(remote))
    } else {
        tracing::warn!("AI assistance disabled or no OPENAI_API_KEY, using lexical matching only");
        None
    };

    let catalogue = Arc::new(SqliteCatalogue::new(catalogue_db.clone()));
    let matcher = RelevanceMatcher::new(
        catalogue,
        provider
            .clone()
            .map(|p| AssistedRanker::new(p, assist.max_tokens)),
    );
    let assistant = ChatAssistant::new(provider, assist.max_tokens, assist.temperature);

    let state = AppState::new(
        matcher,
        assistant,
        ObservationStore::new(catalogue_db),
        users,
        ActivityLog::new(admin_db),
        SessionStore::new(config.session_ttl),
    );

    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("RIZA shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("RIZA_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
