use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vidsqueeze_api::auth::session::SessionVerifier;
use vidsqueeze_api::config::ServerConfig;
use vidsqueeze_api::router::build_app_router;
use vidsqueeze_api::state::AppState;
use vidsqueeze_cloud::cloudinary::{CloudinaryClient, CloudinaryConfig};
use vidsqueeze_cloud::gemini::{GeminiClient, GeminiConfig};
use vidsqueeze_cloud::genai::TextGenerator;
use vidsqueeze_cloud::media::MediaProvider;
use vidsqueeze_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "vidsqueeze_api=debug,vidsqueeze_cloud=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        timeout_secs = config.request_timeout_secs,
        static_dir = ?config.static_dir,
        "Configuration loaded"
    );

    let pool = open_database().await;
    let sessions =
        SessionVerifier::new(&config.session).expect("Session verification key is unusable");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::new(sessions),
        media: media_service(),
        text: text_service(),
    };
    let app = build_app_router(state, &config);

    let ip = config
        .host
        .parse()
        .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", config.host));
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server terminated with an error");

    tracing::info!("Server stopped");
}

/// `RUST_LOG` filtering; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, verify, and migrate. Any failure aborts startup.
async fn open_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL is required");

    let pool = vidsqueeze_db::create_pool(&url)
        .await
        .expect("Could not connect to Postgres");
    vidsqueeze_db::health_check(&pool)
        .await
        .expect("Postgres did not answer SELECT 1");
    vidsqueeze_db::run_migrations(&pool)
        .await
        .expect("Migrations failed");

    tracing::info!("Database ready");
    pool
}

fn media_service() -> Option<Arc<dyn MediaProvider>> {
    let Some(cfg) = CloudinaryConfig::from_env() else {
        tracing::warn!("Cloudinary credentials missing; uploads and deletes will fail");
        return None;
    };
    tracing::info!(cloud_name = %cfg.cloud_name, "Media service configured");
    Some(Arc::new(CloudinaryClient::new(cfg)))
}

fn text_service() -> Option<Arc<dyn TextGenerator>> {
    let Some(cfg) = GeminiConfig::from_env() else {
        tracing::warn!("GEMINI_API_KEY missing; suggestions will fail");
        return None;
    };
    tracing::info!(model = %cfg.model, "Text generation configured");
    Some(Arc::new(GeminiClient::new(cfg)))
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!(signal = "SIGINT", "Shutting down"),
        () = terminate => tracing::info!(signal = "SIGTERM", "Shutting down"),
    }
}
