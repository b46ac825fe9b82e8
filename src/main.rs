use dotenvy::dotenv;
use product_catalog_backend::config::AppConfig;
use product_catalog_backend::infrastructure::{database, storage};
use product_catalog_backend::services::object_store::ObjectStore;
use product_catalog_backend::services::record_store::{RecordStore, SeaOrmRecordStore};
use product_catalog_backend::services::thumbnail::ThumbnailPipeline;
use product_catalog_backend::services::worker::ThumbnailWorker;
use product_catalog_backend::{AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing with EnvFilter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_catalog_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Product Catalog Backend...");

    let config = AppConfig::from_env();
    info!(
        "🪣  Buckets: source={}, destination={}",
        config.source_bucket, config.destination_bucket
    );

    // Setup Infrastructure
    let db = database::setup_database().await?;
    let objects: Arc<dyn ObjectStore> = storage::setup_storage().await;
    let records: Arc<dyn RecordStore> = Arc::new(SeaOrmRecordStore::new(db.clone()));

    // Setup event and shutdown channels
    let (event_tx, event_rx) = tokio::sync::mpsc::channel(256);
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Start the thumbnail worker
    let pipeline = Arc::new(ThumbnailPipeline::new(
        objects.clone(),
        records.clone(),
        config.destination_bucket.clone(),
        config.object_store_domain.clone(),
    ));
    let worker = ThumbnailWorker::new(pipeline, event_rx, shutdown_rx);
    tokio::spawn(async move {
        worker.run().await;
    });

    let state = AppState {
        db,
        objects,
        records,
        events: event_tx,
        config: config.clone(),
    };

    let app = create_app(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            })
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                info!("📥 {} {}", request.method(), request.uri());
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    info!(
                        "📤 Finished in {:?} with status {}",
                        latency,
                        response.status()
                    );
                },
            ),
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
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
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
