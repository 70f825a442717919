//! CMS Server
//!
//! Serves the CMS REST APIs:
//! - `/api/pages` page properties
//! - `/api/tags` tags
//! - `/blog/options` blog default template
//! - `/health`, `/ready` probes
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CMS_CONFIG` | `config.toml` | Optional TOML config file |
//! | `CMS_HTTP_PORT` | `8080` | HTTP port |
//! | `CMS_STORAGE_BACKEND` | `mongodb` | `mongodb` or `memory` |
//! | `CMS_MONGODB_URI` | `mongodb://localhost:27017/...` | MongoDB connection URI |
//! | `CMS_MONGODB_DATABASE` | `cms` | MongoDB database name |
//! | `CMS_DEV_MODE` | `false` | Seed sample templates into the memory store |
//! | `RUST_LOG` | `info` | Log level |
//! | `LOG_FORMAT` | `text` | `text` or `json` |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use axum::Router;
use mongodb::Client as MongoClient;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use cms_config::{AppConfig, StorageBackend};
use cms_platform::shared::health_api::{health_router, HealthState};
use cms_platform::shared::indexes::initialize_indexes;
use cms_platform::{
    ChannelEventPublisher, CmsPlatform, EventPublisher, InMemoryStore, Layout, MediaUrlResolver, MongoUnitOfWork,
    Page, PageStatus, StoreBackend, TsidGenerator, UnitOfWork,
};

#[tokio::main]
async fn main() -> Result<()> {
    cms_common::logging::init_logging("cms-server");

    let config = AppConfig::load()?;
    info!(backend = ?config.storage.backend, port = config.http.port, "Configuration loaded");

    let events = Arc::new(ChannelEventPublisher::new(
        config.events.channel_capacity,
        config.events.log_events,
    ));
    spawn_event_listener(&events);
    let publisher: Arc<dyn EventPublisher> = events;
    let media = MediaUrlResolver::new(config.media.public_base_url.clone());

    let app = match config.storage.backend {
        StorageBackend::Mongodb => {
            let client = MongoClient::with_uri_str(&config.mongodb.uri).await?;
            let db = client.database(&config.mongodb.database);
            info!(database = %config.mongodb.database, "Connected to MongoDB");

            if config.storage.create_indexes {
                initialize_indexes(&db).await?;
                info!("MongoDB indexes initialized");
            }

            let unit_of_work = Arc::new(MongoUnitOfWork::new(client, db.clone()));
            let platform = CmsPlatform::new(StoreBackend::Mongo(db), unit_of_work, publisher, media);
            build_app(&platform, &config)
        }
        StorageBackend::Memory => {
            let store = InMemoryStore::new();
            if config.dev_mode {
                seed_dev_data(&store)?;
            }
            warn!("Using the in-memory store; data is lost on shutdown");
            let platform = CmsPlatform::in_memory(store, publisher, media);
            build_app(&platform, &config)
        }
    };

    let addr = SocketAddr::new(config.http.host.parse()?, config.http.port);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "CMS server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("CMS server shutdown complete");
    Ok(())
}

fn build_app<U: UnitOfWork + 'static>(platform: &CmsPlatform<U>, config: &AppConfig) -> Router {
    let health = HealthState {
        backend: platform.backend().clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    platform
        .router()
        .merge(health_router(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

/// Log every committed domain event until the channel closes.
fn spawn_event_listener(events: &ChannelEventPublisher) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(envelope) => info!(
                    event_type = %envelope.event_type,
                    subject = %envelope.subject,
                    correlation_id = %envelope.correlation_id,
                    "Domain event"
                ),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event listener lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Sample layout and master page so the blog template list is not empty.
fn seed_dev_data(store: &InMemoryStore) -> Result<()> {
    let mut layout = Layout::new("Default", "~/Views/Shared/Default.cshtml");
    layout.preview_url = Some("/previews/default.png".to_string());
    store.seed(&layout)?;

    let mut master = Page::new(TsidGenerator::generate());
    master.title = "Default master".to_string();
    master.page_url = "/master/default/".to_string();
    master.page_url_hash = cms_platform::url::UrlService::new().url_hash(&master.page_url);
    master.is_master_page = true;
    master.status = PageStatus::Published;
    master.layout_id = Some(layout.id.clone());
    store.seed(&master)?;

    info!(layout_id = %layout.id, master_page_id = %master.id, "Seeded development data");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
