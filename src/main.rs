//! Kafka fleet metadata syncer
//!
//! Main entry point. Loads settings, wires the metadata sources, store and
//! tasks together, registers the tasks with the dispatcher, and runs until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kafka_metadata_syncer::{
    config::Settings,
    dispatcher::{Dispatcher, ExecutionMode, TaskSpec},
    metrics,
    sources::{HttpMetadataClient, TopicCatalogCache},
    store::MemoryMetadataStore,
    tasks::{GroupSyncTask, TopicSyncTask},
};

/// Default settings file location
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Kafka metadata syncer");

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KAFKA_METADATA_SYNCER_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::load(&config_path)?;
    info!(
        config = %config_path,
        clusters = settings.clusters.len(),
        "Loaded settings"
    );

    // Shared collaborators
    let client = Arc::new(HttpMetadataClient::new(settings.request_timeout())?);
    let catalog = Arc::new(TopicCatalogCache::new());
    let store = Arc::new(MemoryMetadataStore::new());

    let shutdown = CancellationToken::new();
    let mut dispatcher = Dispatcher::new(settings.clusters.clone(), shutdown.clone());

    dispatcher.register(
        TaskSpec {
            name: "topic-sync".to_string(),
            cron: settings.topic_sync.cron.clone(),
            execution_mode: ExecutionMode::Broadcast,
            timeout: settings.topic_sync.timeout(),
        },
        Arc::new(TopicSyncTask::new(client.clone(), catalog.clone())),
    )?;

    dispatcher.register(
        TaskSpec {
            name: "group-sync".to_string(),
            cron: settings.group_sync.cron.clone(),
            execution_mode: ExecutionMode::Broadcast,
            timeout: settings.group_sync.timeout(),
        },
        Arc::new(
            GroupSyncTask::new(client.clone(), catalog.clone(), store.clone())
                .with_gc_safety_margin(settings.group_sync.gc_safety_margin())
                .with_fetch_concurrency(settings.group_sync.fetch_concurrency),
        ),
    )?;

    // Start metrics server
    let metrics_handle = tokio::spawn(metrics::serve(settings.metrics_port));
    info!("Metrics server starting on port {}", settings.metrics_port);

    let dispatcher_handle = tokio::spawn(dispatcher.run());

    tokio::select! {
        _ = metrics_handle => {
            error!("Metrics server exited unexpectedly");
        }
        _ = shutdown_signal() => {
            info!("Received shutdown signal, stopping syncer");
        }
    }

    // Let in-flight runs finish; GC is always the last step of a run, so an
    // interrupted run never commits a pruning decision.
    shutdown.cancel();
    if tokio::time::timeout(Duration::from_secs(30), dispatcher_handle)
        .await
        .is_err()
    {
        error!("Dispatcher did not stop within 30s");
    }

    info!("Kafka metadata syncer stopped");
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
