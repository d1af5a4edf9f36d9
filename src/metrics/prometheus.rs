//! Prometheus metrics definitions and HTTP server

use std::net::SocketAddr;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::{
    register_gauge_vec, register_histogram_vec, register_int_counter_vec, Encoder, GaugeVec,
    HistogramVec, IntCounterVec, TextEncoder,
};
use tokio::net::TcpListener;
use tracing::{error, info};

lazy_static::lazy_static! {
    /// Task runs by name and final status
    pub static ref TASK_RUNS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "kafka_metadata_syncer_task_runs_total",
        "Total number of task runs by status",
        &["task", "status"]
    ).unwrap();

    /// Task run duration histogram
    pub static ref TASK_RUN_DURATION: HistogramVec = register_histogram_vec!(
        "kafka_metadata_syncer_task_run_duration_seconds",
        "Duration of task runs in seconds",
        &["task"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    ).unwrap();

    /// Per-group describe failures
    pub static ref GROUP_FETCH_FAILURES: IntCounterVec = register_int_counter_vec!(
        "kafka_metadata_syncer_group_fetch_failures_total",
        "Total number of failed consumer group describe calls",
        &["cluster"]
    ).unwrap();

    /// Groups captured by the last group sync run
    pub static ref GROUPS_COLLECTED: GaugeVec = register_gauge_vec!(
        "kafka_metadata_syncer_groups_collected",
        "Consumer groups captured by the last sync run",
        &["cluster"]
    ).unwrap();

    /// Stale records removed by garbage collection
    pub static ref GROUPS_PRUNED: IntCounterVec = register_int_counter_vec!(
        "kafka_metadata_syncer_groups_pruned_total",
        "Total number of stored group records garbage-collected",
        &["cluster"]
    ).unwrap();

    /// Syncer health (1 = healthy, 0 = unhealthy)
    pub static ref SYNCER_HEALTH: prometheus::Gauge = prometheus::register_gauge!(
        "kafka_metadata_syncer_health",
        "Syncer health status (1 = healthy, 0 = unhealthy)"
    ).unwrap();
}

/// Start the metrics HTTP server
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    SYNCER_HEALTH.set(1.0);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(handle_request))
                .await
            {
                error!("Error serving connection: {}", e);
            }
        });
    }
}

/// Handle HTTP requests
async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let response = match req.uri().path() {
        "/metrics" => metrics_response(),
        "/healthz" | "/health" => ok_response(),
        "/readyz" | "/ready" => ok_response(),
        _ => not_found_response(),
    };

    Ok(response)
}

/// Generate metrics response
fn metrics_response() -> Response<Full<Bytes>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Full::new(Bytes::from("Failed to encode metrics")))
            .unwrap();
    }

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", encoder.format_type())
        .body(Full::new(Bytes::from(buffer)))
        .unwrap()
}

/// Health/readiness response
fn ok_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::from("ok")))
        .unwrap()
}

/// Not found response
fn not_found_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from("Not Found")))
        .unwrap()
}
