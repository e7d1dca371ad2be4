use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use box_packer::{
    ConfigError, DroppedBox, Error, OversizePolicy, PackError, PackOptions, Packing, Placement,
    Problem, Rect, Strategy,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    bin: Rect,
    boxes: Vec<Rect>,
    #[serde(default = "default_strategy")]
    strategy: String,
    #[serde(default)]
    oversize: OversizePolicy,
    #[serde(default)]
    time_limit_ms: Option<u64>,
}

fn default_strategy() -> String {
    Strategy::Hff.id().to_string()
}

impl PackRequest {
    fn options(&self) -> PackOptions {
        let mut options = PackOptions::default().with_oversize(self.oversize);
        if let Some(ms) = self.time_limit_ms {
            options = options.with_time_limit(Duration::from_millis(ms));
        }
        options
    }

    fn problem(&self) -> Problem {
        Problem::new(self.bin, self.boxes.clone())
    }
}

#[derive(Serialize)]
struct PackResponse {
    strategy: Strategy,
    bin: Rect,
    bins: Vec<BinResponse>,
    bin_count: usize,
    waste_percent: f64,
    dropped: Vec<DroppedBox>,
}

#[derive(Serialize)]
struct BinResponse {
    placements: Vec<Placement>,
    waste_area: u64,
}

impl PackResponse {
    fn new(strategy: Strategy, packing: Packing) -> Self {
        let bins = packing
            .bins
            .iter()
            .map(|bin| BinResponse {
                placements: bin.placements.clone(),
                waste_area: packing.waste_area(bin),
            })
            .collect();
        Self {
            strategy,
            bin: packing.bin,
            bins,
            bin_count: packing.bin_count(),
            waste_percent: packing.total_waste_percent(),
            dropped: packing.dropped,
        }
    }
}

#[derive(Serialize)]
struct StrategyInfo {
    id: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct CompareEntry {
    strategy: Strategy,
    bin_count: Option<usize>,
    waste_percent: Option<f64>,
    dropped: Option<usize>,
    error: Option<String>,
}

type ApiError = (StatusCode, String);

fn config_error(e: ConfigError) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn pack_error(e: PackError) -> ApiError {
    let status = match e {
        PackError::Oversized { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PackError::Cancelled | PackError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
    };
    (status, e.to_string())
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    tracing::error!(error = %e, "packing task failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "packing task failed".to_string())
}

async fn strategies() -> Json<Vec<StrategyInfo>> {
    Json(
        Strategy::ALL
            .iter()
            .map(|s| StrategyInfo {
                id: s.id(),
                name: s.name(),
            })
            .collect(),
    )
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackResponse>, ApiError> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let problem = req.problem();
    problem.validate().map_err(config_error)?;
    let strategy: Strategy = req.strategy.parse().map_err(config_error)?;
    let options = req.options();

    let packing = tokio::task::spawn_blocking(move || problem.solve(strategy, &options))
        .await
        .map_err(join_error)?
        .map_err(|e| match e {
            Error::Config(e) => config_error(e),
            Error::Pack(e) => pack_error(e),
        })?;

    Ok(Json(PackResponse::new(strategy, packing)))
}

async fn compare(Json(req): Json<PackRequest>) -> Result<Json<Vec<CompareEntry>>, ApiError> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /compare"
    );

    let problem = req.problem();
    let options = req.options();

    let results = tokio::task::spawn_blocking(move || problem.compare(&options))
        .await
        .map_err(join_error)?
        .map_err(config_error)?;

    let entries = results
        .into_iter()
        .map(|(strategy, result)| match result {
            Ok(packing) => CompareEntry {
                strategy,
                bin_count: Some(packing.bin_count()),
                waste_percent: Some(packing.total_waste_percent()),
                dropped: Some(packing.dropped.len()),
                error: None,
            },
            Err(e) => CompareEntry {
                strategy,
                bin_count: None,
                waste_percent: None,
                dropped: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(entries))
}

#[tokio::main]
async fn main() {
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        ..Default::default()
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/strategies", get(strategies))
        .route("/pack", post(pack))
        .route("/compare", post(compare))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
