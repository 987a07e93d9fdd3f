use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::chains::Chain;
use crate::config::Config;
use crate::covalent::CovalentClient;
use crate::error::PortfolioError;
use crate::models::PortfolioReport;
use crate::pipeline::{self, PortfolioRequest};

pub struct AppState {
    pub cfg: Config,
    pub client: CovalentClient,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn serve(cfg: Config) -> eyre::Result<()> {
    let client = CovalentClient::new(&cfg.base_url, cfg.request_timeout, cfg.fetch_concurrency)?;
    let state = Arc::new(AppState {
        cfg: cfg.clone(),
        client,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(|| async { "Portfolio Balance API running" }))
        .route("/chains", get(list_chains))
        .route("/portfolio", post(portfolio))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], cfg.port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Supported chain identifiers, for the dashboard's multiselect.
async fn list_chains() -> Json<Vec<&'static str>> {
    Json(Chain::all().iter().map(|c| c.as_str()).collect())
}

/// One fetch cycle: wallets + chains (+ optional API key override) in,
/// aggregated table, buckets, chart panels and totals out.
async fn portfolio(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PortfolioRequest>,
) -> Result<Json<PortfolioReport>, (StatusCode, Json<ErrorResponse>)> {
    pipeline::run(&state.client, &state.cfg, &request)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match &e {
                PortfolioError::NoWalletsEntered
                | PortfolioError::NoChainsSelected
                | PortfolioError::UnknownChain(_)
                | PortfolioError::MissingApiKey => StatusCode::BAD_REQUEST,
                // upstream sent a record we cannot scale
                PortfolioError::MissingDecimals { .. } => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ErrorResponse { error: e.to_string() }))
        })
}
