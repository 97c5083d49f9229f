use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use game_core::{Board, Engine, GameError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, warn, Level};

pub mod config;

/// The one game this process serves. Clones share the same engine.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Engine>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_engine(Engine::new(&mut ChaCha8Rng::from_entropy()))
    }
}

impl AppState {
    pub fn with_seed(seed: u64) -> Self {
        Self::from_engine(Engine::new(&mut ChaCha8Rng::seed_from_u64(seed)))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }

    pub async fn snapshot(&self) -> Board {
        self.engine.read().await.state().clone()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/update", post(update))
        .route("/api/reset", get(reset))
        .route("/api/status", get(status))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("expected a JSON array [col, row]: {0}")]
    MalformedBody(String),
    #[error("cell at col {col}, row {row} is outside the board")]
    InvalidCoordinate { col: i64, row: i64 },
    #[error(transparent)]
    Core(#[from] GameError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "rejected update");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[derive(Deserialize)]
struct ResetParams {
    seed: Option<u64>,
}

async fn get_state(State(state): State<AppState>) -> Json<Board> {
    let board = state.snapshot().await;
    debug!(lit = board.lit_count(), "state requested");
    Json(board)
}

async fn update(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ApiError> {
    // Legacy clients get an empty 200 when the move isn't sent as JSON. The
    // body is only buffered past this point.
    if !is_json(request.headers()) {
        debug!("ignoring update without a JSON content type");
        return Ok(StatusCode::OK.into_response());
    }
    let body = match Bytes::from_request(request, &state).await {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let [col, row]: [i64; 2] =
        serde_json::from_slice(&body).map_err(|err| ApiError::MalformedBody(err.to_string()))?;
    let (Ok(c), Ok(r)) = (usize::try_from(col), usize::try_from(row)) else {
        return Err(ApiError::InvalidCoordinate { col, row });
    };

    let board = {
        let mut engine = state.engine.write().await;
        engine.select_cell(c, r)?.clone()
    };

    info!(col, row, lit = board.lit_count(), "cell selected");
    if board.is_winner() {
        info!("board cleared");
    }

    Ok(Json(board).into_response())
}

async fn reset(State(state): State<AppState>, Query(params): Query<ResetParams>) -> Json<Board> {
    let mut rng = params
        .seed
        .map(ChaCha8Rng::seed_from_u64)
        .unwrap_or_else(ChaCha8Rng::from_entropy);

    let board = {
        let mut engine = state.engine.write().await;
        engine.reset(&mut rng).clone()
    };

    info!(seed = ?params.seed, lit = board.lit_count(), "board reset");
    Json(board)
}

async fn status() -> &'static str {
    "OK"
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
