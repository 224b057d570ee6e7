use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{error, info};

use crate::analytics::{
    assemble_report, build_listen_batch, ClientContext, ListenEvent, ListenEventBody,
};
use crate::catalog::Catalog;
use crate::counter_store::CounterStore;
use tower_http::services::ServeDir;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{auth::ReportAccess, log_requests, metrics, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn store_unavailable() -> Response {
    metrics::record_store_error();
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        "The counter store is unavailable.",
    )
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        artists: state.catalog.get_artists_count(),
        albums: state.catalog.get_albums_count(),
        tracks: state.catalog.get_tracks_count(),
    };
    Json(stats)
}

async fn get_artists(State(catalog): State<GuardedCatalog>) -> Response {
    Json(catalog.artists_overview()).into_response()
}

async fn get_artist(State(catalog): State<GuardedCatalog>, Path(slug): Path<String>) -> Response {
    match catalog.get_artist(&slug) {
        Some(artist) => Json(artist).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// POST /api/listen. The body is parsed by hand so every malformed payload
/// maps to the same 400 shape, before anything touches the store.
async fn post_listen(
    State(store): State<GuardedCounterStore>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Request body is empty.");
    }

    let parsed: ListenEventBody = match serde_json::from_slice(&body) {
        Ok(parsed) => parsed,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid JSON format."),
    };

    let event = match ListenEvent::from_body(parsed) {
        Ok(event) => event,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let client = ClientContext::from_headers(&headers);

    let batch = match build_listen_batch(&event, &client, chrono::Utc::now()) {
        Ok(batch) => batch,
        Err(err) => {
            error!("Failed to serialize diagnostic record: {}", err);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.",
            );
        }
    };

    if let Err(err) = store.apply(&batch) {
        error!("Counter store write failed: {}", err);
        return store_unavailable();
    }

    metrics::record_listen_event(&event.event_type);
    info!(
        "Event '{}' for track '{}' from {} processed.",
        event.event_type, event.track_id, client.country
    );

    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/stats, bearer-guarded by the [`ReportAccess`] extractor.
async fn get_report(_access: ReportAccess, State(store): State<GuardedCounterStore>) -> Response {
    match assemble_report(store.as_ref()) {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!("Counter store read failed: {}", err);
            store_unavailable()
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    counter_store: Arc<dyn CounterStore>,
    catalog: Catalog,
) -> Result<Router> {
    let music_dir = config.music_dir.clone();
    let state = ServerState {
        config,
        start_time: Instant::now(),
        counter_store,
        catalog: Arc::new(catalog),
    };

    let api_routes: Router = Router::new()
        .route("/listen", post(post_listen))
        .route("/stats", get(get_report))
        .route("/artists", get(get_artists))
        .route("/artist/{slug}", get(get_artist))
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/metrics", get(metrics::metrics_handler))
        .with_state(state.clone())
        .nest("/api", api_routes)
        .nest_service("/music", ServeDir::new(music_dir))
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    counter_store: Arc<dyn CounterStore>,
    catalog: Catalog,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, counter_store, catalog)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
