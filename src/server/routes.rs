use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json};

use crate::models::{AggregateResult, BonusAward};
use crate::report::{render_analysis_page, render_home_page};
use crate::server::error::AppError;
use crate::server::state::AppState;

/// GET /
pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_home_page(&state.title))
}

/// GET /analyze
///
/// HTML analysis page for the loaded records.
pub async fn analyze(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let result = state.aggregate()?;
    Ok(Html(render_analysis_page(&state.title, &result)))
}

/// GET /api/data
///
/// Aggregated statistics as JSON.
pub async fn api_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AggregateResult>, AppError> {
    Ok(Json(state.aggregate()?))
}

/// GET /api/bonus
pub async fn api_bonus(State(state): State<Arc<AppState>>) -> Json<BonusAward> {
    Json(BonusAward {
        amount: state.bonus.pick(),
    })
}

/// GET /health
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// GET /metrics
///
/// Prometheus text exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body))
}

pub async fn not_found() -> AppError {
    AppError::not_found("Not found")
}
