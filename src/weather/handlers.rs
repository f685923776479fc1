use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::{AdminUser, AuthUser},
    error::ApiError,
    response::ApiResponse,
    state::AppState,
};

use super::dto::{ClearCacheQuery, CurrentWeatherRequest, HistoryQuery, HistoryResponse, WeatherReading};

pub fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/weather/current", post(current))
        .route("/weather/history", get(history))
        .route("/weather/cache", delete(clear_cache))
}

#[instrument(skip(state, user, payload))]
async fn current(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CurrentWeatherRequest>,
) -> Result<ApiResponse<WeatherReading>, ApiError> {
    let city = payload.city.trim();
    if city.is_empty() {
        return Err(ApiError::Validation("city is required".into()));
    }

    let reading = state.weather.get_weather(city, user.id).await?;
    info!(user_id = %user.id, city = %reading.city, "weather lookup served");
    Ok(ApiResponse::ok(reading))
}

#[instrument(skip(state, user))]
async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<ApiResponse<HistoryResponse>, ApiError> {
    let history = state
        .weather
        .get_history(user.id, user.role, q.page, q.limit)
        .await?;
    Ok(ApiResponse::ok(history))
}

#[instrument(skip(state, admin))]
async fn clear_cache(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(q): Query<ClearCacheQuery>,
) -> Result<ApiResponse<()>, ApiError> {
    let message = state.weather.clear_cache(q.city.as_deref()).await?;
    info!(admin_id = %admin.0.id, city = ?q.city, "weather cache cleared");
    Ok(ApiResponse::message(message))
}
