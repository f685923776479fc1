use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod handlers;
pub mod provider;
pub mod repo;
pub mod service;

pub use dto::WeatherReading;

pub fn router() -> Router<AppState> {
    handlers::weather_routes()
}
