use serde::Deserialize;
use tracing::warn;

/// Fallback signing secret for local development only. `from_env` warns
/// loudly whenever this is in use.
const DEV_JWT_SECRET: &str = "skycast-insecure-dev-secret";

const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET is not set; using the insecure dev fallback secret");
                DEV_JWT_SECRET.to_string()
            }
        };
        let jwt = JwtConfig {
            secret,
            ttl_hours: std::env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };

        let api_key = std::env::var("WEATHER_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            warn!("WEATHER_API_KEY is not set; weather provider calls will be rejected upstream");
        }
        let weather = WeatherConfig {
            base_url: std::env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_WEATHER_BASE_URL.into()),
            api_key,
            cache_ttl_secs: std::env::var("WEATHER_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(300),
        };

        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            weather,
            production,
        })
    }
}
