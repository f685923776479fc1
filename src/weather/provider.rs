use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::dto::WeatherReading;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("city '{0}' not found")]
    CityNotFound(String),
    #[error("weather provider request failed: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn current_by_city(&self, city: &str) -> Result<WeatherReading, ProviderError>;
}

/// Wire shape of the provider's current-weather endpoint.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    name: String,
    #[serde(default)]
    sys: Sys,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: Option<String>,
    icon: Option<String>,
}

impl ProviderResponse {
    fn into_reading(self) -> WeatherReading {
        let condition = self.weather.into_iter().next();
        WeatherReading {
            city: self.name,
            country: self.sys.country,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            description: condition
                .as_ref()
                .and_then(|c| c.description.clone())
                .unwrap_or_default(),
            icon: condition.and_then(|c| c.icon).unwrap_or_default(),
        }
    }
}

pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ProviderClient for OpenWeatherClient {
    async fn current_by_city(&self, city: &str) -> Result<WeatherReading, ProviderError> {
        let url = format!("{}/weather", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::CityNotFound(city.to_string()));
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Upstream(format!(
                "unexpected status {}",
                resp.status()
            )));
        }

        let body: ProviderResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(e.to_string()))?;
        debug!(city = %body.name, "provider reading fetched");
        Ok(body.into_reading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_provider_body() {
        let body = r#"{
            "name": "Istanbul",
            "sys": {"country": "TR"},
            "main": {"temp": 24.5, "humidity": 61},
            "weather": [
                {"description": "clear sky", "icon": "01d"},
                {"description": "ignored", "icon": "02d"}
            ]
        }"#;
        let parsed: ProviderResponse = serde_json::from_str(body).unwrap();
        let reading = parsed.into_reading();
        assert_eq!(reading.city, "Istanbul");
        assert_eq!(reading.country.as_deref(), Some("TR"));
        assert_eq!(reading.temperature, 24.5);
        assert_eq!(reading.humidity, Some(61));
        assert_eq!(reading.description, "clear sky");
        assert_eq!(reading.icon, "01d");
    }

    #[test]
    fn empty_condition_list_defaults_to_empty_strings() {
        let body = r#"{
            "name": "Istanbul",
            "main": {"temp": 18.0},
            "weather": []
        }"#;
        let parsed: ProviderResponse = serde_json::from_str(body).unwrap();
        let reading = parsed.into_reading();
        assert_eq!(reading.description, "");
        assert_eq!(reading.icon, "");
        assert_eq!(reading.country, None);
        assert_eq!(reading.humidity, None);
    }
}
