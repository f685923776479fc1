use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::HistoryRow;

/// Normalized current-conditions reading. Also the cached value shape, so it
/// is identical whether served fresh from the provider or from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub humidity: Option<i32>,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ClearCacheQuery {
    pub city: Option<String>,
}

/// Denormalized view of the owner embedded in every history record.
#[derive(Debug, Serialize)]
pub struct HistoryUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub city: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub humidity: Option<i32>,
    pub description: String,
    pub icon: String,
    pub created_at: OffsetDateTime,
    pub user: HistoryUser,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            city: row.city,
            country: row.country,
            temperature: row.temperature,
            humidity: row.humidity,
            description: row.description,
            icon: row.icon,
            created_at: row.created_at,
            user: HistoryUser {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<HistoryRecord>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_roundtrips_through_json() {
        let reading = WeatherReading {
            city: "Istanbul".into(),
            country: Some("TR".into()),
            temperature: 24.5,
            humidity: Some(61),
            description: "clear sky".into(),
            icon: "01d".into(),
        };
        let raw = serde_json::to_string(&reading).unwrap();
        let back: WeatherReading = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn history_query_fields_are_optional() {
        let q: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert!(q.page.is_none());
        assert!(q.limit.is_none());
    }
}
