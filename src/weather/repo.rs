use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::WeatherReading;

/// History row joined with its owner. Rows are immutable once written.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub city: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub humidity: Option<i32>,
    pub description: String,
    pub icon: String,
    pub created_at: OffsetDateTime,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
}

pub async fn insert(db: &PgPool, user_id: Uuid, reading: &WeatherReading) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO weather_queries (city, country, temperature, humidity, description, icon, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&reading.city)
    .bind(&reading.country)
    .bind(reading.temperature)
    .bind(reading.humidity)
    .bind(&reading.description)
    .bind(&reading.icon)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(())
}

/// Page of history rows, newest first. `owner = None` spans all users.
pub async fn list(
    db: &PgPool,
    owner: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<HistoryRow>> {
    let rows = match owner {
        Some(user_id) => {
            sqlx::query_as::<_, HistoryRow>(
                r#"
                SELECT w.id, w.city, w.country, w.temperature, w.humidity,
                       w.description, w.icon, w.created_at,
                       u.id AS user_id, u.name AS user_name, u.email AS user_email
                FROM weather_queries w
                JOIN users u ON u.id = w.user_id
                WHERE w.user_id = $1
                ORDER BY w.created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, HistoryRow>(
                r#"
                SELECT w.id, w.city, w.country, w.temperature, w.humidity,
                       w.description, w.icon, w.created_at,
                       u.id AS user_id, u.name AS user_name, u.email AS user_email
                FROM weather_queries w
                JOIN users u ON u.id = w.user_id
                ORDER BY w.created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?
        }
    };
    Ok(rows)
}

pub async fn count(db: &PgPool, owner: Option<Uuid>) -> anyhow::Result<i64> {
    let total = match owner {
        Some(user_id) => {
            sqlx::query_scalar::<_, i64>(
                r#"SELECT COUNT(*) FROM weather_queries WHERE user_id = $1"#,
            )
            .bind(user_id)
            .fetch_one(db)
            .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM weather_queries"#)
                .fetch_one(db)
                .await?
        }
    };
    Ok(total)
}
