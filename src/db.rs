use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, Pool, Postgres};
use std::str::FromStr;

use crate::error::{TrackdeskError, TrackdeskResult};

pub type DbPool = Pool<Postgres>;

pub async fn init_pool_with_options(opts: PgConnectOptions) -> TrackdeskResult<DbPool> {
    // connect_lazy_with returns the pool immediately. It does not validate connection.
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .idle_timeout(std::time::Duration::from_secs(120))
        .max_lifetime(std::time::Duration::from_secs(300))
        .connect_lazy_with(opts))
}

pub async fn init_pool(database_url: &str) -> TrackdeskResult<DbPool> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| TrackdeskError::Internal(format!("Invalid DB URL: {}", e)))?
        .ssl_mode(PgSslMode::Disable);

    init_pool_with_options(opts).await
}

pub async fn init_database(pool: &DbPool) -> TrackdeskResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    let _ = ensure_seeds(pool).await;
    tracing::info!("Database ready");

    Ok(())
}

async fn ensure_seeds(pool: &DbPool) -> TrackdeskResult<()> {
    let admin_username = std::env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());

    let admin_exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(&admin_username)
        .fetch_one(pool)
        .await
        .unwrap_or((0,));
    if admin_exists.0 == 0 {
        if let Ok(hash) = bcrypt::hash("admin", bcrypt::DEFAULT_COST) {
            let _ = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ($1, $2, 'admin') ON CONFLICT DO NOTHING")
                .bind(&admin_username)
                .bind(hash)
                .execute(pool)
                .await;
            tracing::warn!("Seeded default admin user '{}' with default password", admin_username);
        }
    }
    Ok(())
}

/// One row per client/device/subscription.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ClientRecord {
    pub id: i64,
    pub added: NaiveDate,
    pub email: String,
    pub sage_details: String,
    // Semicolon-joined lists of up to 5 Sage sub-references. The form
    // layer edits these as discrete sub-fields; see commands::client::refs.
    pub sage_invoice_reference: String,
    pub sage_payment_reference: String,
    pub tracker_imei: String,
    pub tracker_model: String,
    pub tracker_activation_date: Option<NaiveDate>,
    pub tracker_expire_date: Option<NaiveDate>,
    pub tracker_status: String,
    pub tracker_status_note: Option<String>,
    pub sim_number: String,
    pub sim_activation_date: Option<NaiveDate>,
    pub sim_expire_date: Option<NaiveDate>,
    pub sim_provider: String,
    pub sim_code: String,
    pub status: String,
    pub sim_status_note: Option<String>,
    pub expire_date: String,
    pub sim_exp_date: String,
    pub country: String,
    pub sold_by: String,
    pub description: Option<String>,
    #[sqlx(default)]
    pub activated_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub suspended_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: Option<String>,
    pub role: String,
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
