use crate::db::DbPool;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Site header/branding, read once at startup. Immutable for the
    /// lifetime of the process.
    pub branding: SiteBranding,
    pub session: Arc<Mutex<SessionState>>, // Global session for single-admin usage
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SiteBranding {
    pub title: String,
}

impl SiteBranding {
    pub fn from_env() -> Self {
        SiteBranding {
            title: std::env::var("SITE_TITLE")
                .unwrap_or_else(|_| "Trackdesk Administration".to_string()),
        }
    }
}

#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub role: Option<String>,
}
