use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(commands::config::login))
        .route("/api/auth/logout", post(commands::config::logout))
        .route("/api/auth/status", get(commands::config::check_auth_status))
        .route("/api/auth/check", get(commands::config::check_auth_status))
        .route("/api/auth/users", get(commands::config::get_all_users))
        .route("/api/auth/users/create", post(commands::config::create_user))
        .route("/api/auth/users/delete", post(commands::config::delete_user))
}
