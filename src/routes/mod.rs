use crate::state::AppState;
use axum::Router;

pub mod auth;
pub mod client;
pub mod export;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(client::router())
        .merge(export::router())
}
