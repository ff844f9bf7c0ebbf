use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/clients/create",
            post(commands::client::record::create_client),
        )
        .route(
            "/api/clients/update",
            post(commands::client::record::update_client),
        )
        .route(
            "/api/clients/delete",
            post(commands::client::record::delete_client),
        )
        .route("/api/clients/get", get(commands::client::query::get_client))
        .route(
            "/api/clients/list",
            get(commands::client::query::list_clients),
        )
}
