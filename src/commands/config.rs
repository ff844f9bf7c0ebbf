use axum::extract::{Json, State};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::error::{TrackdeskError, TrackdeskResult};
use crate::middleware::auth::{get_jwt_secret, Claims};
use crate::state::{AppState, SessionState};

const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: Option<String>,
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub role: Option<String>,
}

fn login_failure(message: &str) -> LoginResponse {
    LoginResponse {
        success: false,
        message: message.to_string(),
        token: None,
        user_id: None,
        username: None,
        role: None,
    }
}

fn issue_token(user: &User) -> TrackdeskResult<String> {
    let claims = Claims {
        sub: user.username.clone(),
        user_id: Some(user.id),
        username: Some(user.username.clone()),
        role: Some(user.role.clone()),
        exp: (Utc::now().timestamp() + TOKEN_TTL_HOURS * 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&get_jwt_secret()),
    )
    .map_err(|e| TrackdeskError::Internal(format!("Token signing failed: {}", e)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> TrackdeskResult<Json<LoginResponse>> {
    let username = payload.username;
    let password = payload.password;

    if username.trim().is_empty() || password.trim().is_empty() {
        return Ok(Json(login_failure("Username and password are required.")));
    }

    let user_result = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, created_at, updated_at FROM users WHERE username = $1",
    )
    .bind(&username)
    .fetch_optional(&state.pool)
    .await?;

    let Some(user) = user_result else {
        return Ok(Json(login_failure("Unknown user.")));
    };
    let Some(password_hash) = &user.password_hash else {
        return Ok(Json(login_failure("This account cannot log in.")));
    };

    match verify(&password, password_hash) {
        Ok(true) => {
            if let Ok(mut session) = state.session.lock() {
                session.user_id = Some(user.id);
                session.username = Some(user.username.clone());
                session.role = Some(user.role.clone());
            }

            let token = issue_token(&user)?;
            Ok(Json(LoginResponse {
                success: true,
                message: "Login successful.".to_string(),
                token: Some(token),
                user_id: Some(user.id),
                username: Some(user.username.clone()),
                role: Some(user.role.clone()),
            }))
        }
        Ok(false) => Ok(Json(login_failure("Incorrect password."))),
        Err(_) => Ok(Json(login_failure("Password verification failed."))),
    }
}

pub async fn logout(State(state): State<AppState>) -> Json<()> {
    if let Ok(mut session) = state.session.lock() {
        session.user_id = None;
        session.username = None;
        session.role = None;
    }
    Json(())
}

#[derive(Serialize)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    pub user: Option<SessionState>,
    pub site_title: String,
}

pub async fn check_auth_status(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    let session = state.session.lock().unwrap();
    let logged_in = session.user_id.is_some();

    Json(AuthStatusResponse {
        logged_in,
        user: Some(session.clone()),
        site_title: state.branding.title.clone(),
    })
}

pub fn check_admin(state: &AppState) -> TrackdeskResult<()> {
    let session = state
        .session
        .lock()
        .map_err(|_| TrackdeskError::Internal("Session lock poisoned".to_string()))?;
    if session.role.as_deref() == Some("admin") {
        Ok(())
    } else {
        Err(TrackdeskError::Auth(
            "Administrator privileges required.".to_string(),
        ))
    }
}

pub async fn get_all_users(State(state): State<AppState>) -> TrackdeskResult<Json<Vec<User>>> {
    check_admin(&state)?;
    let mut users = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, created_at, updated_at FROM users ORDER BY id",
    )
    .fetch_all(&state.pool)
    .await?;
    for user in &mut users {
        user.password_hash = None;
    }
    Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> TrackdeskResult<Json<()>> {
    check_admin(&state)?;
    if payload.username.trim().is_empty() || payload.password.trim().is_empty() {
        return Err(TrackdeskError::Validation(
            "Username and password are required.".to_string(),
        ));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)?;
    sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3)")
        .bind(payload.username.trim())
        .bind(password_hash)
        .bind(payload.role.as_deref().unwrap_or("staff"))
        .execute(&state.pool)
        .await?;
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub id: i32,
}

pub async fn delete_user(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUserRequest>,
) -> TrackdeskResult<Json<()>> {
    check_admin(&state)?;

    let current = state
        .session
        .lock()
        .ok()
        .and_then(|session| session.user_id);
    if current == Some(payload.id) {
        return Err(TrackdeskError::Validation(
            "You cannot delete the account you are logged in with.".to_string(),
        ));
    }

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(payload.id)
        .execute(&state.pool)
        .await?;
    Ok(Json(()))
}
