use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest},
        extractors::AdminUser,
        jwt::JwtKeys,
        password::{hash_password, is_valid_email, verify_password},
        repo::{DeletedUser, Role, User},
    },
    error::ApiError,
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/users", get(list_users))
        .route("/auth/users/:id", get(get_user).delete(delete_user))
}

fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "auth storage error");
    ApiError::Internal(e.to_string())
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    let name = payload.name.trim();
    if name.len() < 2 {
        return Err(ApiError::Validation(
            "name must be at least 2 characters".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("user already exists".into()));
    }

    let hash = hash_password(&payload.password).map_err(internal)?;
    let role = payload.role.unwrap_or(Role::User);
    let user = User::create(&state.db, &payload.email, &hash, name, role)
        .await
        .map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, ApiResponse::ok(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password share one message so the endpoint
    // cannot be used to enumerate accounts.
    let Some(user) = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
    else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::Unauthorized("invalid email or password".into()));
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(internal)?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .issue(user.id, &user.email, user.role)
        .map_err(internal)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(ApiResponse::ok(LoginResponse {
        user: PublicUser::from(user),
        token,
    }))
}

#[instrument(skip(state, _admin))]
async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<ApiResponse<Vec<PublicUser>>, ApiError> {
    let users = User::list(&state.db).await.map_err(internal)?;
    Ok(ApiResponse::ok(
        users.into_iter().map(PublicUser::from).collect(),
    ))
}

#[instrument(skip(state, _admin))]
async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
    Ok(ApiResponse::ok(PublicUser::from(user)))
}

#[instrument(skip(state, admin))]
async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<DeletedUser>, ApiError> {
    let deleted = User::delete(&state.db, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
    info!(admin_id = %admin.0.id, user_id = %deleted.id, "user deleted");
    Ok(ApiResponse::with_message(deleted, "user deleted"))
}
