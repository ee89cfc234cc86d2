//! Login, registration and admin listing.

use crate::{
    api::{
        AppState,
        extract::Json,
    },
    core::{
        account::{RegisterInput, authenticate, find_all_admins, register_admin, register_owner},
        scope::{Identity, Role},
    },
    entities::{admin, owner},
    errors::Result,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Which account table to check
    pub role: Role,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed access token
    pub token: String,
}

/// Admin registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterAdminRequest {
    /// Account fields
    #[serde(flatten)]
    pub account: RegisterInput,
    /// Rooming house the admin will manage
    #[serde(default)]
    pub rooming_house_id: Option<Uuid>,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/registerowner", post(register_owner_handler))
        .route("/registeradmin", post(register_admin_handler))
        .route("/admins", get(list_admins))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let identity = authenticate(&*state.db, &request.email, &request.password, request.role).await?;
    let token = state.tokens.issue(&identity)?;
    Ok(Json(LoginResponse { token }))
}

async fn register_owner_handler(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<owner::Model>)> {
    let owner = register_owner(&*state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

async fn register_admin_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<admin::Model>)> {
    let admin = register_admin(&*state.db, &identity, request.rooming_house_id, &request.account).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

async fn list_admins(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<admin::Model>>> {
    Ok(Json(find_all_admins(&*state.db, &identity).await?))
}
