//! Tenant routes.

use crate::{
    api::{
        AppState,
        extract::{Json, Path, Query},
    },
    core::{
        scope::Identity,
        tenant::{
            TenantDetail, TenantFilter, TenantInput, TenantListItem, create_tenant, delete_tenant,
            find_all_tenants, find_tenant_by_id,
        },
    },
    entities::tenant,
    errors::Result,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list_tenants).post(create_tenant_handler))
        .route("/tenants/:id", get(get_tenant).delete(delete_tenant_handler))
}

async fn list_tenants(
    State(state): State<AppState>,
    identity: Identity,
    Query(filter): Query<TenantFilter>,
) -> Result<Json<Vec<TenantListItem>>> {
    Ok(Json(find_all_tenants(&*state.db, &identity, filter).await?))
}

async fn create_tenant_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<TenantInput>,
) -> Result<(StatusCode, Json<tenant::Model>)> {
    let tenant = create_tenant(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

async fn get_tenant(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<TenantDetail>> {
    Ok(Json(find_tenant_by_id(&*state.db, &identity, id).await?))
}

async fn delete_tenant_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    delete_tenant(&*state.db, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
