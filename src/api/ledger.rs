//! Transaction, dashboard and catalog routes.

use crate::{
    api::{
        AppState,
        extract::{Json, Query},
    },
    core::{
        catalog::{create_category, find_all_categories, find_all_periods},
        dashboard::{DashboardData, DashboardQuery, dashboard},
        scope::Identity,
        transaction::{TransactionInput, TransactionListItem, create_transaction, find_all_transactions},
    },
    entities::{period, transaction, transaction_category},
    errors::Result,
};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

/// New category payload.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    /// Category name, unique
    pub name: String,
    /// Counts as expense on the dashboard
    #[serde(default)]
    pub is_expense: bool,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction_handler))
        .route("/transactions/dashboard", get(dashboard_handler))
        .route(
            "/transaction-categories",
            get(list_categories).post(create_category_handler),
        )
        .route("/periods", get(list_periods))
}

async fn list_transactions(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<TransactionListItem>>> {
    Ok(Json(find_all_transactions(&*state.db, &identity).await?))
}

async fn create_transaction_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<TransactionInput>,
) -> Result<(StatusCode, Json<transaction::Model>)> {
    let transaction = create_transaction(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn dashboard_handler(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DashboardData>>> {
    Ok(Json(dashboard(&*state.db, &identity, query, state.dashboard).await?))
}

async fn list_categories(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<Vec<transaction_category::Model>>> {
    Ok(Json(find_all_categories(&*state.db).await?))
}

async fn create_category_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<transaction_category::Model>)> {
    let category = create_category(&*state.db, &identity, &request.name, request.is_expense).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn list_periods(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<Vec<period::Model>>> {
    Ok(Json(find_all_periods(&*state.db).await?))
}
