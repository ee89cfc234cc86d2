//! Pricing package and additional price routes.
//!
//! Both resources share the [`PricedItemInput`] payload: a name, an optional target
//! rooming house and one strictly positive price per period.

use crate::{
    api::{
        AppState,
        extract::{Json, Path},
    },
    core::{
        additional::{
            create_additional, delete_additional, find_additional_by_id, find_all_additionals,
            update_additional,
        },
        package::{create_package, delete_package, find_all_packages, find_package_by_id, update_package},
        pricing::{PricedItem, PricedItemInput},
        scope::Identity,
    },
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
        .route("/packages", get(list_packages).post(create_package_handler))
        .route(
            "/packages/:id",
            get(get_package)
                .put(update_package_handler)
                .delete(delete_package_handler),
        )
        .route("/additionals", get(list_additionals).post(create_additional_handler))
        .route(
            "/additionals/:id",
            get(get_additional)
                .put(update_additional_handler)
                .delete(delete_additional_handler),
        )
}

async fn list_packages(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<PricedItem>>> {
    Ok(Json(find_all_packages(&*state.db, &identity).await?))
}

async fn create_package_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<PricedItemInput>,
) -> Result<(StatusCode, Json<PricedItem>)> {
    let package = create_package(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

async fn get_package(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<PricedItem>> {
    Ok(Json(find_package_by_id(&*state.db, &identity, id).await?))
}

async fn update_package_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(input): Json<PricedItemInput>,
) -> Result<Json<PricedItem>> {
    Ok(Json(update_package(&*state.db, &identity, id, &input).await?))
}

async fn delete_package_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    delete_package(&*state.db, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_additionals(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<PricedItem>>> {
    Ok(Json(find_all_additionals(&*state.db, &identity).await?))
}

async fn create_additional_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<PricedItemInput>,
) -> Result<(StatusCode, Json<PricedItem>)> {
    let additional = create_additional(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(additional)))
}

async fn get_additional(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<PricedItem>> {
    Ok(Json(find_additional_by_id(&*state.db, &identity, id).await?))
}

async fn update_additional_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(input): Json<PricedItemInput>,
) -> Result<Json<PricedItem>> {
    Ok(Json(update_additional(&*state.db, &identity, id, &input).await?))
}

async fn delete_additional_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    delete_additional(&*state.db, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use crate::core::scope::Identity;
    use crate::errors::Result;
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_package_routes() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let state = test_state(db);
        let auth = bearer(&state, &Identity::owner(fixture.owner.id));

        let (status, packages) = send(&state, "GET", "/packages", Some(&auth), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(packages[0]["name"], "Standard");
        assert_eq!(packages[0]["prices"]["Weekly"], 300_000.0);

        let (status, body) = send(
            &state,
            "POST",
            "/packages",
            Some(&auth),
            Some(json!({
                "name": "Deluxe",
                "rooming_house_id": fixture.house.id,
                "daily": 80_000.0,
                "weekly": 0.0,
                "monthly": 1_500_000.0,
                "annual": 16_000_000.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "weekly price must be greater than zero");

        let uri = format!("/packages/{}", fixture.package.id);
        let (status, _) = send(&state, "DELETE", &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_creates_additional_in_own_house() -> Result<()> {
        let db = setup_test_db().await?;
        let fixture = create_test_fixture(&db).await?;
        let state = test_state(db);
        let admin_auth = bearer(&state, &Identity::admin(uuid::Uuid::new_v4(), fixture.house.id));

        let (status, additional) = send(
            &state,
            "POST",
            "/additionals",
            Some(&admin_auth),
            Some(json!({
                "name": "Laundry",
                "daily": 5_000.0,
                "weekly": 30_000.0,
                "monthly": 100_000.0,
                "annual": 1_100_000.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(additional["rooming_house_id"], json!(fixture.house.id));

        let uri = format!("/additionals/{}", additional["id"].as_str().unwrap_or_default());
        let (status, _) = send(&state, "DELETE", &uri, Some(&admin_auth), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        Ok(())
    }
}
