//! Rooming house and room routes.

use crate::{
    api::{
        AppState,
        extract::{Json, Path},
    },
    core::{
        property::{
            RoomingHouseInput, create_rooming_house, delete_rooming_house, find_all_rooming_houses,
            find_rooming_house_by_id, update_rooming_house,
        },
        room::{
            RoomDetail, RoomInput, RoomSummary, create_room, delete_room, find_all_rooms,
            find_room_by_id, update_room,
        },
        scope::Identity,
    },
    entities::{room, rooming_house},
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
        .route("/roominghouses", get(list_houses).post(create_house))
        .route(
            "/roominghouses/:id",
            get(get_house).put(update_house).delete(delete_house),
        )
        .route("/rooms", get(list_rooms).post(create_room_handler))
        .route(
            "/rooms/:id",
            get(get_room).put(update_room_handler).delete(delete_room_handler),
        )
}

async fn list_houses(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<rooming_house::Model>>> {
    Ok(Json(find_all_rooming_houses(&*state.db, &identity).await?))
}

async fn create_house(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<RoomingHouseInput>,
) -> Result<(StatusCode, Json<rooming_house::Model>)> {
    let house = create_rooming_house(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(house)))
}

async fn get_house(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<rooming_house::Model>> {
    Ok(Json(find_rooming_house_by_id(&*state.db, &identity, id).await?))
}

async fn update_house(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(input): Json<RoomingHouseInput>,
) -> Result<Json<rooming_house::Model>> {
    Ok(Json(update_rooming_house(&*state.db, &identity, id, &input).await?))
}

async fn delete_house(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    delete_rooming_house(&*state.db, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_rooms(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<RoomSummary>>> {
    Ok(Json(find_all_rooms(&*state.db, &identity).await?))
}

async fn create_room_handler(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<RoomInput>,
) -> Result<(StatusCode, Json<room::Model>)> {
    let room = create_room(&*state.db, &identity, &input).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn get_room(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomDetail>> {
    Ok(Json(find_room_by_id(&*state.db, &identity, id).await?))
}

async fn update_room_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(input): Json<RoomInput>,
) -> Result<Json<room::Model>> {
    Ok(Json(update_room(&*state.db, &identity, id, &input).await?))
}

async fn delete_room_handler(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    delete_room(&*state.db, &identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
