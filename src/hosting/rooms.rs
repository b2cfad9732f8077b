use super::AppState;
use crate::domain::Id;
use crate::domain::RoomStatus;
use crate::dto::CreateRoomResponse;
use crate::dto::DeleteResponse;
use crate::dto::JoinRequest;
use crate::dto::JoinResponse;
use crate::dto::NextRoundResponse;
use crate::dto::RoomListQuery;
use crate::dto::RoomListResponse;
use crate::dto::RoomLookupResponse;
use crate::dto::StateQuery;
use crate::dto::StatusOk;
use crate::error::AppResult;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::str::FromStr;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms", web::post().to(create_room))
        .route("/rooms", web::get().to(list_rooms))
        .route("/rooms/{code}", web::get().to(lookup_room))
        .route("/rooms/{room_id}", web::delete().to(delete_room))
        .route("/rooms/{code}/join", web::post().to(join_room))
        .route("/rooms/{room_id}/start", web::post().to(start_game))
        .route("/rooms/{room_id}/rounds/next", web::post().to(next_round))
        .route("/rooms/{room_id}/end", web::post().to(end_game))
        .route("/rooms/{room_id}/summary", web::get().to(summary))
        .route("/rooms/{room_id}/state", web::get().to(state));
}

async fn create_room(state: web::Data<AppState>) -> AppResult<impl Responder> {
    let (room, host) = state.rooms.create_room().await?;
    Ok(HttpResponse::Ok().json(CreateRoomResponse {
        room_id: room.id,
        code: room.code,
        host_player_id: host.id,
    }))
}

async fn list_rooms(state: web::Data<AppState>, query: web::Query<RoomListQuery>) -> AppResult<impl Responder> {
    let status = query
        .status
        .as_deref()
        .map(RoomStatus::from_str)
        .transpose()
        .map_err(|e| crate::error::AppError::invalid_input(e.to_string()))?;
    let limit = query.limit.unwrap_or(50);
    let offset = query.offset.unwrap_or(0);
    let (rooms, total) = state.rooms.list_rooms(status, limit, offset).await?;
    Ok(HttpResponse::Ok().json(RoomListResponse {
        rooms,
        total,
        limit,
        offset,
    }))
}

async fn lookup_room(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<impl Responder> {
    let code = path.into_inner();
    let room = state.rooms.get_room_by_code(&code).await?;
    let players = state.rooms.list_players(room.id).await?;
    Ok(HttpResponse::Ok().json(RoomLookupResponse {
        room_id: room.id,
        code: room.code,
        status: room.status,
        current_round: room.current_round,
        player_count: players.len() as i64,
    }))
}

async fn delete_room(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    let room_id = path.into_inner();
    state.rooms.delete_room(room_id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        status: "deleted",
        room_id,
    }))
}

async fn join_room(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<JoinRequest>,
) -> AppResult<impl Responder> {
    let code = path.into_inner();
    let player = state.rooms.join_room(&code, &body.nickname).await?;
    Ok(HttpResponse::Ok().json(JoinResponse {
        player_id: player.id,
        room_id: player.room_id,
        display_name: player.display_name().to_string(),
    }))
}

async fn start_game(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    state.rooms.start_game(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn next_round(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    let round = state.rooms.next_round(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(NextRoundResponse {
        status: "ok",
        round_number: round.round_number,
    }))
}

async fn end_game(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    state.rooms.end_game(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn summary(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    let report = state.summary.build(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

async fn state(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    query: web::Query<StateQuery>,
) -> AppResult<impl Responder> {
    let snapshot = state
        .snapshot
        .build(path.into_inner(), query.version, query.player_id)
        .await?;
    Ok(HttpResponse::Ok().json(snapshot))
}
