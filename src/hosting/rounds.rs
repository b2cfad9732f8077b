use super::AppState;
use crate::domain::Id;
use crate::dto::ActionRequest;
use crate::dto::CurrentRoundResponse;
use crate::dto::PairResponse;
use crate::dto::PlayerIdQuery;
use crate::dto::StatusOk;
use crate::error::AppError;
use crate::error::AppResult;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms/{room_id}/rounds/current", web::get().to(current_round))
        .route("/rooms/{room_id}/rounds/{n}/pair", web::get().to(pair))
        .route("/rooms/{room_id}/rounds/{n}/action", web::post().to(action))
        .route("/rooms/{room_id}/rounds/{n}/publish", web::post().to(publish))
        .route("/rooms/{room_id}/rounds/{n}/skip", web::post().to(skip))
        .route("/rooms/{room_id}/rounds/{n}/result", web::get().to(result));
}

async fn current_round(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    let room_id = path.into_inner();
    let round = state.rounds.current_round(room_id).await?.ok_or_else(|| {
        AppError::not_found("no current round")
    })?;
    let indicators_assigned = state.indicators.indicators_assigned(room_id).await?;
    Ok(HttpResponse::Ok().json(CurrentRoundResponse {
        round_number: round.round_number,
        phase: crate::domain::Phase::display_for(round.round_number, indicators_assigned),
        status: round.status,
    }))
}

async fn pair(
    state: web::Data<AppState>,
    path: web::Path<(Id, i32)>,
    query: web::Query<PlayerIdQuery>,
) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    let pair = state.rounds.get_pair(room_id, round_number, query.player_id).await?;
    let opponent_id = pair.opponent_of(query.player_id).ok_or_else(|| AppError::not_found("player not in this pair"))?;
    let players = state.rooms.list_players(room_id).await?;
    let opponent_display_name = players
        .iter()
        .find(|p| p.id == opponent_id)
        .map(|p| p.display_name().to_string())
        .ok_or_else(|| AppError::not_found("opponent not found"))?;
    Ok(HttpResponse::Ok().json(PairResponse {
        opponent_id,
        opponent_display_name,
    }))
}

async fn action(
    state: web::Data<AppState>,
    path: web::Path<(Id, i32)>,
    body: web::Json<ActionRequest>,
) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    state
        .rounds
        .submit_action(room_id, round_number, body.player_id, body.choice)
        .await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn publish(state: web::Data<AppState>, path: web::Path<(Id, i32)>) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    state.rounds.publish_round(room_id, round_number).await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn skip(state: web::Data<AppState>, path: web::Path<(Id, i32)>) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    state.rounds.skip_round(room_id, round_number).await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn result(
    state: web::Data<AppState>,
    path: web::Path<(Id, i32)>,
    query: web::Query<PlayerIdQuery>,
) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    let report = state.rounds.get_result(room_id, round_number, query.player_id).await?;
    Ok(HttpResponse::Ok().json(report))
}
