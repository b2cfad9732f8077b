use super::AppState;
use crate::domain::Id;
use crate::dto::IndicatorResponse;
use crate::dto::MessageResponse;
use crate::dto::PlayerIdQuery;
use crate::dto::SendMessageRequest;
use crate::dto::StatusOk;
use crate::error::AppError;
use crate::error::AppResult;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms/{room_id}/rounds/{n}/message", web::post().to(send_message))
        .route("/rooms/{room_id}/rounds/{n}/message", web::get().to(get_message))
        .route("/rooms/{room_id}/indicators/assign", web::post().to(assign_indicators))
        .route("/rooms/{room_id}/indicator", web::get().to(get_indicator));
}

async fn send_message(
    state: web::Data<AppState>,
    path: web::Path<(Id, i32)>,
    body: web::Json<SendMessageRequest>,
) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    state
        .messages
        .send_message(room_id, round_number, body.sender_id, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn get_message(
    state: web::Data<AppState>,
    path: web::Path<(Id, i32)>,
    query: web::Query<PlayerIdQuery>,
) -> AppResult<impl Responder> {
    let (room_id, round_number) = path.into_inner();
    let message = state
        .messages
        .get_message_for(room_id, round_number, query.player_id)
        .await?
        .ok_or_else(|| AppError::not_found("no message for this player yet"))?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        content: message.content,
        from_opponent: true,
    }))
}

async fn assign_indicators(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<impl Responder> {
    state.indicators.assign_indicators(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(StatusOk::ok()))
}

async fn get_indicator(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    query: web::Query<PlayerIdQuery>,
) -> AppResult<impl Responder> {
    let indicator = state.indicators.get_indicator(path.into_inner(), query.player_id).await?;
    Ok(HttpResponse::Ok().json(IndicatorResponse { symbol: indicator.symbol }))
}
