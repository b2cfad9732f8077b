mod rooms;
mod rounds;
mod social;

use crate::engine::RoomManager;
use crate::engine::RoundManager;
use crate::snapshot::SnapshotBuilder;
use crate::snapshot::SummaryBuilder;
use crate::social::IndicatorService;
use crate::social::MessageService;
use crate::store::Store;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;

/// Everything a handler needs, grouped behind one `web::Data` the way the
/// source's `hosting::casino` hangs all of its shared state off a single
/// `Casino` struct instead of registering each collaborator separately.
pub struct AppState {
    pub rooms: RoomManager,
    pub rounds: RoundManager,
    pub messages: MessageService,
    pub indicators: IndicatorService,
    pub snapshot: SnapshotBuilder,
    pub summary: SummaryBuilder,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            rooms: RoomManager::new(store.clone()),
            rounds: RoundManager::new(store.clone()),
            messages: MessageService::new(store.clone()),
            indicators: IndicatorService::new(store.clone()),
            snapshot: SnapshotBuilder::new(store.clone()),
            summary: SummaryBuilder::new(store),
        }
    }
}

pub struct Server;

impl Server {
    pub async fn run(state: Arc<AppState>, bind_addr: &str) -> std::io::Result<()> {
        let data = web::Data::from(state);
        log::info!("starting hosting server on {bind_addr}");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(data.clone())
                .route("/healthz", web::get().to(healthz))
                .service(web::scope("/api").configure(rooms::configure).configure(rounds::configure).configure(social::configure))
        })
        .bind(bind_addr)?
        .run()
        .await
    }
}

async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(crate::dto::HealthResponse { status: "ok" })
}
