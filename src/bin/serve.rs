use chicken_room::config::Config;
use chicken_room::config::init_logging;
use chicken_room::hosting::AppState;
use chicken_room::hosting::Server;
use chicken_room::store::Cleanup;
use chicken_room::store::PgStore;
use chicken_room::store::Pool;
use chicken_room::store::Store;
use chicken_room::store::schema;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::from_env()?;

    let pool = Pool::connect(&config.db_url, config.pool_size).await?;
    {
        let conn = pool.checkout().await;
        schema::migrate(&conn).await?;
    }
    log::info!("connected to postgres with a pool of {} clients", pool.size());

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let cleanup = Cleanup::spawn(store.clone(), chicken_room::CLEANUP_INTERVAL);
    let state = Arc::new(AppState::new(store));

    let result = Server::run(state, &config.bind_addr).await;
    cleanup.stop();
    result.map_err(anyhow::Error::from)
}
