use super::Store;
use std::sync::Arc;
use tokio::sync::watch;

/// Periodic sweep of stale rooms. Mirrors the source's habit of spawning a
/// long-lived `tokio::spawn`ed task off of `main` (see its training loop)
/// but adds a cooperative stop signal, since a classroom backend is expected
/// to shut down cleanly between sessions rather than run forever.
pub struct Cleanup {
    stop: watch::Sender<bool>,
}

impl Cleanup {
    /// Spawns the sweep loop and returns a handle that stops it on drop.
    pub fn spawn(store: Arc<dyn Store>, interval: std::time::Duration) -> Self {
        let (stop, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match store
                            .sweep_stale_rooms(crate::FINISHED_ROOM_TTL, crate::IDLE_ROOM_TTL)
                            .await
                        {
                            Ok(0) => {}
                            Ok(n) => log::info!("cleanup swept {n} stale room(s)"),
                            Err(e) => log::warn!("cleanup sweep failed: {e}"),
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
        });
        Self { stop }
    }

    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}
