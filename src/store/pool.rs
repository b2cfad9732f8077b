use std::sync::Mutex;
use tokio::sync::Semaphore;
use tokio::sync::SemaphorePermit;
use tokio_postgres::Client;
use tokio_postgres::NoTls;

/// A bounded pool of live `tokio_postgres::Client` connections.
///
/// The source shares one `Arc<Client>` across its worker pool because a
/// training run is a handful of long-lived tasks; this backend instead
/// serves many short HTTP requests that each want their own transaction, so
/// checkout is gated by a permit the way the source gates worker
/// concurrency in `workers::pool` — one permit per live connection, handed
/// out for the lifetime of a single request's transaction and returned to
/// the free list when the `Checkout` guard drops.
pub struct Pool {
    free: Mutex<Vec<Client>>,
    permits: Semaphore,
    capacity: usize,
}

pub struct Checkout<'a> {
    client: Option<Client>,
    pool: &'a Pool,
    _permit: SemaphorePermit<'a>,
}

impl std::ops::Deref for Checkout<'_> {
    type Target = Client;
    fn deref(&self) -> &Client {
        self.client.as_ref().expect("checkout holds its client until drop")
    }
}

impl std::ops::DerefMut for Checkout<'_> {
    fn deref_mut(&mut self) -> &mut Client {
        self.client.as_mut().expect("checkout holds its client until drop")
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            self.pool.free.lock().unwrap().push(client);
        }
    }
}

impl Pool {
    /// Opens `size` connections to `db_url`, spawning one connection task per client.
    pub async fn connect(db_url: &str, size: usize) -> anyhow::Result<Self> {
        let mut clients = Vec::with_capacity(size);
        for _ in 0..size {
            let (client, connection) = tokio_postgres::connect(db_url, NoTls).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    log::warn!("postgres connection task ended: {e}");
                }
            });
            clients.push(client);
        }
        Ok(Self {
            permits: Semaphore::new(clients.len()),
            capacity: clients.len(),
            free: Mutex::new(clients),
        })
    }

    /// Checks out a connection, suspending until one is free.
    pub async fn checkout(&self) -> Checkout<'_> {
        let permit = self
            .permits
            .acquire()
            .await
            .expect("pool semaphore is never closed");
        let client = self
            .free
            .lock()
            .unwrap()
            .pop()
            .expect("a free permit implies a free connection");
        Checkout {
            client: Some(client),
            pool: self,
            _permit: permit,
        }
    }

    pub fn size(&self) -> usize {
        self.capacity
    }
}
