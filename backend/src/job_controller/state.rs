//! Shared application state handed to every HTTP handler.
//!
//! The job store is synchronous and owns a single SQLite connection, so it sits
//! behind one async mutex. Each request holds the lock for the duration of one
//! store operation and never across an `.await` on the network.

use crate::storage::KeyValueStore;
use crate::store::JobStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Job store over whichever substrate the server was started with.
pub type SharedStore = JobStore<Box<dyn KeyValueStore + Send>>;

/// A thread-safe, shareable handle to the job store.
///
/// Created in `main.rs` and injected into the Actix application as `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SharedStore>>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
