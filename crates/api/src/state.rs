use std::sync::Arc;

use crate::background::media::MediaQueue;
use crate::config::ServerConfig;
use crate::storage::ObjectStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rise_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage for uploaded files and thumbnails.
    pub storage: Arc<dyn ObjectStore>,
    /// Sending half of the media processing queue.
    pub media_queue: MediaQueue,
}
