//! Client side of the task API: HTTP wrapper, in-memory board state with
//! optimistic mutations, and a durable read-fallback snapshot.

pub mod api;
pub mod cache;
pub mod state;

pub use api::TaskApi;
pub use cache::SnapshotCache;
pub use state::TaskBoard;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, DNS, or timeout failure before an HTTP status arrived.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}
