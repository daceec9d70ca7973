// mosaic-core: Cached display state and command routing on top of mosaic-api.

pub mod command;
pub mod config;
pub mod coordinator;
pub mod discover;
pub mod error;
pub mod snapshot;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Command;
pub use command::requests::*;
pub use config::{CoordinatorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_PORT};
pub use coordinator::Coordinator;
pub use discover::{DEFAULT_CANDIDATES, discover};
pub use error::CoreError;
pub use snapshot::{DisplayStatus, RefreshState, Snapshot};
pub use stream::{SnapshotStream, SnapshotWatchStream};

// Model types callers handle directly.
pub use mosaic_api::{Display, Priority, RegisterDisplay, RotationConfig, ServerStatus, TlsMode};
