// mosaic-api: Async Rust client for the Mosaic LED-matrix display service

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod displays;
mod notify;
mod rotation;
mod system;

pub use client::MosaicClient;
pub use error::Error;
pub use models::{
    Display, ImageNotification, Priority, RegisterDisplay, RotationConfig, ServerStatus,
    TextNotification,
};
pub use transport::{REQUEST_TIMEOUT, TlsMode, TransportConfig};
