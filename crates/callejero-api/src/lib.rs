// callejero-api: Async Rust client for the callejero street-directory REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::CallejeroClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{Municipality, Province, Region, Street};
