//! Sync layer configuration
//!
//! - `sync_config`: configuration structure and loading
//! - `defaults`: default configuration values

pub mod defaults;
pub mod sync_config;

pub use sync_config::{PingSpoofConfig, SyncConfig};
