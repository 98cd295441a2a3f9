//! Tabsync Core Library
//!
//! A uniform tablist contract for game-server plugins, with two host
//! adapters and the periodic display-name reconciler. Nothing here depends
//! on a particular server implementation: hosts plug in through the traits
//! in [`entry_api`], [`packet_tablist`] and [`player`].
//!
//! # Modules
//!
//! - [`tablist`] - The `TabList` contract
//! - [`entry_api`] - Adapter for hosts with a direct entry API, with drift repair
//! - [`packet_tablist`] - Adapter for packet-based hosts, with outbound interception
//! - [`reconciler`] - Per-viewer registry and the periodic sweep
//! - [`component`] - Rich text components and host renderers
//! - [`entry`] - Entry model, skins and game modes
//! - [`packet`] - Player-info and header/footer packets
//! - [`expected`] - Expected display-name shadow
//! - [`player`] - Viewer identity, client versions and the player registry
//! - [`memory`] - In-memory hosts for tests and simulation
//! - [`config`] - Configuration
//! - [`error`] - Error types

pub mod component;
pub mod config;
pub mod entry;
pub mod entry_api;
pub mod error;
pub mod expected;
pub mod memory;
pub mod packet;
pub mod packet_tablist;
pub mod player;
pub mod reconciler;
pub mod tablist;

// Re-export commonly used types
pub use component::{
    ChatColor, ComponentRenderer, LegacyTextRenderer, RichComponentRenderer, TabComponent,
    TextHandle,
};
pub use config::{PingSpoofConfig, SyncConfig};
pub use entry::{Action, Entry, GameMode, GameProfile, Skin};
pub use entry_api::{EntryApiTabList, HostEntry, HostTabList};
pub use error::{Result, TabSyncError};
pub use expected::ExpectedNames;
pub use packet::{OutboundPacket, PacketEntry, PlayerInfoPacket};
pub use packet_tablist::{OutboundPipeline, PacketTabList, TabListIntent};
pub use player::{ClientVersion, PlayerRef, PlayerRegistry, ViewerId};
pub use reconciler::Reconciler;
pub use tablist::TabList;
