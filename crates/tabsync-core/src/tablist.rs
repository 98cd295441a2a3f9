//! The tablist contract consumed by higher layers
//!
//! Every operation is a one-way command against a single viewer's remote
//! player list. Operations are total: absent rows, host rejections and
//! disconnected viewers are absorbed by the implementation.

use uuid::Uuid;

use crate::component::TabComponent;
use crate::entry::Entry;
use crate::packet::OutboundPacket;
use crate::player::ViewerId;

/// One viewer's player list
pub trait TabList: Send + Sync {
    /// Insert a row. Re-adding an existing id must not fail.
    fn add_entry(&self, entry: Entry);

    /// Delete a row; no-op when absent
    fn remove_entry(&self, entry: Uuid);

    /// Change or clear (`None`) the display name of an existing row
    fn update_display_name(&self, entry: Uuid, display_name: Option<&TabComponent>);

    fn update_latency(&self, entry: Uuid, latency: i32);

    /// Codes outside 0..=3 map to "not set"
    fn update_game_mode(&self, entry: Uuid, game_mode: i32);

    /// Both are always present; use [`TabComponent::empty`] for none
    fn set_player_list_header_footer(&self, header: &TabComponent, footer: &TabComponent);

    /// Whether the row is present as far as the backend knows
    fn contains_entry(&self, entry: Uuid) -> bool;

    fn add_entries(&self, entries: Vec<Entry>) {
        for entry in entries {
            self.add_entry(entry);
        }
    }

    fn remove_entries(&self, entries: &[Uuid]) {
        for entry in entries {
            self.remove_entry(*entry);
        }
    }

    /// Repair rows whose display name was replaced by someone else.
    /// Only backends with a direct entry API need this.
    fn check_display_names(&self) {}

    /// Rewrite an outbound packet before it reaches the viewer.
    /// Only packet-interception backends need this.
    fn on_packet_send(&self, _packet: &mut OutboundPacket) {}

    /// Drop per-player state after `player` disconnected
    fn forget_viewer(&self, _player: ViewerId) {}
}

/// Debug message for a row found with a foreign display name
pub(crate) fn display_name_wrong(player: &str, viewer: &str) {
    tracing::debug!(
        player,
        viewer,
        "TabList entry of player {} has a different display name for viewer {} than expected, fixing.",
        player,
        viewer
    );
}
