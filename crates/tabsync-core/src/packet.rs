//! Outbound tablist packets
//!
//! Packet-interception backends expose the packet about to be sent as a
//! mutable view of these structures. Interceptors rewrite per-entry fields in
//! place and never touch the outer action.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::TabComponent;
use crate::entry::{Action, Entry, GameMode, GameProfile};

/// One entry of a player info packet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PacketEntry {
    pub id: Uuid,
    /// Only present on `AddPlayer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<GameProfile>,
    pub game_mode: GameMode,
    pub latency: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<TabComponent>,
}

impl PacketEntry {
    /// Bare entry referring to a row by id
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            profile: None,
            game_mode: GameMode::NotSet,
            latency: 0,
            display_name: None,
        }
    }

    /// Encode the fields of `entry` that `action` carries
    pub fn from_entry(entry: &Entry, action: Action) -> Self {
        let mut packet_entry = Self::new(entry.unique_id);
        match action {
            Action::AddPlayer => {
                packet_entry.profile = Some(GameProfile::for_entry(entry));
                packet_entry.game_mode = GameMode::from_id(entry.game_mode);
                packet_entry.latency = entry.latency;
                packet_entry.display_name = entry.display_name.clone();
            }
            Action::RemovePlayer => {}
            Action::UpdateDisplayName => {
                packet_entry.display_name = entry.display_name.clone();
            }
            Action::UpdateLatency => packet_entry.latency = entry.latency,
            Action::UpdateGameMode => packet_entry.game_mode = GameMode::from_id(entry.game_mode),
        }
        packet_entry
    }
}

/// Player info packet: one action applied to a list of entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerInfoPacket {
    pub action: Action,
    pub entries: Vec<PacketEntry>,
}

impl PlayerInfoPacket {
    pub fn new(action: Action, entries: Vec<PacketEntry>) -> Self {
        Self { action, entries }
    }

    /// Single-entry packet built from an [`Entry`]
    pub fn single(action: Action, entry: &Entry) -> Self {
        Self::new(action, vec![PacketEntry::from_entry(entry, action)])
    }

    /// Removal packet for a batch of rows
    pub fn remove(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self::new(
            Action::RemovePlayer,
            ids.into_iter().map(PacketEntry::new).collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderFooterPacket {
    pub header: TabComponent,
    pub footer: TabComponent,
}

/// Tablist-related packet bound for one viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "packet", rename_all = "snake_case")]
pub enum OutboundPacket {
    PlayerInfo(PlayerInfoPacket),
    HeaderFooter(HeaderFooterPacket),
}

impl OutboundPacket {
    pub fn as_player_info(&self) -> Option<&PlayerInfoPacket> {
        match self {
            OutboundPacket::PlayerInfo(info) => Some(info),
            OutboundPacket::HeaderFooter(_) => None,
        }
    }
}

impl From<PlayerInfoPacket> for OutboundPacket {
    fn from(packet: PlayerInfoPacket) -> Self {
        OutboundPacket::PlayerInfo(packet)
    }
}

impl From<HeaderFooterPacket> for OutboundPacket {
    fn from(packet: HeaderFooterPacket) -> Self {
        OutboundPacket::HeaderFooter(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Skin;

    #[test]
    fn test_add_entry_encoding() {
        let id = Uuid::new_v4();
        let entry = Entry::new(id)
            .with_name("alice")
            .with_skin(Skin::new("v", Some("s".into())))
            .with_latency(-1)
            .with_game_mode(9)
            .with_display_name(TabComponent::text("A"));

        let encoded = PacketEntry::from_entry(&entry, Action::AddPlayer);
        let profile = encoded.profile.as_ref().unwrap();
        assert_eq!(profile.name, "alice");
        assert_eq!(profile.textures().unwrap().signature.as_deref(), Some("s"));
        assert_eq!(encoded.latency, -1);
        assert_eq!(encoded.game_mode, GameMode::NotSet);
        assert_eq!(encoded.display_name, Some(TabComponent::text("A")));
    }

    #[test]
    fn test_update_entries_carry_one_field() {
        let id = Uuid::new_v4();
        let entry = Entry::new(id)
            .with_name("alice")
            .with_latency(42)
            .with_display_name(TabComponent::text("A"));

        let latency = PacketEntry::from_entry(&entry, Action::UpdateLatency);
        assert_eq!(latency.latency, 42);
        assert!(latency.profile.is_none());
        assert!(latency.display_name.is_none());

        let display = PacketEntry::from_entry(&entry, Action::UpdateDisplayName);
        assert_eq!(display.latency, 0);
        assert_eq!(display.display_name, Some(TabComponent::text("A")));
    }

    #[test]
    fn test_remove_packet() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let packet = PlayerInfoPacket::remove(ids);
        assert_eq!(packet.action, Action::RemovePlayer);
        assert_eq!(packet.entries.len(), 2);
        assert_eq!(packet.entries[1].id, ids[1]);
    }

    #[test]
    fn test_packet_serialization_tag() {
        let packet: OutboundPacket = HeaderFooterPacket {
            header: TabComponent::text("h"),
            footer: TabComponent::empty(),
        }
        .into();
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["packet"], "header_footer");
        assert!(packet.as_player_info().is_none());
    }
}
