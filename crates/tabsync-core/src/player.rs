//! Viewer identity and the player registry collaborator

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a connected player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ViewerId(pub Uuid);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game client version as `1.<minor>.<patch>`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientVersion {
    pub minor: u8,
    pub patch: u8,
}

impl ClientVersion {
    pub const fn new(minor: u8, patch: u8) -> Self {
        Self { minor, patch }
    }

    /// 1.8 clients ignore the display name sent with the initial add
    pub fn has_display_name_add_bug(self) -> bool {
        self.minor == 8
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1.{}.{}", self.minor, self.patch)
    }
}

/// A player as seen by the sync layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: ViewerId,
    /// UUID of this player's row in other players' tablists
    pub tablist_id: Uuid,
    pub name: String,
    pub version: ClientVersion,
}

impl PlayerRef {
    /// Player whose tablist row uses their own UUID
    pub fn new(id: Uuid, name: impl Into<String>, version: ClientVersion) -> Self {
        Self {
            id: ViewerId(id),
            tablist_id: id,
            name: name.into(),
            version,
        }
    }

    pub fn with_tablist_id(mut self, tablist_id: Uuid) -> Self {
        self.tablist_id = tablist_id;
        self
    }
}

/// Player discovery provided by the host integration
pub trait PlayerRegistry: Send + Sync {
    /// Snapshot of currently connected players
    fn online_players(&self) -> Vec<PlayerRef>;

    /// Resolve a tablist row UUID to the player it belongs to
    fn player_by_tablist_id(&self, tablist_id: Uuid) -> Option<PlayerRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_version() {
        assert!(ClientVersion::new(8, 9).has_display_name_add_bug());
        assert!(!ClientVersion::new(7, 10).has_display_name_add_bug());
        assert!(!ClientVersion::new(20, 4).has_display_name_add_bug());
        assert_eq!(ClientVersion::new(8, 9).to_string(), "1.8.9");
    }

    #[test]
    fn test_player_ref_tablist_id() {
        let id = Uuid::new_v4();
        let player = PlayerRef::new(id, "alice", ClientVersion::new(20, 1));
        assert_eq!(player.tablist_id, id);
        assert_eq!(player.id, ViewerId(id));

        let other = Uuid::new_v4();
        assert_eq!(player.with_tablist_id(other).tablist_id, other);
    }

    #[test]
    fn test_viewer_id_serde() {
        let id = Uuid::nil();
        let json = serde_json::to_string(&ViewerId(id)).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
