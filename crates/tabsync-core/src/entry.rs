//! Tablist entry model
//!
//! An [`Entry`] describes one row of a player list. Higher layers build
//! entries and pass them by value into [`TabList::add_entry`](crate::TabList::add_entry);
//! afterwards the row is referred to by its UUID alone.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::component::TabComponent;

/// Name of the skin property in a game profile
pub const TEXTURES_PROPERTY: &str = "textures";

/// Kind of tablist mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    AddPlayer,
    RemovePlayer,
    UpdateDisplayName,
    UpdateLatency,
    UpdateGameMode,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddPlayer => write!(f, "add_player"),
            Action::RemovePlayer => write!(f, "remove_player"),
            Action::UpdateDisplayName => write!(f, "update_display_name"),
            Action::UpdateLatency => write!(f, "update_latency"),
            Action::UpdateGameMode => write!(f, "update_game_mode"),
        }
    }
}

/// Game mode shown next to a row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
    NotSet,
}

impl GameMode {
    /// Modes indexed by their protocol code
    pub const BY_ID: [GameMode; 4] = [
        GameMode::Survival,
        GameMode::Creative,
        GameMode::Adventure,
        GameMode::Spectator,
    ];

    /// Map a protocol code; anything outside 0..=3 is `NotSet`
    pub fn from_id(id: i32) -> Self {
        usize::try_from(id)
            .ok()
            .and_then(|index| Self::BY_ID.get(index).copied())
            .unwrap_or(GameMode::NotSet)
    }

    /// Protocol code, `-1` for `NotSet`
    pub fn id(self) -> i32 {
        match self {
            GameMode::Survival => 0,
            GameMode::Creative => 1,
            GameMode::Adventure => 2,
            GameMode::Spectator => 3,
            GameMode::NotSet => -1,
        }
    }
}

/// Skin texture blob with optional signature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skin {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Skin {
    pub fn new(value: impl Into<String>, signature: Option<String>) -> Self {
        Self {
            value: value.into(),
            signature,
        }
    }

    /// The profile property carrying this skin
    pub fn to_property(&self) -> ProfileProperty {
        ProfileProperty {
            name: TEXTURES_PROPERTY.to_string(),
            value: self.value.clone(),
            signature: self.signature.clone(),
        }
    }
}

/// Signed property of a game profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Identity and properties of a row's player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameProfile {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ProfileProperty>,
}

impl GameProfile {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Profile for an entry, with the textures property when it has a skin
    pub fn for_entry(entry: &Entry) -> Self {
        let mut profile = Self::new(entry.unique_id, entry.name.clone());
        if let Some(skin) = &entry.skin {
            profile.properties.push(skin.to_property());
        }
        profile
    }

    pub fn textures(&self) -> Option<&ProfileProperty> {
        self.properties.iter().find(|p| p.name == TEXTURES_PROPERTY)
    }
}

/// One row of a player list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub unique_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<Skin>,
    /// Round trip in milliseconds; negative values pass through untouched
    #[serde(default)]
    pub latency: i32,
    /// Protocol game mode code, see [`GameMode::from_id`]
    #[serde(default)]
    pub game_mode: i32,
    /// `None` lets the scoreboard team prefix/suffix show instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<TabComponent>,
}

impl Entry {
    pub fn new(unique_id: Uuid) -> Self {
        Self {
            unique_id,
            name: String::new(),
            skin: None,
            latency: 0,
            game_mode: 0,
            display_name: None,
        }
    }

    /// Entry carrying only a display name update
    pub fn display_name(unique_id: Uuid, display_name: Option<TabComponent>) -> Self {
        Self {
            display_name,
            ..Self::new(unique_id)
        }
    }

    /// Entry carrying only a latency update
    pub fn latency(unique_id: Uuid, latency: i32) -> Self {
        Self {
            latency,
            ..Self::new(unique_id)
        }
    }

    /// Entry carrying only a game mode update
    pub fn game_mode(unique_id: Uuid, game_mode: i32) -> Self {
        Self {
            game_mode,
            ..Self::new(unique_id)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Some(skin);
        self
    }

    pub fn with_latency(mut self, latency: i32) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_game_mode(mut self, game_mode: i32) -> Self {
        self.game_mode = game_mode;
        self
    }

    pub fn with_display_name(mut self, display_name: TabComponent) -> Self {
        self.display_name = Some(display_name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_mode_mapping() {
        assert_eq!(GameMode::from_id(0), GameMode::Survival);
        assert_eq!(GameMode::from_id(1), GameMode::Creative);
        assert_eq!(GameMode::from_id(2), GameMode::Adventure);
        assert_eq!(GameMode::from_id(3), GameMode::Spectator);
        assert_eq!(GameMode::from_id(4), GameMode::NotSet);
        assert_eq!(GameMode::from_id(7), GameMode::NotSet);
        assert_eq!(GameMode::from_id(-1), GameMode::NotSet);
        assert_eq!(GameMode::from_id(i32::MIN), GameMode::NotSet);
    }

    #[test]
    fn test_game_mode_id() {
        for (code, mode) in GameMode::BY_ID.iter().enumerate() {
            assert_eq!(mode.id(), code as i32);
        }
        assert_eq!(GameMode::NotSet.id(), -1);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::AddPlayer.to_string(), "add_player");
        assert_eq!(Action::UpdateDisplayName.to_string(), "update_display_name");
    }

    #[test]
    fn test_skin_property_keeps_missing_signature() {
        let unsigned = Skin::new("dGV4dHVyZQ==", None).to_property();
        assert_eq!(unsigned.name, "textures");
        assert_eq!(unsigned.signature, None);

        let signed = Skin::new("dGV4dHVyZQ==", Some("c2ln".into())).to_property();
        assert_eq!(signed.signature.as_deref(), Some("c2ln"));
    }

    #[test]
    fn test_profile_for_entry() {
        let id = Uuid::new_v4();
        let bare = GameProfile::for_entry(&Entry::new(id).with_name("alice"));
        assert_eq!(bare.name, "alice");
        assert!(bare.textures().is_none());

        let skinned = GameProfile::for_entry(&Entry::new(id).with_skin(Skin::new("v", None)));
        assert_eq!(skinned.textures().map(|p| p.value.as_str()), Some("v"));
    }

    #[test]
    fn test_partial_entries() {
        let id = Uuid::new_v4();
        let entry = Entry::latency(id, -1);
        assert_eq!(entry.latency, -1);
        assert_eq!(entry.name, "");
        assert!(entry.display_name.is_none());

        let entry = Entry::display_name(id, Some(TabComponent::text("Red")));
        assert_eq!(entry.display_name, Some(TabComponent::text("Red")));
        assert_eq!(Entry::game_mode(id, 3).game_mode, 3);
    }
}
