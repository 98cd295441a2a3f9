//! Tablist adapter for hosts with a direct entry API
//!
//! The host lets us look up, add, mutate and remove rows of a viewer's
//! player list. Each contract call maps to at most one host call (plus the
//! 1.8 display-name replay). Because another plugin on the same host can
//! overwrite a row's display name at any time, the adapter remembers which
//! text object it set and a periodic sweep puts it back.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::component::{same_text, ComponentRenderer, TabComponent, TextHandle};
use crate::entry::{Entry, GameMode, GameProfile};
use crate::error::Result;
use crate::expected::ExpectedNames;
use crate::player::{PlayerRef, PlayerRegistry, ViewerId};
use crate::tablist::{display_name_wrong, TabList};

/// Row handed to the host on add
#[derive(Debug, Clone)]
pub struct HostEntry<T> {
    pub profile: GameProfile,
    pub latency: i32,
    pub game_mode: GameMode,
    pub display_name: Option<TextHandle<T>>,
}

/// A viewer's player list as exposed by the host.
///
/// Setters return `false` when the row does not exist.
pub trait HostTabList: Send + Sync {
    /// Host-native text type
    type Text: Send + Sync + 'static;

    fn add_entry(&self, entry: HostEntry<Self::Text>) -> Result<()>;

    fn remove_entry(&self, id: Uuid) -> bool;

    fn contains_entry(&self, id: Uuid) -> bool;

    /// `None` when the row is absent, `Some(None)` when it has no display name
    fn display_name(&self, id: Uuid) -> Option<Option<TextHandle<Self::Text>>>;

    fn set_display_name(&self, id: Uuid, display_name: Option<TextHandle<Self::Text>>) -> bool;

    fn set_latency(&self, id: Uuid, latency: i32) -> bool;

    fn set_game_mode(&self, id: Uuid, game_mode: GameMode) -> bool;

    fn set_header_and_footer(&self, header: TextHandle<Self::Text>, footer: TextHandle<Self::Text>);
}

/// [`TabList`] over a [`HostTabList`], with display-name drift repair
pub struct EntryApiTabList<H, R>
where
    H: HostTabList,
    R: ComponentRenderer<Output = H::Text>,
{
    viewer: PlayerRef,
    host: Arc<H>,
    renderer: R,
    registry: Arc<dyn PlayerRegistry>,
    expected: ExpectedNames<TextHandle<H::Text>>,
}

impl<H, R> EntryApiTabList<H, R>
where
    H: HostTabList,
    R: ComponentRenderer<Output = H::Text>,
{
    pub fn new(
        viewer: PlayerRef,
        host: Arc<H>,
        renderer: R,
        registry: Arc<dyn PlayerRegistry>,
    ) -> Self {
        Self {
            viewer,
            host,
            renderer,
            registry,
            expected: ExpectedNames::new(),
        }
    }

    pub fn viewer(&self) -> &PlayerRef {
        &self.viewer
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Display name last set for `player`'s row
    pub fn expected_display_name(&self, player: &ViewerId) -> Option<Option<TextHandle<H::Text>>> {
        self.expected.get(player)
    }

    /// Number of players with a remembered display name
    pub fn tracked_players(&self) -> usize {
        self.expected.len()
    }

    fn render(&self, component: &TabComponent) -> Option<TextHandle<H::Text>> {
        match self.renderer.render(component, self.viewer.version) {
            Some(text) => Some(TextHandle::new(text)),
            None => {
                debug!(viewer = %self.viewer.name, "Display name could not be rendered, using none");
                None
            }
        }
    }

    fn render_optional(&self, component: Option<&TabComponent>) -> Option<TextHandle<H::Text>> {
        component.and_then(|c| self.render(c))
    }

    fn set_expected_display_name(&self, entry: Uuid, display_name: Option<TextHandle<H::Text>>) {
        if let Some(player) = self.registry.player_by_tablist_id(entry) {
            self.expected.record(player.id, display_name);
        }
    }
}

impl<H, R> TabList for EntryApiTabList<H, R>
where
    H: HostTabList,
    R: ComponentRenderer<Output = H::Text>,
{
    fn add_entry(&self, entry: Entry) {
        let display_name = self.render_optional(entry.display_name.as_ref());
        let host_entry = HostEntry {
            profile: GameProfile::for_entry(&entry),
            latency: entry.latency,
            game_mode: GameMode::from_id(entry.game_mode),
            display_name: display_name.clone(),
        };
        if let Err(e) = self.host.add_entry(host_entry) {
            debug!(
                viewer = %self.viewer.name,
                entry = %entry.unique_id,
                "Failed to add tablist entry: {}",
                e
            );
            return;
        }
        self.set_expected_display_name(entry.unique_id, display_name.clone());

        if self.viewer.version.has_display_name_add_bug() {
            // 1.8.0 clients drop the display name sent with the add
            self.host.set_display_name(entry.unique_id, display_name);
        }
    }

    fn remove_entry(&self, entry: Uuid) {
        self.host.remove_entry(entry);
    }

    fn update_display_name(&self, entry: Uuid, display_name: Option<&TabComponent>) {
        if !self.host.contains_entry(entry) {
            return;
        }
        let rendered = self.render_optional(display_name);
        if self.host.set_display_name(entry, rendered.clone()) {
            self.set_expected_display_name(entry, rendered);
        }
    }

    fn update_latency(&self, entry: Uuid, latency: i32) {
        self.host.set_latency(entry, latency);
    }

    fn update_game_mode(&self, entry: Uuid, game_mode: i32) {
        self.host.set_game_mode(entry, GameMode::from_id(game_mode));
    }

    fn set_player_list_header_footer(&self, header: &TabComponent, footer: &TabComponent) {
        let (Some(header), Some(footer)) = (self.render(header), self.render(footer)) else {
            return;
        };
        self.host.set_header_and_footer(header, footer);
    }

    fn contains_entry(&self, entry: Uuid) -> bool {
        self.host.contains_entry(entry)
    }

    fn check_display_names(&self) {
        for target in self.registry.online_players() {
            let Some(actual) = self.host.display_name(target.tablist_id) else {
                continue;
            };
            let Some(expected) = self.expected.get(&target.id) else {
                continue;
            };
            if !same_text(actual.as_ref(), expected.as_ref()) {
                display_name_wrong(&target.name, &self.viewer.name);
                self.host.set_display_name(target.tablist_id, expected);
            }
        }
    }

    fn forget_viewer(&self, player: ViewerId) {
        self.expected.forget(&player);
    }
}
