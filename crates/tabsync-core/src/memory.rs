//! In-memory host collaborators
//!
//! Simple implementations of the host-side traits for tests, simulations and
//! embedding without a real game server. [`MemoryTabList`] applies calls like
//! a real entry API would and keeps a log of every call that took effect.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Weak;
use uuid::Uuid;

use crate::component::{TabComponent, TextHandle};
use crate::entry::GameMode;
use crate::entry_api::{HostEntry, HostTabList};
use crate::error::{Result, TabSyncError};
use crate::packet::OutboundPacket;
use crate::packet_tablist::{OutboundPipeline, TabListIntent};
use crate::player::{PlayerRef, PlayerRegistry, ViewerId};
use crate::tablist::TabList;

/// Host call that changed the in-memory tablist
#[derive(Debug, Clone)]
pub enum HostCall<T> {
    Add {
        id: Uuid,
        display_name: Option<TextHandle<T>>,
    },
    Remove {
        id: Uuid,
    },
    SetDisplayName {
        id: Uuid,
        display_name: Option<TextHandle<T>>,
    },
    SetLatency {
        id: Uuid,
        latency: i32,
    },
    SetGameMode {
        id: Uuid,
        game_mode: GameMode,
    },
    SetHeaderFooter,
}

#[derive(Debug)]
struct HostState<T> {
    entries: HashMap<Uuid, HostEntry<T>>,
    header_footer: Option<(TextHandle<T>, TextHandle<T>)>,
    calls: Vec<HostCall<T>>,
    reject_adds: bool,
    connected: bool,
}

/// A viewer's tablist held in memory
#[derive(Debug)]
pub struct MemoryTabList<T> {
    state: Mutex<HostState<T>>,
}

impl<T> Default for MemoryTabList<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(HostState {
                entries: HashMap::new(),
                header_footer: None,
                calls: Vec::new(),
                reject_adds: false,
                connected: true,
            }),
        }
    }
}

impl<T: Clone> MemoryTabList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls that took effect, oldest first
    pub fn calls(&self) -> Vec<HostCall<T>> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of display name writes since the log was last cleared
    pub fn display_name_writes(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::SetDisplayName { .. }))
            .count()
    }

    pub fn entry(&self, id: Uuid) -> Option<HostEntry<T>> {
        self.state.lock().entries.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn header_footer(&self) -> Option<(TextHandle<T>, TextHandle<T>)> {
        self.state.lock().header_footer.clone()
    }

    /// Make subsequent adds fail like a host refusing the entry
    pub fn reject_adds(&self, reject: bool) {
        self.state.lock().reject_adds = reject;
    }

    /// Viewer left: rows vanish and every later call is ignored
    pub fn disconnect(&self) {
        let mut state = self.state.lock();
        state.connected = false;
        state.entries.clear();
    }

    /// Another plugin replacing a display name behind our back (not logged)
    pub fn override_display_name(&self, id: Uuid, display_name: Option<T>) -> bool {
        let mut state = self.state.lock();
        match state.entries.get_mut(&id) {
            Some(entry) => {
                entry.display_name = display_name.map(TextHandle::new);
                true
            }
            None => false,
        }
    }

    /// Row added by the host itself (not logged)
    pub fn insert_foreign(&self, entry: HostEntry<T>) {
        let mut state = self.state.lock();
        if state.connected {
            state.entries.insert(entry.profile.id, entry);
        }
    }

    fn update(&self, id: Uuid, call: HostCall<T>, apply: impl FnOnce(&mut HostEntry<T>)) -> bool {
        let mut state = self.state.lock();
        let Some(entry) = state.entries.get_mut(&id) else {
            return false;
        };
        apply(entry);
        state.calls.push(call);
        true
    }
}

impl<T: Clone + Send + Sync + 'static> HostTabList for MemoryTabList<T> {
    type Text = T;

    fn add_entry(&self, entry: HostEntry<T>) -> Result<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(TabSyncError::ViewerGone);
        }
        if state.reject_adds {
            return Err(TabSyncError::BackendRejection(format!(
                "entry {} refused",
                entry.profile.id
            )));
        }
        let id = entry.profile.id;
        state.calls.push(HostCall::Add {
            id,
            display_name: entry.display_name.clone(),
        });
        state.entries.insert(id, entry);
        Ok(())
    }

    fn remove_entry(&self, id: Uuid) -> bool {
        let mut state = self.state.lock();
        if state.entries.remove(&id).is_none() {
            return false;
        }
        state.calls.push(HostCall::Remove { id });
        true
    }

    fn contains_entry(&self, id: Uuid) -> bool {
        self.state.lock().entries.contains_key(&id)
    }

    fn display_name(&self, id: Uuid) -> Option<Option<TextHandle<T>>> {
        self.state
            .lock()
            .entries
            .get(&id)
            .map(|entry| entry.display_name.clone())
    }

    fn set_display_name(&self, id: Uuid, display_name: Option<TextHandle<T>>) -> bool {
        let call = HostCall::SetDisplayName {
            id,
            display_name: display_name.clone(),
        };
        self.update(id, call, |entry| entry.display_name = display_name)
    }

    fn set_latency(&self, id: Uuid, latency: i32) -> bool {
        self.update(id, HostCall::SetLatency { id, latency }, |entry| {
            entry.latency = latency
        })
    }

    fn set_game_mode(&self, id: Uuid, game_mode: GameMode) -> bool {
        self.update(id, HostCall::SetGameMode { id, game_mode }, |entry| {
            entry.game_mode = game_mode
        })
    }

    fn set_header_and_footer(&self, header: TextHandle<T>, footer: TextHandle<T>) {
        let mut state = self.state.lock();
        if !state.connected {
            return;
        }
        state.header_footer = Some((header, footer));
        state.calls.push(HostCall::SetHeaderFooter);
    }
}

/// Connected players, in join order
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    players: Mutex<Vec<PlayerRef>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, replacing any earlier record with the same id
    pub fn join(&self, player: PlayerRef) {
        let mut players = self.players.lock();
        players.retain(|p| p.id != player.id);
        players.push(player);
    }

    pub fn leave(&self, id: &ViewerId) -> Option<PlayerRef> {
        let mut players = self.players.lock();
        let index = players.iter().position(|p| p.id == *id)?;
        Some(players.remove(index))
    }

    pub fn len(&self) -> usize {
        self.players.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.lock().is_empty()
    }
}

impl PlayerRegistry for MemoryRegistry {
    fn online_players(&self) -> Vec<PlayerRef> {
        self.players.lock().clone()
    }

    fn player_by_tablist_id(&self, tablist_id: Uuid) -> Option<PlayerRef> {
        self.players
            .lock()
            .iter()
            .find(|p| p.tablist_id == tablist_id)
            .cloned()
    }
}

/// Outbound pipeline that keeps every packet it was asked to send.
///
/// A viewer's tablist can be registered as interceptor; its
/// [`TabList::on_packet_send`] then runs on every packet bound for that
/// viewer before the packet is recorded, the way a host pipeline calls it.
#[derive(Debug, Default)]
pub struct MemoryPipeline {
    sent: Mutex<Vec<(ViewerId, OutboundPacket)>>,
    interceptors: Mutex<HashMap<ViewerId, Weak<dyn TabList>>>,
}

impl MemoryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `tablist`'s interceptor on every packet sent to `viewer`
    pub fn intercept_with(&self, viewer: ViewerId, tablist: Weak<dyn TabList>) {
        self.interceptors.lock().insert(viewer, tablist);
    }

    pub fn sent(&self) -> Vec<(ViewerId, OutboundPacket)> {
        self.sent.lock().clone()
    }

    pub fn packets_for(&self, viewer: ViewerId) -> Vec<OutboundPacket> {
        self.sent
            .lock()
            .iter()
            .filter(|(v, _)| *v == viewer)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl OutboundPipeline for MemoryPipeline {
    fn send(&self, viewer: ViewerId, mut packet: OutboundPacket) {
        let interceptor = self
            .interceptors
            .lock()
            .get(&viewer)
            .and_then(Weak::upgrade);
        if let Some(tablist) = interceptor {
            tablist.on_packet_send(&mut packet);
        }
        self.sent.lock().push((viewer, packet));
    }
}

/// Higher-layer intent held in maps
#[derive(Debug, Default)]
pub struct MemoryIntent {
    display_names: Mutex<HashMap<(ViewerId, ViewerId), Option<TabComponent>>>,
    nicknames: Mutex<HashMap<Uuid, String>>,
}

impl MemoryIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name `viewer` should see on `target`'s row
    pub fn set_display_name(
        &self,
        viewer: ViewerId,
        target: ViewerId,
        display_name: Option<TabComponent>,
    ) {
        self.display_names
            .lock()
            .insert((viewer, target), display_name);
    }

    pub fn set_nickname(&self, tablist_id: Uuid, nickname: impl Into<String>) {
        self.nicknames.lock().insert(tablist_id, nickname.into());
    }

    pub fn clear_nickname(&self, tablist_id: Uuid) {
        self.nicknames.lock().remove(&tablist_id);
    }
}

impl TabListIntent for MemoryIntent {
    fn display_name(&self, viewer: &PlayerRef, target: &PlayerRef) -> Option<Option<TabComponent>> {
        self.display_names
            .lock()
            .get(&(viewer.id, target.id))
            .cloned()
    }

    fn nickname(&self, target: &PlayerRef) -> Option<String> {
        self.nicknames.lock().get(&target.tablist_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::GameProfile;
    use crate::player::ClientVersion;

    fn host_entry(id: Uuid) -> HostEntry<String> {
        HostEntry {
            profile: GameProfile::new(id, "alice"),
            latency: 0,
            game_mode: GameMode::Survival,
            display_name: None,
        }
    }

    #[test]
    fn test_memory_tablist_logs_effective_calls() {
        let host: MemoryTabList<String> = MemoryTabList::new();
        let id = Uuid::new_v4();

        assert!(!host.set_latency(id, 5));
        host.add_entry(host_entry(id)).unwrap();
        assert!(host.set_latency(id, 5));
        assert!(host.remove_entry(id));
        assert!(!host.remove_entry(id));

        assert_eq!(host.calls().len(), 3);
        assert!(host.is_empty());
    }

    #[test]
    fn test_override_is_not_logged() {
        let host: MemoryTabList<String> = MemoryTabList::new();
        let id = Uuid::new_v4();
        host.add_entry(host_entry(id)).unwrap();
        host.clear_calls();

        assert!(host.override_display_name(id, Some("x".to_string())));
        assert!(host.calls().is_empty());
        assert_eq!(
            host.display_name(id).flatten().map(|t| (*t).clone()),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_disconnected_host() {
        let host: MemoryTabList<String> = MemoryTabList::new();
        let id = Uuid::new_v4();
        host.add_entry(host_entry(id)).unwrap();
        host.disconnect();

        assert_eq!(host.add_entry(host_entry(id)), Err(TabSyncError::ViewerGone));
        assert!(!host.contains_entry(id));
        host.set_header_and_footer(TextHandle::new("h".into()), TextHandle::new("f".into()));
        assert!(host.header_footer().is_none());
    }

    #[test]
    fn test_registry() {
        let registry = MemoryRegistry::new();
        let id = Uuid::new_v4();
        let tablist_id = Uuid::new_v4();
        registry.join(PlayerRef::new(id, "alice", ClientVersion::new(20, 4)).with_tablist_id(tablist_id));
        registry.join(PlayerRef::new(id, "alice2", ClientVersion::new(20, 4)));

        assert_eq!(registry.len(), 1);
        assert!(registry.player_by_tablist_id(tablist_id).is_none());
        assert_eq!(registry.player_by_tablist_id(id).unwrap().name, "alice2");
        assert!(registry.leave(&ViewerId(id)).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pipeline_per_viewer() {
        let pipeline = MemoryPipeline::new();
        let a = ViewerId(Uuid::new_v4());
        let b = ViewerId(Uuid::new_v4());
        let packet = OutboundPacket::PlayerInfo(crate::packet::PlayerInfoPacket::remove([]));
        pipeline.send(a, packet.clone());
        pipeline.send(b, packet.clone());
        pipeline.send(a, packet);

        assert_eq!(pipeline.packets_for(a).len(), 2);
        pipeline.clear();
        assert!(pipeline.sent().is_empty());
    }
}
