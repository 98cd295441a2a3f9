//! Tablist adapter for hosts without a tablist API
//!
//! Writes are composed into player info packets and handed to the host's
//! outbound pipeline. The host in turn calls [`TabList::on_packet_send`] for
//! every tablist packet bound for the viewer, ours and everyone else's, which
//! is where anti-override, ping spoofing and nickname compatibility happen.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::component::TabComponent;
use crate::config::SyncConfig;
use crate::entry::{Action, Entry};
use crate::expected::ExpectedNames;
use crate::packet::{HeaderFooterPacket, OutboundPacket, PacketEntry, PlayerInfoPacket};
use crate::player::{PlayerRef, PlayerRegistry, ViewerId};
use crate::tablist::TabList;

/// The host's send path toward one or more viewers
pub trait OutboundPipeline: Send + Sync {
    fn send(&self, viewer: ViewerId, packet: OutboundPacket);
}

/// What higher layers want each row to look like
pub trait TabListIntent: Send + Sync {
    /// Display name `viewer` should see on `target`'s row, if the higher
    /// layer has an opinion
    fn display_name(&self, _viewer: &PlayerRef, _target: &PlayerRef) -> Option<Option<TabComponent>> {
        None
    }

    /// Nickname `target` currently goes by
    fn nickname(&self, _target: &PlayerRef) -> Option<String> {
        None
    }
}

/// [`TabList`] that speaks packets and polices outbound ones
pub struct PacketTabList<P: OutboundPipeline> {
    viewer: PlayerRef,
    pipeline: Arc<P>,
    registry: Arc<dyn PlayerRegistry>,
    intent: Option<Arc<dyn TabListIntent>>,
    anti_override: bool,
    ping_spoof: Option<i32>,
    nick_compat: bool,
    expected: ExpectedNames<TabComponent>,
    rows: Mutex<HashSet<Uuid>>,
}

impl<P: OutboundPipeline> PacketTabList<P> {
    pub fn new(
        viewer: PlayerRef,
        pipeline: Arc<P>,
        registry: Arc<dyn PlayerRegistry>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            viewer,
            pipeline,
            registry,
            intent: None,
            anti_override: config.anti_override,
            ping_spoof: config.spoofed_latency(),
            nick_compat: config.nick_compat,
            expected: ExpectedNames::new(),
            rows: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_intent(mut self, intent: Arc<dyn TabListIntent>) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn viewer(&self) -> &PlayerRef {
        &self.viewer
    }

    pub fn expected_display_name(&self, player: &ViewerId) -> Option<Option<TabComponent>> {
        self.expected.get(player)
    }

    fn send(&self, packet: impl Into<OutboundPacket>) {
        self.pipeline.send(self.viewer.id, packet.into());
    }

    fn set_expected_display_name(&self, entry: Uuid, display_name: Option<TabComponent>) {
        if let Some(player) = self.registry.player_by_tablist_id(entry) {
            self.expected.record(player.id, display_name);
        }
    }

    fn intended_display_name(&self, target: &PlayerRef) -> Option<Option<TabComponent>> {
        self.intent
            .as_ref()
            .and_then(|intent| intent.display_name(&self.viewer, target))
            .or_else(|| self.expected.get(&target.id))
    }

    fn enforce_display_name(&self, target: &PlayerRef, entry: &mut PacketEntry) {
        let Some(intended) = self.intended_display_name(target) else {
            return;
        };
        if entry.display_name != intended {
            debug!(
                viewer = %self.viewer.name,
                player = %target.name,
                "Rewriting overridden display name in outbound packet"
            );
            entry.display_name = intended.clone();
        }
        self.expected.record(target.id, intended);
    }

    fn enforce_nickname(&self, target: &PlayerRef, entry: &mut PacketEntry) {
        let Some(nickname) = self.intent.as_ref().and_then(|i| i.nickname(target)) else {
            return;
        };
        if let Some(profile) = entry.profile.as_mut() {
            if profile.name != nickname {
                debug!(player = %target.name, nickname = %nickname, "Rewriting profile name");
                profile.name = nickname;
            }
        }
    }

    fn track_rows(&self, packet: &PlayerInfoPacket) {
        let mut rows = self.rows.lock();
        match packet.action {
            Action::AddPlayer => rows.extend(packet.entries.iter().map(|e| e.id)),
            Action::RemovePlayer => {
                for entry in &packet.entries {
                    rows.remove(&entry.id);
                }
            }
            _ => {}
        }
    }
}

impl<P: OutboundPipeline> TabList for PacketTabList<P> {
    fn add_entry(&self, entry: Entry) {
        self.add_entries(vec![entry]);
    }

    fn add_entries(&self, entries: Vec<Entry>) {
        if entries.is_empty() {
            return;
        }
        {
            let mut rows = self.rows.lock();
            rows.extend(entries.iter().map(|e| e.unique_id));
        }
        for entry in &entries {
            self.set_expected_display_name(entry.unique_id, entry.display_name.clone());
        }
        let add = entries
            .iter()
            .map(|e| PacketEntry::from_entry(e, Action::AddPlayer))
            .collect();
        self.send(PlayerInfoPacket::new(Action::AddPlayer, add));

        if self.viewer.version.has_display_name_add_bug() {
            // 1.8.0 clients drop the display name sent with the add
            let replay = entries
                .iter()
                .map(|e| PacketEntry::from_entry(e, Action::UpdateDisplayName))
                .collect();
            self.send(PlayerInfoPacket::new(Action::UpdateDisplayName, replay));
        }
    }

    fn remove_entry(&self, entry: Uuid) {
        self.remove_entries(&[entry]);
    }

    fn remove_entries(&self, entries: &[Uuid]) {
        let present: Vec<Uuid> = {
            let mut rows = self.rows.lock();
            entries.iter().copied().filter(|id| rows.remove(id)).collect()
        };
        if !present.is_empty() {
            self.send(PlayerInfoPacket::remove(present));
        }
    }

    fn update_display_name(&self, entry: Uuid, display_name: Option<&TabComponent>) {
        if !self.contains_entry(entry) {
            return;
        }
        let update = Entry::display_name(entry, display_name.cloned());
        // The pipeline may run on_packet_send inline, which enforces the shadow
        self.set_expected_display_name(entry, update.display_name.clone());
        self.send(PlayerInfoPacket::single(Action::UpdateDisplayName, &update));
    }

    fn update_latency(&self, entry: Uuid, latency: i32) {
        if self.contains_entry(entry) {
            self.send(PlayerInfoPacket::single(
                Action::UpdateLatency,
                &Entry::latency(entry, latency),
            ));
        }
    }

    fn update_game_mode(&self, entry: Uuid, game_mode: i32) {
        if self.contains_entry(entry) {
            self.send(PlayerInfoPacket::single(
                Action::UpdateGameMode,
                &Entry::game_mode(entry, game_mode),
            ));
        }
    }

    fn set_player_list_header_footer(&self, header: &TabComponent, footer: &TabComponent) {
        self.send(HeaderFooterPacket {
            header: header.clone(),
            footer: footer.clone(),
        });
    }

    fn contains_entry(&self, entry: Uuid) -> bool {
        self.rows.lock().contains(&entry)
    }

    fn on_packet_send(&self, packet: &mut OutboundPacket) {
        let OutboundPacket::PlayerInfo(info) = packet else {
            return;
        };
        self.track_rows(info);

        let action = info.action;
        let rewrite_names =
            self.anti_override && matches!(action, Action::AddPlayer | Action::UpdateDisplayName);
        let spoofed_latency = self
            .ping_spoof
            .filter(|_| matches!(action, Action::AddPlayer | Action::UpdateLatency));
        let rewrite_nicks = self.nick_compat && action == Action::AddPlayer;
        if !rewrite_names && spoofed_latency.is_none() && !rewrite_nicks {
            return;
        }

        for entry in &mut info.entries {
            if let Some(latency) = spoofed_latency {
                entry.latency = latency;
            }
            if !rewrite_names && !rewrite_nicks {
                continue;
            }
            let Some(target) = self.registry.player_by_tablist_id(entry.id) else {
                continue;
            };
            if rewrite_names {
                self.enforce_display_name(&target, entry);
            }
            if rewrite_nicks {
                self.enforce_nickname(&target, entry);
            }
        }
    }

    fn forget_viewer(&self, player: ViewerId) {
        self.expected.forget(&player);
    }
}
