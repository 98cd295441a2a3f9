//! Simulated server with a rogue display-name plugin

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tabsync_core::memory::{MemoryIntent, MemoryPipeline, MemoryRegistry, MemoryTabList};
use tabsync_core::{
    Action, ChatColor, ClientVersion, Entry, EntryApiTabList, HostTabList, LegacyTextRenderer,
    OutboundPacket, PacketEntry, PacketTabList, PlayerInfoPacket, PlayerRef, PlayerRegistry,
    Reconciler, Result, SyncConfig, TabComponent, TabList, TabListIntent, TabSyncError,
};
use tracing::{debug, info};
use uuid::Uuid;

const COLORS: [ChatColor; 4] = [
    ChatColor::Red,
    ChatColor::Aqua,
    ChatColor::Gold,
    ChatColor::Green,
];

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub players: usize,
    pub ticks: u32,
}

/// Outcome of the packet-interception pass
#[derive(Debug, Clone, Serialize)]
pub struct InterceptionReport {
    pub original_display_name: String,
    pub sent_display_name: Option<String>,
    pub original_latency: i32,
    pub sent_latency: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub viewers: usize,
    pub legacy_viewers: usize,
    pub rows: usize,
    pub overrides: u32,
    pub repairs: usize,
    pub drifted_rows: usize,
    pub interception: InterceptionReport,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "viewers:      {} ({} on 1.8)",
            self.viewers, self.legacy_viewers
        )?;
        writeln!(f, "rows:         {}", self.rows)?;
        writeln!(f, "overrides:    {}", self.overrides)?;
        writeln!(f, "repairs:      {}", self.repairs)?;
        writeln!(f, "drifted rows: {}", self.drifted_rows)?;
        writeln!(
            f,
            "interception: {:?} -> {:?}, latency {} -> {}",
            self.interception.original_display_name,
            self.interception.sent_display_name.as_deref().unwrap_or(""),
            self.interception.original_latency,
            self.interception.sent_latency
        )
    }
}

type Viewer = (
    PlayerRef,
    Arc<MemoryTabList<String>>,
    Arc<EntryApiTabList<MemoryTabList<String>, LegacyTextRenderer>>,
);

fn display_name(player: &PlayerRef, index: usize) -> TabComponent {
    TabComponent::text(player.name.clone()).with_color(COLORS[index % COLORS.len()])
}

/// Run the simulation to completion
pub async fn run(options: &SimulationOptions, config: &SyncConfig) -> Result<SimulationReport> {
    if options.players < 2 {
        return Err(TabSyncError::ConfigError(
            "at least two players are needed".to_string(),
        ));
    }
    config.validate()?;

    let registry = Arc::new(MemoryRegistry::new());
    let players: Vec<PlayerRef> = (0..options.players)
        .map(|i| {
            // Every third client is a 1.8 one to exercise the add replay
            let version = if i % 3 == 2 {
                ClientVersion::new(8, 9)
            } else {
                ClientVersion::new(20, 4)
            };
            PlayerRef::new(Uuid::new_v4(), format!("player{i}"), version)
        })
        .collect();
    for player in &players {
        registry.join(player.clone());
    }

    let reconciler = Arc::new(Reconciler::new());
    let mut viewers: Vec<Viewer> = Vec::with_capacity(players.len());
    for viewer in &players {
        let host = Arc::new(MemoryTabList::new());
        let tablist = Arc::new(EntryApiTabList::new(
            viewer.clone(),
            host.clone(),
            LegacyTextRenderer,
            registry.clone() as Arc<dyn PlayerRegistry>,
        ));
        let entries = players
            .iter()
            .enumerate()
            .map(|(i, target)| {
                Entry::new(target.tablist_id)
                    .with_name(target.name.clone())
                    .with_display_name(display_name(target, i))
            })
            .collect();
        tablist.add_entries(entries);
        tablist.set_player_list_header_footer(
            &TabComponent::text("Simulated server").bold(),
            &TabComponent::empty(),
        );
        host.clear_calls();
        reconciler.register(viewer.id, tablist.clone());
        viewers.push((viewer.clone(), host, tablist));
    }
    info!(viewers = viewers.len(), "Tablists populated");

    let period = config.reconcile_interval();
    let sweeper = reconciler.clone().spawn(period);
    let mut overrides = 0;
    for tick in 0..options.ticks {
        let (viewer, host, _) = &viewers[tick as usize % viewers.len()];
        let target = &players[(tick as usize + 1) % players.len()];
        if host.override_display_name(target.tablist_id, Some(format!("[Rogue] {}", target.name)))
        {
            overrides += 1;
            debug!(viewer = %viewer.name, player = %target.name, "Rogue plugin overrode display name");
        }
        tokio::time::sleep(period).await;
    }
    sweeper.abort();
    // Catch whatever the last period did not
    reconciler.check_display_names();

    let repairs = viewers
        .iter()
        .map(|(_, host, _)| host.display_name_writes())
        .sum();
    let rows = viewers.iter().map(|(_, host, _)| host.len()).sum();
    let drifted_rows = viewers
        .iter()
        .map(|(_, host, tablist)| drifted_rows(&players, host, tablist))
        .sum();
    let legacy_viewers = players
        .iter()
        .filter(|p| p.version.has_display_name_add_bug())
        .count();

    Ok(SimulationReport {
        viewers: viewers.len(),
        legacy_viewers,
        rows,
        overrides,
        repairs,
        drifted_rows,
        interception: intercept(&registry, &players, config),
    })
}

fn drifted_rows(
    players: &[PlayerRef],
    host: &MemoryTabList<String>,
    tablist: &EntryApiTabList<MemoryTabList<String>, LegacyTextRenderer>,
) -> usize {
    players
        .iter()
        .filter(|target| {
            let shown = host.display_name(target.tablist_id).flatten();
            let expected = tablist.expected_display_name(&target.id).flatten();
            match (shown, expected) {
                (Some(shown), Some(expected)) => !shown.same_as(&expected),
                (None, None) => false,
                _ => true,
            }
        })
        .count()
}

/// Push a foreign add packet through a packet-based tablist
fn intercept(
    registry: &Arc<MemoryRegistry>,
    players: &[PlayerRef],
    config: &SyncConfig,
) -> InterceptionReport {
    let viewer = &players[0];
    let target = &players[1];
    let intent = Arc::new(MemoryIntent::new());
    intent.set_display_name(
        viewer.id,
        target.id,
        Some(display_name(target, 1)),
    );
    let tablist = PacketTabList::new(
        viewer.clone(),
        Arc::new(MemoryPipeline::new()),
        registry.clone() as Arc<dyn PlayerRegistry>,
        config,
    )
    .with_intent(intent as Arc<dyn TabListIntent>);

    let original_display_name = "PluginA".to_string();
    let original_latency = 80;
    let mut entry = PacketEntry::from_entry(
        &Entry::new(target.tablist_id)
            .with_name(target.name.clone())
            .with_latency(original_latency),
        Action::AddPlayer,
    );
    entry.display_name = Some(TabComponent::text(original_display_name.clone()));
    let mut packet: OutboundPacket = PlayerInfoPacket::new(Action::AddPlayer, vec![entry]).into();
    tablist.on_packet_send(&mut packet);

    let sent = packet
        .as_player_info()
        .and_then(|info| info.entries.first())
        .cloned();
    InterceptionReport {
        original_display_name,
        sent_display_name: sent
            .as_ref()
            .and_then(|e| e.display_name.as_ref())
            .map(TabComponent::to_plain_text),
        original_latency,
        sent_latency: sent.map_or(original_latency, |e| e.latency),
    }
}
