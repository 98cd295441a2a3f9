//! Per-viewer tablist registry and the periodic display-name sweep
//!
//! The reconciler owns one [`TabList`] per connected viewer. The host's
//! scheduler drives [`Reconciler::check_display_names`], either directly or
//! through [`Reconciler::spawn`]. Disconnects are explicit: the leaving
//! viewer's tablist is dropped and every other tablist forgets the player.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::player::ViewerId;
use crate::tablist::TabList;

/// Tablists of all connected viewers
#[derive(Default)]
pub struct Reconciler {
    tablists: RwLock<HashMap<ViewerId, Arc<dyn TabList>>>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a viewer's tablist, replacing any previous one
    pub fn register(&self, viewer: ViewerId, tablist: Arc<dyn TabList>) {
        self.tablists.write().insert(viewer, tablist);
        debug!(viewer = %viewer, "Registered tablist");
    }

    pub fn get(&self, viewer: &ViewerId) -> Option<Arc<dyn TabList>> {
        self.tablists.read().get(viewer).cloned()
    }

    pub fn len(&self) -> usize {
        self.tablists.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tablists.read().is_empty()
    }

    /// Viewer left: drop its tablist and its rows' state everywhere else
    pub fn disconnect(&self, viewer: &ViewerId) -> Option<Arc<dyn TabList>> {
        let removed = self.tablists.write().remove(viewer);
        for tablist in self.snapshot() {
            tablist.forget_viewer(*viewer);
        }
        debug!(viewer = %viewer, "Viewer disconnected");
        removed
    }

    /// Run one display-name sweep over every tablist
    pub fn check_display_names(&self) {
        for tablist in self.snapshot() {
            tablist.check_display_names();
        }
    }

    /// Drive the sweep from a tokio interval until the handle is aborted
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        info!("Starting display name sweep every {:?}", period);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                self.check_display_names();
            }
        })
    }

    fn snapshot(&self) -> Vec<Arc<dyn TabList>> {
        self.tablists.read().values().cloned().collect()
    }
}
