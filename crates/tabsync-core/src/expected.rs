//! Expected display names per viewer
//!
//! Each tablist remembers the last display name it set for every player row,
//! so a later sweep or outbound packet can tell when something else replaced
//! it. `Some(None)` means "we explicitly set no display name"; a missing key
//! means the player is not tracked at all.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::player::ViewerId;

/// Last display name written for each player row of one tablist
#[derive(Debug)]
pub struct ExpectedNames<T> {
    names: Mutex<HashMap<ViewerId, Option<T>>>,
}

impl<T> Default for ExpectedNames<T> {
    fn default() -> Self {
        Self {
            names: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ExpectedNames<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, player: ViewerId, display_name: Option<T>) {
        self.names.lock().insert(player, display_name);
    }

    /// Cloned out so no lock is held while talking to the host
    pub fn get(&self, player: &ViewerId) -> Option<Option<T>> {
        self.names.lock().get(player).cloned()
    }

    /// Drop everything known about a disconnected player
    pub fn forget(&self, player: &ViewerId) -> bool {
        self.names.lock().remove(player).is_some()
    }

    pub fn contains(&self, player: &ViewerId) -> bool {
        self.names.lock().contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.names.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.lock().is_empty()
    }
}
