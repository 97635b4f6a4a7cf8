//! Unlock registry abstraction.
//!
//! Unlocks (special evolutions, eggs, adventure areas) are granted per
//! module and category. The lifecycle rules only need to ask whether a key is
//! unlocked and to grant new keys, so the registry is a trait; the roster
//! owns an [`InMemoryUnlocks`] that serializes with snapshots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use vpet_types::UnlockKind;

/// Read/write access to granted unlocks.
pub trait UnlockRegistry {
    /// Whether `key` of `kind` is unlocked for `module`.
    fn is_unlocked(&self, module: &str, kind: UnlockKind, key: &str) -> bool;

    /// Grant `key` of `kind` for `module`. Returns `true` if newly granted.
    fn unlock(&mut self, module: &str, kind: UnlockKind, key: &str) -> bool;
}

/// A single granted unlock.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnlockEntry {
    /// Module the unlock belongs to.
    pub module: String,
    /// Category of the unlock.
    pub kind: UnlockKind,
    /// Unlock key.
    pub key: String,
}

/// Set-backed unlock registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryUnlocks {
    entries: BTreeSet<UnlockEntry>,
}

impl InMemoryUnlocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of granted unlocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been unlocked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over granted unlocks in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &UnlockEntry> {
        self.entries.iter()
    }
}

impl UnlockRegistry for InMemoryUnlocks {
    fn is_unlocked(&self, module: &str, kind: UnlockKind, key: &str) -> bool {
        self.entries.iter().any(|e| e.module == module && e.kind == kind && e.key == key)
    }

    fn unlock(&mut self, module: &str, kind: UnlockKind, key: &str) -> bool {
        let granted = self.entries.insert(UnlockEntry {
            module: module.to_owned(),
            kind,
            key: key.to_owned(),
        });
        if granted {
            info!(module, kind = %kind, key, "Unlocked");
        }
        granted
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unlock_is_scoped_by_module_and_kind() {
        let mut reg = InMemoryUnlocks::new();
        assert!(reg.unlock("DMC", UnlockKind::Evolution, "omega"));
        assert!(reg.is_unlocked("DMC", UnlockKind::Evolution, "omega"));
        assert!(!reg.is_unlocked("PenC", UnlockKind::Evolution, "omega"));
        assert!(!reg.is_unlocked("DMC", UnlockKind::Egg, "omega"));
    }

    #[test]
    fn unlock_twice_reports_existing() {
        let mut reg = InMemoryUnlocks::new();
        assert!(reg.unlock("DMC", UnlockKind::Adventure, "area2"));
        assert!(!reg.unlock("DMC", UnlockKind::Adventure, "area2"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn registry_serializes_as_list() {
        let mut reg = InMemoryUnlocks::new();
        reg.unlock("DMC", UnlockKind::Egg, "black");
        let json = serde_json::to_string(&reg).unwrap();
        assert!(json.starts_with('['));
        let back: InMemoryUnlocks = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reg);
    }
}
