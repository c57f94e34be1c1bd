//! Flag snapshot parsing and lock-free snapshot storage with arc-swap.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use togglekit_common::paths;
use togglekit_store::Node;

/// An immutable mapping from flag name to boolean state.
///
/// Snapshots are replaced wholesale on each refresh and never mutated in
/// place, so a reader holding one sees a consistent view of all flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSnapshot {
    flags: HashMap<String, bool>,
}

impl FlagSnapshot {
    /// Looks up a flag by name.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    /// Number of flags in the snapshot.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether the snapshot holds no flags.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterates over all flag names and states.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, state)| (name.as_str(), *state))
    }
}

impl FromIterator<(String, bool)> for FlagSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

/// Parses a raw flag value.
///
/// The rule is an exact string match: `"true"` is true, everything else
/// (including `"True"`, `"TRUE "` and the empty string) is false. Lenient
/// decoding by design; parsing never fails.
pub fn parse_value(raw: &str) -> bool {
    raw == "true"
}

/// Flattens a raw node tree into a snapshot.
///
/// Every leaf node becomes one flag: the name is the final `/`-separated
/// segment of the key, the state is [`parse_value`] of the raw value.
/// Duplicate final segments across sub-paths collapse, last one in traversal
/// order wins. Total over any tree the gateway returns; an empty tree yields
/// an empty snapshot.
pub fn parse_tree(root: &Node) -> FlagSnapshot {
    let mut flags = HashMap::new();
    for leaf in root.leaves() {
        let name = paths::last_segment(&leaf.key);
        if name.is_empty() {
            // A key ending in a separator names no flag.
            continue;
        }
        let state = leaf.value.as_deref().map_or(false, parse_value);
        flags.insert(name.to_string(), state);
    }
    FlagSnapshot { flags }
}

/// Thread-safe snapshot holder using arc-swap for lock-free reads.
///
/// Replacement is a single atomic pointer swap: concurrent readers either see
/// the old snapshot or the new one, never a mix.
#[derive(Debug)]
pub struct SnapshotCache {
    snapshot: ArcSwap<FlagSnapshot>,
}

impl SnapshotCache {
    /// Creates a cache holding an empty snapshot.
    pub fn empty() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(FlagSnapshot::default()),
        }
    }

    /// Gets the currently installed snapshot.
    pub fn load(&self) -> Arc<FlagSnapshot> {
        self.snapshot.load_full()
    }

    /// Atomically replaces the installed snapshot.
    pub fn replace(&self, snapshot: FlagSnapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::empty()
    }
}
