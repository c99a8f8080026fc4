//! The shared application store surface this crate depends on.
//!
//! Compare mode and the search-node string live in a global,
//! session-scoped store owned by the embedding application. This crate
//! only dispatches transitions into it, through an injectable trait, so
//! the controller stays deterministic under test.

use tracing::debug;

/// A batched compare-mode transition: set `compare_mode` and clear the
/// search-node string as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareTransition {
    pub compare_mode: bool,
}

pub trait ExplorerStore {
    fn compare_mode(&self) -> bool;

    fn set_compare_mode(&mut self, on: bool);

    /// `None` clears the string.
    fn set_search_node(&mut self, value: Option<String>);

    /// Apply both writes of a compare transition before returning, so no
    /// observer sees the mode flipped with a stale search string.
    /// Callers toggling compare mode must go through this instead of
    /// issuing the two writes themselves.
    fn apply(&mut self, transition: CompareTransition) {
        self.set_compare_mode(transition.compare_mode);
        self.set_search_node(None);
    }
}

/// In-process store implementation. Also counts applied transitions,
/// which tests use to pin down dispatch-once guarantees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    compare_mode: bool,
    search_node: Option<String>,
    transitions: u32,
}

impl MemoryStore {
    pub fn search_node(&self) -> Option<&str> {
        self.search_node.as_deref()
    }

    /// Number of batched transitions applied so far.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }
}

impl ExplorerStore for MemoryStore {
    fn compare_mode(&self) -> bool {
        self.compare_mode
    }

    fn set_compare_mode(&mut self, on: bool) {
        self.compare_mode = on;
    }

    fn set_search_node(&mut self, value: Option<String>) {
        self.search_node = value;
    }

    fn apply(&mut self, transition: CompareTransition) {
        debug!(compare_mode = transition.compare_mode, "compare transition");
        self.transitions += 1;
        self.set_compare_mode(transition.compare_mode);
        self.set_search_node(None);
    }
}
