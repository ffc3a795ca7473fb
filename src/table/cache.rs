use std::sync::Arc;

use tracing::debug;

use crate::{Snapshot, TransitionTable};

/// Memoizes the [`TransitionTable`] of the most recent [`Snapshot`] it was asked for.
///
/// The key is the identity of the two snapshot collections, not their content. Since the store
/// never mutates a collection in place, an unchanged allocation means an unchanged graph. The
/// cache holds on to the snapshot it computed the table for, so the allocations cannot be freed
/// and reused while they serve as the key.
#[derive(Debug, Default)]
pub struct TableCache {
    entry: Option<(Snapshot, Arc<TransitionTable>)>,
    hits: usize,
    misses: usize,
}

impl TableCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `snapshot`, recomputing it only if the snapshot differs from the
    /// one seen last.
    pub fn get(&mut self, snapshot: &Snapshot) -> Arc<TransitionTable> {
        if let Some((cached, table)) = &self.entry {
            if cached.same_as(snapshot) {
                self.hits += 1;
                return Arc::clone(table);
            }
        }

        debug!("transition table cache miss, recomputing");
        self.misses += 1;
        let table = Arc::new(snapshot.transition_table());
        self.entry = Some((snapshot.clone(), Arc::clone(&table)));
        table
    }

    /// Drops the cached table.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of lookups that required a recomputation.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
