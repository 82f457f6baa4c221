//! Memoized access to generated planets.
//!
//! The store keeps the most recently requested seed only. A miss generates the
//! full cell set outside the read path and publishes it with a single `Arc`
//! swap, so readers see either the previous planet or the finished new one.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, trace};

use crate::cell::Cell;
use crate::engine::Engine;
use crate::rng::normalize_seed;

#[derive(Debug)]
struct Generation {
    seed: String,
    cells: Arc<[Cell]>,
}

#[derive(Debug)]
pub struct CellStore {
    engine: Engine,
    current: RwLock<Option<Arc<Generation>>>,
    /// Held while generating so concurrent misses do the work once.
    writer: Mutex<()>,
}

impl CellStore {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            current: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Every cell of the planet for `seed`, generated at most once while cached.
    pub fn cells(&self, seed: &str) -> Arc<[Cell]> {
        let seed = normalize_seed(seed);
        if let Some(cells) = self.lookup(seed) {
            trace!(target: "orbis::store", seed, "cache hit");
            return cells;
        }

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cells) = self.lookup(seed) {
            return cells;
        }

        let cells: Arc<[Cell]> = self.engine.generate(seed).into();
        let generation = Arc::new(Generation {
            seed: seed.to_string(),
            cells: Arc::clone(&cells),
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(generation);
        info!(target: "orbis::store", seed, cells = cells.len(), "published planet");
        cells
    }

    /// Cells with ids `start..=end` (1-based), clamped to the planet.
    ///
    /// Inverted or fully out-of-range requests yield an empty page.
    pub fn page(&self, seed: &str, start: u32, end: u32) -> Vec<Cell> {
        let cells = self.cells(seed);
        slice_by_id(&cells, start, end).to_vec()
    }

    pub fn cell(&self, seed: &str, id: u32) -> Option<Cell> {
        let cells = self.cells(seed);
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        cells.get(index).cloned()
    }

    pub fn is_cached(&self, seed: &str) -> bool {
        self.lookup(normalize_seed(seed)).is_some()
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn lookup(&self, seed: &str) -> Option<Arc<[Cell]>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|generation| generation.seed == seed)
            .map(|generation| Arc::clone(&generation.cells))
    }
}

/// `cells[start - 1 ..= end - 1]` for an id-ordered cell slice.
pub fn slice_by_id(cells: &[Cell], start: u32, end: u32) -> &[Cell] {
    let start = start.max(1) as usize;
    let end = (end as usize).min(cells.len());
    if start > end {
        return &[];
    }
    &cells[start - 1..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlanetConfig, RegionConfig};
    use crate::topology::Climate;

    fn store() -> CellStore {
        let config = PlanetConfig {
            name: "store".into(),
            total_cells: 120,
            total_population: 9_999,
            regions: vec![RegionConfig {
                name: "Tudo".into(),
                climate: Climate::Temperate,
                share: 1.0,
            }],
            ..PlanetConfig::builtin()
        };
        CellStore::new(Engine::new(&config).expect("valid config"))
    }

    #[test]
    fn repeated_requests_share_the_cached_array() {
        let store = store();
        let first = store.cells("alpha");
        let second = store.cells("alpha");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(store.is_cached("alpha"));
    }

    #[test]
    fn new_seed_replaces_the_cached_one() {
        let store = store();
        let alpha = store.cells("alpha");
        store.cells("beta");
        assert!(!store.is_cached("alpha"));
        assert!(store.is_cached("beta"));
        assert_eq!(&*store.cells("alpha"), &*alpha);
    }

    #[test]
    fn empty_seed_shares_the_default_entry() {
        let store = store();
        let empty = store.cells("");
        assert!(store.is_cached(crate::constants::DEFAULT_SEED));
        assert!(Arc::ptr_eq(&empty, &store.cells(crate::constants::DEFAULT_SEED)));
    }

    #[test]
    fn pages_clamp_and_preserve_order() {
        let store = store();
        let page = store.page("alpha", 11, 20);
        assert_eq!(page.len(), 10);
        assert_eq!(page.first().map(|c| c.id), Some(11));
        assert_eq!(page.last().map(|c| c.id), Some(20));
        assert_eq!(store.page("alpha", 0, 3).len(), 3);
        assert_eq!(store.page("alpha", 115, 500).len(), 6);
        assert!(store.page("alpha", 30, 10).is_empty());
        assert!(store.page("alpha", 121, 130).is_empty());
    }

    #[test]
    fn single_cell_lookup() {
        let store = store();
        assert_eq!(store.cell("alpha", 42).map(|c| c.id), Some(42));
        assert!(store.cell("alpha", 0).is_none());
        assert!(store.cell("alpha", 121).is_none());
    }

    #[test]
    fn cleared_store_regenerates_identically() {
        let store = store();
        let before = store.cells("gamma");
        store.clear();
        assert!(!store.is_cached("gamma"));
        let after = store.cells("gamma");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(&*before, &*after);
    }

    #[test]
    fn concurrent_readers_observe_one_generation() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.cells("race"))
            })
            .collect();
        let results: Vec<Arc<[Cell]>> = handles
            .into_iter()
            .map(|handle| handle.join().expect("reader thread"))
            .collect();
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
    }
}
