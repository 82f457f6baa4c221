use std::sync::Arc;

use orbis::{generate_all_cells_rebalanced, CellStore, Engine, TOTAL_CELLS};

#[test]
fn cached_planet_equals_fresh_generation() {
    let store = CellStore::new(Engine::builtin());
    let cached = store.cells("TOI-700");
    assert_eq!(&*cached, generate_all_cells_rebalanced("TOI-700").as_slice());
}

#[test]
fn pages_come_from_the_cached_array() {
    let store = CellStore::new(Engine::builtin());
    let cells = store.cells("paging");
    let page = store.page("paging", 35_801, 36_000);
    assert_eq!(page.len(), 100);
    assert_eq!(page.last().map(|c| c.id), Some(TOTAL_CELLS));
    assert_eq!(page.as_slice(), &cells[35_800..]);
    assert!(Arc::ptr_eq(&cells, &store.cells("paging")));
}
