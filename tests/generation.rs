use std::collections::HashMap;

use orbis::{
    compute_global_totals, compute_region_totals, generate_all_cells_rebalanced,
    get_resource_profile, CellType, Engine, TOTAL_CELLS, TOTAL_POPULATION,
};

fn population_sum(cells: &[orbis::Cell]) -> u64 {
    cells.iter().map(|cell| cell.population_total).sum()
}

#[test]
fn generation_is_idempotent() {
    let first = generate_all_cells_rebalanced("TOI-700");
    let second = generate_all_cells_rebalanced("TOI-700");
    assert_eq!(first, second);
}

#[test]
fn exact_count_and_population_for_several_seeds() {
    let engine = Engine::builtin();
    for seed in ["TOI-700", "A", "B", "", "kepler-452b"] {
        let cells = engine.generate(seed);
        assert_eq!(cells.len(), TOTAL_CELLS as usize, "seed {seed:?}");
        assert_eq!(population_sum(&cells), TOTAL_POPULATION, "seed {seed:?}");
    }
}

#[test]
fn every_cell_splits_exactly_and_stays_in_bounds() {
    let cells = generate_all_cells_rebalanced("split");
    for cell in &cells {
        assert_eq!(
            cell.population_urban + cell.population_rural,
            cell.population_total,
            "cell {}",
            cell.id
        );
        assert!((0.2..=2.0).contains(&cell.fertility), "cell {}", cell.id);
        assert!((0.1..=1.0).contains(&cell.habitability));
        assert!((0.0..=1.0).contains(&cell.mineral_richness));
        assert!((0.0..=1.0).contains(&cell.energy_potential));
        assert!(cell.owner_state_id.is_none());
    }
}

#[test]
fn ids_are_ascending_and_regions_contiguous() {
    let cells = generate_all_cells_rebalanced("order");
    let mut counts: HashMap<u16, u64> = HashMap::new();
    for (index, cell) in cells.iter().enumerate() {
        assert_eq!(cell.id as usize, index + 1);
        *counts.entry(cell.region_id).or_default() += 1;
    }
    for pair in cells.windows(2) {
        assert!(pair[0].region_id <= pair[1].region_id);
    }
    let mut counts: Vec<(u16, u64)> = counts.into_iter().collect();
    counts.sort();
    let counts: Vec<u64> = counts.into_iter().map(|(_, count)| count).collect();
    assert_eq!(counts, vec![10_770, 8_975, 7_180, 5_385, 3_590]);
}

#[test]
fn region_totals_sum_to_global_totals() {
    let cells = generate_all_cells_rebalanced("totals");
    let regions = compute_region_totals(&cells);
    let global = compute_global_totals(&cells);
    assert_eq!(
        regions.iter().map(|r| r.total_population).sum::<u64>(),
        global.total
    );
    assert_eq!(global.total, TOTAL_POPULATION);
    assert_eq!(global.cell_count, u64::from(TOTAL_CELLS));
    assert_eq!(global.region_count, 5);
    assert_eq!(
        global.urban_population + global.rural_population,
        TOTAL_POPULATION
    );
}

#[test]
fn different_seeds_differ_but_keep_invariants() {
    let a = generate_all_cells_rebalanced("A");
    let b = generate_all_cells_rebalanced("B");
    assert!(a
        .iter()
        .zip(&b)
        .any(|(x, y)| x.fertility != y.fertility || x.population_total != y.population_total));
    assert_eq!(population_sum(&a), TOTAL_POPULATION);
    assert_eq!(population_sum(&b), TOTAL_POPULATION);
}

#[test]
fn urban_fraction_and_density_follow_targets() {
    let cells = generate_all_cells_rebalanced("TOI-700");
    let global = compute_global_totals(&cells);
    let fraction = global.urban_cell_fraction();
    assert!((0.18..=0.22).contains(&fraction), "urban fraction {fraction}");
    let urban = global.average_per_urban_cell();
    let rural = global.average_per_rural_cell();
    assert!(urban > 3.0 * rural, "urban {urban} vs rural {rural}");
    assert!(cells
        .iter()
        .filter(|c| c.cell_type == CellType::Urban)
        .all(|c| c.population_urban >= c.population_rural));
}

#[test]
fn empty_seed_matches_default_seed() {
    assert_eq!(
        generate_all_cells_rebalanced(""),
        generate_all_cells_rebalanced(orbis::constants::DEFAULT_SEED)
    );
}

#[test]
fn resource_profile_is_deterministic() {
    let cells = generate_all_cells_rebalanced("profile");
    for cell in cells.iter().step_by(311) {
        assert_eq!(get_resource_profile(cell), get_resource_profile(cell));
    }
}
