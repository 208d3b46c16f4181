//! Wasp identifiers and pairwise interaction counts.

use crate::models::{CensusTable, InteractionMatrix};
use std::collections::BTreeSet;
use tracing::debug;

/// Every wasp that appears anywhere in the census.
pub fn unique_wasps(table: &CensusTable) -> BTreeSet<String> {
    table
        .cells()
        .flat_map(|cell| cell.wasps())
        .map(String::from)
        .collect()
}

/// Number of (nest, date) cells in which `a` and `b` were both seen.
///
/// A wasp never interacts with itself, so `a == b` is always 0.
pub fn interaction_count(table: &CensusTable, a: &str, b: &str) -> u32 {
    if a == b {
        return 0;
    }

    let mut count = 0;
    for nest in 0..table.nest_count() {
        for date in 0..table.date_count() {
            let cell = table.cell(nest, date);
            if cell.contains(a) && cell.contains(b) {
                count += 1;
            }
        }
    }
    count
}

/// Build the full interaction matrix.
pub fn build_interaction_matrix(table: &CensusTable) -> InteractionMatrix {
    build_interaction_matrix_with_progress(table, |_| {})
}

/// Build the full interaction matrix, calling `on_row` with the number of
/// finished rows after each row.
///
/// Every ordered pair is counted independently, diagonal included.
pub fn build_interaction_matrix_with_progress<F>(
    table: &CensusTable,
    mut on_row: F,
) -> InteractionMatrix
where
    F: FnMut(usize),
{
    let ids: Vec<String> = unique_wasps(table).into_iter().collect();
    debug!("Counting interactions for {} wasps", ids.len());

    let mut matrix = InteractionMatrix::zeroed(ids.clone());
    for (i, a) in ids.iter().enumerate() {
        for (j, b) in ids.iter().enumerate() {
            matrix.set(i, j, interaction_count(table, a, b));
        }
        on_row(i + 1);
    }

    matrix
}
