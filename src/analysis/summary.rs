//! Per-wasp summaries: days seen, nests visited and partners.

use super::interactions::unique_wasps;
use crate::models::{CensusTable, WaspSummary};
use std::collections::BTreeSet;

/// Number of dates on which `wasp` was seen on at least one nest.
pub fn days_seen(table: &CensusTable, wasp: &str) -> usize {
    (0..table.date_count())
        .filter(|&date| (0..table.nest_count()).any(|nest| table.cell(nest, date).contains(wasp)))
        .count()
}

/// Number of nests on which `wasp` was seen on at least one date.
pub fn nests_visited(table: &CensusTable, wasp: &str) -> usize {
    (0..table.nest_count())
        .filter(|&nest| table.nest_row(nest).iter().any(|cell| cell.contains(wasp)))
        .count()
}

/// Every other wasp that shared a cell with `wasp`.
pub fn partners(table: &CensusTable, wasp: &str) -> BTreeSet<String> {
    let mut partners = BTreeSet::new();

    for cell in table.cells().filter(|cell| cell.contains(wasp)) {
        for partner in cell.wasps().filter(|p| *p != wasp) {
            partners.insert(partner.to_string());
        }
    }

    partners
}

/// One summary per wasp in the census, in identifier order.
pub fn build_wasp_summaries(table: &CensusTable) -> Vec<WaspSummary> {
    unique_wasps(table)
        .into_iter()
        .map(|id| WaspSummary {
            days_seen: days_seen(table, &id),
            nests_visited: nests_visited(table, &id),
            partners: partners(table, &id),
            id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{sample, table};

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_days_seen_counts_each_date_once() {
        let census = sample();
        // W2 is on two nests on 6/3 and one on 6/4
        assert_eq!(days_seen(&census, "W2"), 2);
        assert_eq!(days_seen(&census, "W1"), 2);
        assert_eq!(days_seen(&census, "ghost"), 0);
    }

    #[test]
    fn test_nests_visited_counts_each_nest_once() {
        let census = sample();
        assert_eq!(nests_visited(&census, "W1"), 2);
        assert_eq!(nests_visited(&census, "W2"), 3);
        assert_eq!(nests_visited(&census, "W10"), 1);
        assert_eq!(nests_visited(&census, "W3"), 2);
    }

    #[test]
    fn test_partners() {
        let census = sample();
        assert_eq!(partners(&census, "W1"), set(&["W2", "W3"]));
        assert_eq!(partners(&census, "W2"), set(&["W1", "W10", "W3"]));
        assert_eq!(partners(&census, "W10"), set(&["W2", "W3"]));
    }

    #[test]
    fn test_partners_exact_tokens() {
        let census = table("Nest,d1,d2\nN1,\"W10, W2\",W1\n");
        assert!(partners(&census, "W1").is_empty());
        assert_eq!(days_seen(&census, "W1"), 1);
    }

    #[test]
    fn test_single_cell_census() {
        let census = table("Nest,d1\nN1,\"A, B, C\"\n");
        let summaries = build_wasp_summaries(&census);

        assert_eq!(summaries.len(), 3);
        for summary in &summaries {
            assert_eq!(summary.days_seen, 1);
            assert_eq!(summary.nests_visited, 1);
        }
        assert_eq!(summaries[0].id, "A");
        assert_eq!(summaries[0].partners, set(&["B", "C"]));
    }

    #[test]
    fn test_summaries_bounded_by_table_shape() {
        let census = sample();
        let summaries = build_wasp_summaries(&census);

        assert_eq!(summaries.len(), 4);
        for summary in &summaries {
            assert!(summary.days_seen <= census.date_count());
            assert!(summary.nests_visited <= census.nest_count());
            assert!(!summary.partners.contains(&summary.id));
        }
    }
}
