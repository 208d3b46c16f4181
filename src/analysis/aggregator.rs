//! Rankings over computed results.
//!
//! This module picks out the strongest partnerships and the most social
//! wasps for the run summary.

use crate::models::{InteractionMatrix, WaspPair, WaspSummary};
use std::cmp::Reverse;

/// The `n` pairs that shared a nest most often.
///
/// Each unordered pair appears once, with `first < second`. Pairs that
/// never met are left out. Ties keep identifier order.
pub fn strongest_pairs(matrix: &InteractionMatrix, n: usize) -> Vec<WaspPair> {
    let ids = matrix.ids();
    let mut pairs: Vec<WaspPair> = (0..ids.len())
        .flat_map(|i| ((i + 1)..ids.len()).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let count = matrix.row(i)[j];
            (count > 0).then(|| WaspPair {
                first: ids[i].clone(),
                second: ids[j].clone(),
                count,
            })
        })
        .collect();

    // Stable sort, so equal counts stay in identifier order
    pairs.sort_by_key(|pair| Reverse(pair.count));
    pairs.truncate(n);

    pairs
}

/// The `n` wasps with the most distinct partners.
pub fn most_social_wasps(summaries: &[WaspSummary], n: usize) -> Vec<&WaspSummary> {
    let mut social: Vec<&WaspSummary> = summaries
        .iter()
        .filter(|s| s.partner_count() > 0)
        .collect();

    social.sort_by_key(|s| Reverse(s.partner_count()));
    social.truncate(n);

    social
}

/// Total number of co-observations, counting each unordered pair once.
pub fn total_interactions(matrix: &InteractionMatrix) -> u64 {
    (0..matrix.len())
        .map(|i| matrix.row(i)[i + 1..].iter().map(|&c| u64::from(c)).sum::<u64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample;
    use crate::analysis::{build_interaction_matrix, build_wasp_summaries};

    #[test]
    fn test_strongest_pairs() {
        let matrix = build_interaction_matrix(&sample());
        let pairs = strongest_pairs(&matrix, 3);

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].first, "W1");
        assert_eq!(pairs[0].second, "W2");
        assert_eq!(pairs[0].count, 2);
        // Ties in identifier order: W1&W3 before W10&W2
        assert_eq!((pairs[1].first.as_str(), pairs[1].second.as_str()), ("W1", "W3"));
        assert_eq!((pairs[2].first.as_str(), pairs[2].second.as_str()), ("W10", "W2"));
    }

    #[test]
    fn test_strongest_pairs_skips_strangers() {
        let matrix = build_interaction_matrix(&sample());
        let pairs = strongest_pairs(&matrix, 100);

        // 6 possible pairs, W1 & W10 never met
        assert_eq!(pairs.len(), 5);
        assert!(pairs.iter().all(|p| p.count > 0));
        assert!(strongest_pairs(&matrix, 0).is_empty());
    }

    #[test]
    fn test_most_social_wasps() {
        let summaries = build_wasp_summaries(&sample());
        let social = most_social_wasps(&summaries, 2);

        assert_eq!(social.len(), 2);
        assert_eq!(social[0].id, "W2");
        assert_eq!(social[0].partner_count(), 3);
        assert_eq!(social[1].id, "W3");
    }

    #[test]
    fn test_total_interactions() {
        let matrix = build_interaction_matrix(&sample());
        assert_eq!(total_interactions(&matrix), 6);
        assert_eq!(total_interactions(&InteractionMatrix::zeroed(vec![])), 0);
    }
}
