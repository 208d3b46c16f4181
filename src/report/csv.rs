//! CSV rendering of the interaction matrix and the wasp summaries.

use crate::census::reader::escape_field;
use crate::models::{InteractionMatrix, WaspSummary};
use std::collections::BTreeSet;

/// Column headers of the summary table, after the unnamed id column.
pub const SUMMARY_COLUMNS: [&str; 3] = ["Days Seen", "Nests Visited", "Partners"];

/// Render the interaction matrix with wasp ids as row and column headers.
pub fn interaction_matrix_csv(matrix: &InteractionMatrix) -> String {
    let mut csv = String::new();

    // Empty corner cell, then one column per wasp
    for id in matrix.ids() {
        csv.push(',');
        csv.push_str(&escape_field(id));
    }
    csv.push('\n');

    for (i, id) in matrix.ids().iter().enumerate() {
        csv.push_str(&escape_field(id));
        for count in matrix.row(i) {
            csv.push_str(&format!(",{}", count));
        }
        csv.push('\n');
    }

    csv
}

/// Render one row per wasp: days seen, nests visited and partners.
pub fn wasp_summary_csv(summaries: &[WaspSummary]) -> String {
    let mut csv = format!(",{}\n", SUMMARY_COLUMNS.join(","));

    for summary in summaries {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            escape_field(&summary.id),
            summary.days_seen,
            summary.nests_visited,
            escape_field(&partners_literal(&summary.partners)),
        ));
    }

    csv
}

/// Partners as a list literal, e.g. `['W2', 'W3']`.
pub fn partners_literal(partners: &BTreeSet<String>) -> String {
    let items: Vec<String> = partners
        .iter()
        .map(|p| format!("'{}'", p.replace('\'', "\\'")))
        .collect();
    format!("[{}]", items.join(", "))
}
