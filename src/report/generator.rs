//! JSON report generation.
//!
//! The JSON report bundles the census metadata, the interaction matrix and
//! every wasp summary into one document. It carries no timestamps, so the
//! same census always yields the same bytes.

use crate::models::{CensusReport, CensusTable, InteractionMatrix, ReportMetadata, WaspSummary};
use anyhow::Result;

/// Assemble the report for a finished run.
pub fn build_census_report(
    input: &str,
    table: &CensusTable,
    matrix: &InteractionMatrix,
    summaries: &[WaspSummary],
) -> CensusReport {
    CensusReport {
        metadata: ReportMetadata::describe(input, table, matrix.len()),
        interaction_matrix: matrix.clone(),
        wasps: summaries.to_vec(),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &CensusReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample;
    use crate::analysis::{build_interaction_matrix, build_wasp_summaries};
    use chrono::NaiveDate;

    fn create_test_report() -> CensusReport {
        let table = sample();
        let matrix = build_interaction_matrix(&table);
        let summaries = build_wasp_summaries(&table);
        build_census_report("wasp_census_2019.csv", &table, &matrix, &summaries)
    }

    #[test]
    fn test_report_metadata() {
        let report = create_test_report();

        assert_eq!(report.metadata.nests, 4);
        assert_eq!(report.metadata.dates, 3);
        assert_eq!(report.metadata.wasps, 4);
        assert_eq!(report.metadata.observations, 5);
        assert_eq!(
            report.metadata.first_date,
            NaiveDate::from_ymd_opt(2019, 6, 3)
        );
        assert_eq!(report.metadata.last_date, NaiveDate::from_ymd_opt(2019, 6, 5));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"interaction_matrix\""));
        assert!(json.contains("\"days_seen\""));
        assert!(json.contains("\"first_date\": \"2019-06-03\""));

        let parsed: CensusReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_undated_census_omits_span() {
        let table = crate::analysis::test_support::table("Nest,visit 1\nN1,A\n");
        let matrix = build_interaction_matrix(&table);
        let report = build_census_report("x.csv", &table, &matrix, &[]);
        let json = generate_json_report(&report).unwrap();

        assert!(!json.contains("first_date"));
    }
}
