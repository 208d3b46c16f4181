//! Output rendering.
//!
//! Renderers turn computed results into file contents. They only borrow
//! their inputs; writing to disk is left to the pipeline.

pub mod csv;
pub mod generator;
pub mod heatmap;

pub use self::csv::{interaction_matrix_csv, wasp_summary_csv};
pub use generator::{build_census_report, generate_json_report};
pub use heatmap::render_heatmap_html;
