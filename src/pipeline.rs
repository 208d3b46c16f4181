//! The census pipeline: load, analyze, render, write.
//!
//! Every output is rendered in memory and staged next to its destination
//! before any file is replaced, so a failed render or staging step leaves
//! every destination untouched.

use crate::analysis::{
    build_interaction_matrix, build_interaction_matrix_with_progress, build_wasp_summaries,
    unique_wasps,
};
use crate::census::load_census;
use crate::config::Config;
use crate::models::{CensusReport, CensusTable, InteractionMatrix};
use crate::report::{
    build_census_report, generate_json_report, interaction_matrix_csv, render_heatmap_html,
    wasp_summary_csv,
};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Computed results.
    pub report: CensusReport,
    /// Files written, in the order they were committed.
    pub written: Vec<PathBuf>,
}

/// Load the census named by the config.
pub fn load(config: &Config) -> Result<CensusTable> {
    info!("Loading census from {}", config.input.path.display());
    load_census(&config.input.path, &config.input.empty_markers)
}

/// Run the full pipeline and write every configured output.
pub fn run(config: &Config, show_progress: bool) -> Result<RunOutcome> {
    let table = load(config)?;
    let report = analyze(config, &table, show_progress);
    let batch = render_outputs(config, &report)?;
    for path in batch.paths() {
        debug!("Queued output {}", path.display());
    }
    let written = batch.commit()?;

    Ok(RunOutcome { report, written })
}

/// Compute the interaction matrix and the wasp summaries.
pub fn analyze(config: &Config, table: &CensusTable, show_progress: bool) -> CensusReport {
    let matrix = compute_matrix(table, show_progress);
    debug_assert!(matrix.is_symmetric());
    info!("Interaction matrix: {} x {}", matrix.len(), matrix.len());

    let summaries = build_wasp_summaries(table);
    debug!("Built {} wasp summaries", summaries.len());

    let input = config.input.path.display().to_string();
    build_census_report(&input, table, &matrix, &summaries)
}

fn compute_matrix(table: &CensusTable, show_progress: bool) -> InteractionMatrix {
    if !show_progress {
        return build_interaction_matrix(table);
    }

    let wasps = unique_wasps(table).len();
    let pb = ProgressBar::new(wasps as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} wasps ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);

    let matrix = build_interaction_matrix_with_progress(table, |done| pb.set_position(done as u64));
    pb.finish_and_clear();

    matrix
}

/// Render every configured output into a staged batch.
pub fn render_outputs(config: &Config, report: &CensusReport) -> Result<OutputBatch> {
    let output = &config.output;
    let mut batch = OutputBatch::default();

    batch.add(
        output.resolve(&output.interaction_matrix),
        interaction_matrix_csv(&report.interaction_matrix),
    );
    batch.add(
        output.resolve(&output.wasp_summary),
        wasp_summary_csv(&report.wasps),
    );

    if config.heatmap.enabled {
        let html = render_heatmap_html(&report.interaction_matrix, &config.heatmap)?;
        batch.add(output.resolve(&output.heatmap), html);
    }

    if let Some(ref json_path) = output.report_json {
        batch.add(output.resolve(json_path), generate_json_report(report)?);
    }

    Ok(batch)
}

/// Rendered files waiting to be written.
#[derive(Debug, Default)]
pub struct OutputBatch {
    files: Vec<(PathBuf, String)>,
}

impl OutputBatch {
    /// Queue `content` for `path`.
    pub fn add(&mut self, path: PathBuf, content: String) {
        self.files.push((path, content));
    }

    /// Destination paths, in queue order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(path, _)| path.as_path())
    }

    /// Write every file.
    ///
    /// All contents are first written to temporary files in each
    /// destination directory; only once every one succeeded are they
    /// renamed over their destinations. If a rename fails, files this
    /// commit created are removed again. Files it already replaced keep
    /// their new contents.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut staged = Vec::with_capacity(self.files.len());

        for (path, content) in self.files {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

            let mut temp = NamedTempFile::new_in(&dir)
                .with_context(|| format!("Failed to stage output in: {}", dir.display()))?;
            temp.write_all(content.as_bytes())
                .with_context(|| format!("Failed to stage output for: {}", path.display()))?;
            if let Some(permissions) = staged_permissions(&path) {
                temp.as_file()
                    .set_permissions(permissions)
                    .with_context(|| format!("Failed to set permissions for: {}", path.display()))?;
            }

            debug!("Staged {} ({} bytes)", path.display(), content.len());
            let existed = path.exists();
            staged.push((path, temp, existed));
        }

        let mut written = Vec::with_capacity(staged.len());
        let mut created = Vec::new();
        for (path, temp, existed) in staged {
            if let Err(e) = temp.persist(&path) {
                roll_back(&created);
                return Err(e.error)
                    .with_context(|| format!("Failed to write output file: {}", path.display()));
            }
            info!("Wrote {}", path.display());
            if !existed {
                created.push(path.clone());
            }
            written.push(path);
        }

        Ok(written)
    }
}

/// Remove outputs created by a commit that failed part way.
fn roll_back(created: &[PathBuf]) {
    for path in created {
        match std::fs::remove_file(path) {
            Ok(()) => warn!("Removed partial output {}", path.display()),
            Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
        }
    }
}

/// Permissions for a staged file: those of the file it replaces, or the
/// usual mode for a new file. Temporary files start owner-only.
fn staged_permissions(dest: &Path) -> Option<Permissions> {
    match std::fs::metadata(dest) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
