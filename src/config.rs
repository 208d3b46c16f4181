//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.waspcensus.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".waspcensus.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Census input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Heatmap settings.
    #[serde(default)]
    pub heatmap: HeatmapConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of strongest pairs listed after a run.
    #[serde(default = "default_top_pairs")]
    pub top_pairs: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            top_pairs: default_top_pairs(),
        }
    }
}

fn default_top_pairs() -> usize {
    5
}

/// Census input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Census CSV file.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Cell values that mean "no wasps seen".
    #[serde(default = "default_empty_markers")]
    pub empty_markers: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            empty_markers: default_empty_markers(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("wasp_census_2019.csv")
}

/// Cell values treated as empty, mirroring the usual spreadsheet NA spellings.
pub fn default_empty_markers() -> Vec<String> {
    vec!["", "NA", "N/A", "NaN", "nan", "null", "NULL"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that relative output paths are resolved against.
    #[serde(default = "default_out_dir")]
    pub dir: PathBuf,

    /// Interaction matrix CSV.
    #[serde(default = "default_matrix_path")]
    pub interaction_matrix: PathBuf,

    /// Per-wasp summary CSV.
    #[serde(default = "default_summary_path")]
    pub wasp_summary: PathBuf,

    /// Heatmap HTML page.
    #[serde(default = "default_heatmap_path")]
    pub heatmap: PathBuf,

    /// Optional JSON report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            interaction_matrix: default_matrix_path(),
            wasp_summary: default_summary_path(),
            heatmap: default_heatmap_path(),
            report_json: None,
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_matrix_path() -> PathBuf {
    PathBuf::from("interaction_matrix.csv")
}

fn default_summary_path() -> PathBuf {
    PathBuf::from("wasp_summary_matrix.csv")
}

fn default_heatmap_path() -> PathBuf {
    PathBuf::from("interaction-matrix-heatmap.html")
}

impl OutputConfig {
    /// Resolve an output path against the output directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }
}

/// Heatmap rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Render the heatmap at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Page and chart title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Chart width in pixels.
    #[serde(default = "default_chart_size")]
    pub width: u32,

    /// Chart height in pixels.
    #[serde(default = "default_chart_size")]
    pub height: u32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_title(),
            width: default_chart_size(),
            height: default_chart_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "Wasp Interaction Matrix".to_string()
}

fn default_chart_size() -> u32 {
    900
}

/// Smallest chart edge that still leaves room for axis labels.
pub const MIN_CHART_SIZE: u32 = 200;

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.path = input.clone();
        }

        if let Some(ref dir) = args.out_dir {
            self.output.dir = dir.clone();
        }
        if let Some(ref matrix) = args.matrix {
            self.output.interaction_matrix = matrix.clone();
        }
        if let Some(ref summary) = args.summary {
            self.output.wasp_summary = summary.clone();
        }
        if let Some(ref heatmap) = args.heatmap {
            self.output.heatmap = heatmap.clone();
        }
        if let Some(ref json) = args.json {
            self.output.report_json = Some(json.clone());
        }

        if args.no_heatmap {
            self.heatmap.enabled = false;
        }

        if let Some(top) = args.top {
            self.general.top_pairs = top;
        }
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> Result<(), String> {
        if self.heatmap.enabled
            && (self.heatmap.width < MIN_CHART_SIZE || self.heatmap.height < MIN_CHART_SIZE)
        {
            return Err(format!(
                "Heatmap width and height must be at least {} pixels",
                MIN_CHART_SIZE
            ));
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.path, PathBuf::from("wasp_census_2019.csv"));
        assert_eq!(
            config.output.interaction_matrix,
            PathBuf::from("interaction_matrix.csv")
        );
        assert!(config.input.empty_markers.contains(&"NA".to_string()));
        assert!(config.heatmap.enabled);
        assert!(config.output.report_json.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
top_pairs = 3

[input]
path = "census/2020.csv"
empty_markers = ["", "-"]

[output]
dir = "out"
report_json = "report.json"

[heatmap]
title = "Polistes 2020"
width = 600
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.top_pairs, 3);
        assert_eq!(config.input.path, PathBuf::from("census/2020.csv"));
        assert_eq!(config.input.empty_markers, vec!["", "-"]);
        assert_eq!(config.output.report_json, Some(PathBuf::from("report.json")));
        assert_eq!(config.output.wasp_summary, PathBuf::from("wasp_summary_matrix.csv"));
        assert_eq!(config.heatmap.title, "Polistes 2020");
        assert_eq!(config.heatmap.width, 600);
        assert_eq!(config.heatmap.height, 900);
    }

    #[test]
    fn test_resolve_output_paths() {
        let mut output = OutputConfig::default();
        output.dir = PathBuf::from("results");
        assert_eq!(
            output.resolve(Path::new("m.csv")),
            PathBuf::from("results").join("m.csv")
        );

        let absolute = std::env::temp_dir().join("m.csv");
        assert_eq!(output.resolve(&absolute), absolute);
    }

    #[test]
    fn test_validate_chart_size() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.heatmap.width = 50;
        assert!(config.validate().is_err());

        config.heatmap.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[input]\npath = \"x.csv\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.input.path, PathBuf::from("x.csv"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[heatmap]"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.heatmap.width, 900);
    }
}
