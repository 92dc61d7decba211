//! Configuration for pddlpatch

use eyre::{Context, Result};
use plantrace::TraceFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-project config, looked up in the working directory
const LOCAL_CONFIG: &str = ".pddlpatch.yml";

/// Main pddlpatch configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Markers used to slice planner output
    pub trace: TraceFormat,

    /// Predicates that are never completed under the closed-world assumption
    pub open_world_predicates: Vec<String>,
}

impl Config {
    /// Resolve configuration: the explicit path if given, otherwise the first
    /// readable file from [`Config::search_paths`], otherwise built-in defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Ignoring unusable config {}: {:#}", candidate.display(), e),
            }
        }

        debug!("Config::load: no config file, using default trace format");
        Ok(Self::default())
    }

    /// Implicit config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pddlpatch").join("pddlpatch.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Using config {}", path.display());
        Ok(config)
    }
}
