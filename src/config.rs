//! Configuration for course backups.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (COURSE_BACKUP_ROOT, COURSE_BACKUP_SUBTITLES,
//!    COURSE_BACKUP_RESOLUTION)
//! 3. Config file (.course-backup/config.yaml)
//! 4. Defaults (~/course-backups, subtitles on, 1080p)
//!
//! Config file discovery:
//! - Searches current directory and parents for .course-backup/config.yaml
//! - Relative paths in the config file resolve against the project root
//!   (the directory containing .course-backup/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{AudioSelection, PlanOptions, TitleCollisionPolicy};

/// Directory searched for in the current directory and its parents
const CONFIG_DIR: &str = ".course-backup";
const CONFIG_FILE: &str = "config.yaml";

const ENV_ROOT: &str = "COURSE_BACKUP_ROOT";
const ENV_SUBTITLES: &str = "COURSE_BACKUP_SUBTITLES";
const ENV_RESOLUTION: &str = "COURSE_BACKUP_RESOLUTION";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub plan: Option<PlanConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Backup root directory (relative to the project root)
    pub root: Option<String>,
}

/// Planning overrides; unset fields keep their defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanConfig {
    pub load_subtitles: Option<bool>,
    pub target_resolution: Option<u32>,
    pub audio_selection: Option<AudioSelection>,
    pub title_collisions: Option<TitleCollisionPolicy>,
}

impl PlanConfig {
    /// Apply the set fields on top of `options`
    fn apply(&self, mut options: PlanOptions) -> PlanOptions {
        if let Some(v) = self.load_subtitles {
            options.load_subtitles = v;
        }
        if let Some(v) = self.target_resolution {
            options.target_resolution = v;
        }
        if let Some(v) = self.audio_selection {
            options.audio_selection = v;
        }
        if let Some(v) = self.title_collisions {
            options.title_collisions = v;
        }
        options
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding one subdirectory per backed-up course
    pub root: PathBuf,
    /// Planning options
    pub options: PlanOptions,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Parse a boolean environment value ("1", "true", "yes", "on" and negatives)
fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean value: {}", value),
    }
}

/// Apply environment overrides to planning options
fn apply_env(mut options: PlanOptions) -> Result<PlanOptions> {
    if let Ok(value) = std::env::var(ENV_SUBTITLES) {
        options.load_subtitles =
            parse_bool(&value).with_context(|| format!("Invalid {}", ENV_SUBTITLES))?;
    }
    if let Ok(value) = std::env::var(ENV_RESOLUTION) {
        options.target_resolution = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_RESOLUTION, value))?;
    }
    Ok(options)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_root = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join("course-backups");

    let config_file = find_config_file();

    let (root, options) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Project root is the parent of .course-backup/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        let root = if let Ok(env_root) = std::env::var(ENV_ROOT) {
            PathBuf::from(env_root)
        } else if let Some(ref root_path) = config.paths.root {
            resolve_path(base_dir, root_path)
        } else {
            default_root
        };

        let options = config
            .plan
            .as_ref()
            .map(|p| p.apply(PlanOptions::default()))
            .unwrap_or_default();

        (root, options)
    } else {
        let root = std::env::var(ENV_ROOT)
            .map(PathBuf::from)
            .unwrap_or(default_root);

        (root, PlanOptions::default())
    };

    Ok(ResolvedConfig {
        root,
        options: apply_env(options)?,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
