//! Configuration for shelf paths and the web server.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHELF_HOME, SHELF_DATA)
//! 2. Config file (.shelf/config.yaml)
//! 3. Defaults (~/.shelf/data.json, 127.0.0.1:8080)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shelf/config.yaml
//! - `paths.home` is relative to the .shelf/ directory
//! - `paths.data` is relative to the project root (the parent of .shelf/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Default bind address for `shelf serve`
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// Snapshot file name inside the home directory
pub const DATA_FILE: &str = "data.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .shelf/)
    pub home: Option<String>,
    /// Snapshot file (relative to the project root)
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// JSON snapshot file
    pub data_file: PathBuf,
    /// Web server bind address
    pub address: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shelf").join("config.yaml");
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

/// Resolve a path that may be relative to `base`
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

/// Environment overrides, read once per resolution
struct EnvOverrides {
    home: Option<PathBuf>,
    data: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("SHELF_HOME").ok().map(PathBuf::from),
            data: std::env::var("SHELF_DATA").ok().map(PathBuf::from),
        }
    }
}

/// Combine defaults, an optional config file, and env overrides
fn resolve(
    default_home: PathBuf,
    config: Option<(&Path, ConfigFile)>,
    env: EnvOverrides,
) -> ResolvedConfig {
    match config {
        Some((config_path, config)) => {
            let shelf_dir = config_path.parent().unwrap_or(Path::new("."));
            let base_dir = shelf_dir.parent().unwrap_or(Path::new("."));

            let home = if let Some(home) = env.home {
                home
            } else if let Some(ref home_path) = config.paths.home {
                resolve_path(shelf_dir, home_path)
            } else {
                default_home
            };

            let data_file = if let Some(data) = env.data {
                data
            } else if let Some(ref data_path) = config.paths.data {
                resolve_path(base_dir, data_path)
            } else {
                home.join(DATA_FILE)
            };

            let address = config
                .server
                .and_then(|s| s.address)
                .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

            ResolvedConfig {
                home,
                data_file,
                address,
                config_file: Some(config_path.to_path_buf()),
            }
        }
        None => {
            let home = env.home.unwrap_or(default_home);
            let data_file = env.data.unwrap_or_else(|| home.join(DATA_FILE));

            ResolvedConfig {
                home,
                data_file,
                address: DEFAULT_ADDRESS.to_string(),
                config_file: None,
            }
        }
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".shelf");

    let config_path = find_config_file();
    let config = match config_path {
        Some(ref path) => Some((path.as_path(), load_config_file(path)?)),
        None => None,
    };

    Ok(resolve(default_home, config, EnvOverrides::from_env()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the snapshot file path
pub fn data_file() -> Result<PathBuf> {
    Ok(config()?.data_file.clone())
}
