use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StintConfig {
    /// Base URL of the platform API, e.g. "https://app.example.com"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Workspace slug used when `--workspace` is not passed.
    #[serde(default)]
    pub workspace: Option<String>,
    /// Project id used when `--project` is not passed.
    #[serde(default)]
    pub project: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for StintConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            workspace: None,
            project: None,
        }
    }
}

impl StintConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("stint")
            .join("config.toml"))
    }

    pub fn session_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("stint")
            .join("session"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Load the saved session cookie from disk. Returns None if not logged in.
    pub fn load_session() -> Result<Option<String>> {
        let path = Self::session_path()?;
        if !path.exists() {
            return Ok(None);
        }
        let session = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let session = session.trim().to_string();
        if session.is_empty() {
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Save the session cookie to disk.
    pub fn save_session(session_id: &str) -> Result<()> {
        let path = Self::session_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, session_id)?;
        Ok(())
    }
}
