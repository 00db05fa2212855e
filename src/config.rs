use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_FILTER: &str = "mediation=info";
const DEFAULT_FILE_PREFIX: &str = "mediation.log";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    /// Also write log lines to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("mediation").join("logs"))
    }

    pub fn ensure_log_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.log_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}

impl Settings {
    /// Reads JSON settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&data)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
