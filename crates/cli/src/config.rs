use std::path::PathBuf;

use anyhow::{Context, Result};
use tempo_scheduler::SchedulerConfig;
use tracing::debug;

/// Return the default config directory path: ~/.config/tempo/
pub fn default_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("could not determine user config directory")?
        .join("tempo");
    Ok(config_dir)
}

/// Return the default config file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join("config.toml"))
}

/// Load the scheduler config from the given path, or the default path.
///
/// A missing default file yields the defaults (with env overrides applied);
/// a missing explicit path is an error.
pub fn load(path: Option<&str>) -> Result<SchedulerConfig> {
    let (config_path, explicit) = match path {
        Some(p) => (PathBuf::from(p), true),
        None => (default_config_path()?, false),
    };

    if explicit || config_path.exists() {
        debug!(?config_path, "Loading config");
        SchedulerConfig::from_file(&config_path)
            .with_context(|| format!("failed to load config: {}", config_path.display()))
    } else {
        debug!(?config_path, "Config file not found, using defaults");
        let mut config = SchedulerConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\nworker_thread_name = \"cli-test\"").unwrap();
        let config = load(file.path().to_str()).unwrap();
        assert_eq!(config.worker_thread_name, "cli-test");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn default_path_under_tempo_dir() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("tempo/config.toml"));
        }
    }
}
