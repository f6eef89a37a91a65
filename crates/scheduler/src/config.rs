use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Scheduler configuration, typically parsed from the `[scheduler]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Name given to the consumer thread.
    #[serde(default = "default_worker_thread_name")]
    pub worker_thread_name: String,
    /// Upper bound on a single scheduled-wait, in milliseconds. 0 = no cap.
    ///
    /// The consumer re-reads the clock at least this often, so a wall-clock
    /// adjustment cannot park it far past a task's scheduled time.
    #[serde(default = "default_max_scheduled_wait_ms")]
    pub max_scheduled_wait_ms: u64,
    /// Start the consumer as soon as the scheduler is constructed.
    #[serde(default)]
    pub auto_start: bool,
    /// Begin with input paused.
    #[serde(default)]
    pub start_paused: bool,
}

fn default_worker_thread_name() -> String {
    "tempo-scheduler".to_string()
}

fn default_max_scheduled_wait_ms() -> u64 {
    60_000
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            worker_thread_name: default_worker_thread_name(),
            max_scheduled_wait_ms: default_max_scheduled_wait_ms(),
            auto_start: false,
            start_paused: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    scheduler: Option<SchedulerConfig>,
}

impl SchedulerConfig {
    /// Parse config from a TOML string, then apply `TEMPO_*` env overrides and validate.
    ///
    /// A document without a `[scheduler]` table yields the defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchedulerError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        let mut config = file.scheduler.unwrap_or_default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Apply environment variable overrides.
    ///
    /// - `TEMPO_WORKER_THREAD_NAME` -> `worker_thread_name`
    /// - `TEMPO_MAX_SCHEDULED_WAIT_MS` -> `max_scheduled_wait_ms`
    /// - `TEMPO_AUTO_START` -> `auto_start`
    /// - `TEMPO_START_PAUSED` -> `start_paused`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are ignored.
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TEMPO_WORKER_THREAD_NAME") {
            self.worker_thread_name = v;
        }
        if let Some(ms) = lookup("TEMPO_MAX_SCHEDULED_WAIT_MS").and_then(|v| v.parse().ok()) {
            self.max_scheduled_wait_ms = ms;
        }
        if let Some(b) = lookup("TEMPO_AUTO_START").and_then(|v| parse_bool(&v)) {
            self.auto_start = b;
        }
        if let Some(b) = lookup("TEMPO_START_PAUSED").and_then(|v| parse_bool(&v)) {
            self.start_paused = b;
        }
    }

    /// Validate the config.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.worker_thread_name.trim().is_empty() {
            return Err(SchedulerError::Config(
                "worker_thread_name must not be empty".into(),
            ));
        }
        if self.worker_thread_name.contains('\0') {
            return Err(SchedulerError::Config(
                "worker_thread_name must not contain NUL bytes".into(),
            ));
        }
        Ok(())
    }

    /// The cap on one scheduled-wait, if any.
    pub fn max_scheduled_wait(&self) -> Option<Duration> {
        match self.max_scheduled_wait_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// How long the consumer may sleep when the next task is `until` away.
    pub(crate) fn scheduled_wait(&self, until: chrono::Duration) -> Duration {
        let wait = until.to_std().unwrap_or(Duration::ZERO);
        match self.max_scheduled_wait() {
            Some(cap) => wait.min(cap),
            None => wait,
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.worker_thread_name, "tempo-scheduler");
        assert_eq!(config.max_scheduled_wait_ms, 60_000);
        assert!(!config.auto_start);
        assert!(!config.start_paused);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_scheduler_table() {
        let file: ConfigFile = toml::from_str(
            r#"
            [scheduler]
            worker_thread_name = "batch"
            max_scheduled_wait_ms = 250
            start_paused = true
            "#,
        )
        .unwrap();
        let config = file.scheduler.unwrap();
        assert_eq!(config.worker_thread_name, "batch");
        assert_eq!(config.max_scheduled_wait_ms, 250);
        assert!(config.start_paused);
        assert!(!config.auto_start);
    }

    #[test]
    fn missing_table_yields_defaults() {
        let file: ConfigFile = toml::from_str("[other]\nkey = 1\n").unwrap();
        assert!(file.scheduler.is_none());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SchedulerConfig::from_toml("[scheduler\n").unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigParse(_)));
    }

    #[test]
    fn from_file_reads_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\nmax_scheduled_wait_ms = 0").unwrap();
        let config = SchedulerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_scheduled_wait(), None);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchedulerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigIo(_)));
    }

    #[test]
    fn overrides_apply_and_ignore_garbage() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TEMPO_WORKER_THREAD_NAME", "override"),
            ("TEMPO_MAX_SCHEDULED_WAIT_MS", "not-a-number"),
            ("TEMPO_AUTO_START", "yes"),
            ("TEMPO_START_PAUSED", "maybe"),
        ]);
        let mut config = SchedulerConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.worker_thread_name, "override");
        assert_eq!(config.max_scheduled_wait_ms, 60_000);
        assert!(config.auto_start);
        assert!(!config.start_paused);
    }

    #[test]
    fn empty_thread_name_rejected() {
        let config = SchedulerConfig {
            worker_thread_name: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SchedulerError::Config(_))));
    }

    #[test]
    fn scheduled_wait_is_capped() {
        let config = SchedulerConfig {
            max_scheduled_wait_ms: 100,
            ..Default::default()
        };
        assert_eq!(
            config.scheduled_wait(chrono::Duration::seconds(5)),
            Duration::from_millis(100)
        );
        assert_eq!(
            config.scheduled_wait(chrono::Duration::milliseconds(40)),
            Duration::from_millis(40)
        );
        assert_eq!(
            config.scheduled_wait(chrono::Duration::milliseconds(-5)),
            Duration::ZERO
        );
    }
}
