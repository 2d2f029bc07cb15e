use crate::classify::{
    HIGH_SCORE_THRESHOLD, NEW_ANNOUNCEMENT_WINDOW_DAYS, URGENT_DEADLINE_WINDOW_DAYS,
};
use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default data directory ($HOME/.grantbot/data)
pub fn default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| {
            Error::Config(
                "Could not determine home directory. Set HOME or USERPROFILE environment variable."
                    .to_string(),
            )
        })?;

    Ok(PathBuf::from(home).join(".grantbot").join("data"))
}

/// Configuration for the recommendation service
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the exported store tables
    pub data_dir: PathBuf,
    /// Reference day; `None` means the local calendar day at query time
    pub today: Option<NaiveDate>,
    pub new_window_days: i64,
    pub urgent_window_days: i64,
    pub high_score_threshold: f64,
    /// Ranked queries drop scores below this; 0 disables the cut
    pub min_score: f64,
    pub limit: Option<usize>,
}

impl Config {
    /// Create a new default configuration
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            today: None,
            new_window_days: NEW_ANNOUNCEMENT_WINDOW_DAYS,
            urgent_window_days: URGENT_DEADLINE_WINDOW_DAYS,
            high_score_threshold: HIGH_SCORE_THRESHOLD,
            min_score: 0.0,
            limit: None,
        }
    }

    /// The reference day for temporal queries
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.new_window_days < 0 {
            return Err(Error::Config(format!(
                "new_window_days must not be negative: {}",
                self.new_window_days
            )));
        }

        if self.urgent_window_days < 0 {
            return Err(Error::Config(format!(
                "urgent_window_days must not be negative: {}",
                self.urgent_window_days
            )));
        }

        if !self.high_score_threshold.is_finite() || !self.min_score.is_finite() {
            return Err(Error::Config(
                "score thresholds must be finite numbers".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("data")
    }
}

/// Optional settings read from a YAML file (grantbot.yml)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub new_window_days: Option<i64>,
    pub urgent_window_days: Option<i64>,
    pub high_score_threshold: Option<f64>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
}

/// Load and parse a grantbot.yml configuration file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(data_dir),
        }
    }

    /// Pin the reference day
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.config.today = Some(today);
        self
    }

    /// Pin the reference day from a `YYYY-MM-DD` string
    pub fn today_str(mut self, today: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(today.trim(), "%Y-%m-%d").map_err(|_| {
            Error::Config(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD",
                today.trim()
            ))
        })?;
        self.config.today = Some(date);
        Ok(self)
    }

    pub fn new_window_days(mut self, days: i64) -> Self {
        self.config.new_window_days = days;
        self
    }

    pub fn urgent_window_days(mut self, days: i64) -> Self {
        self.config.urgent_window_days = days;
        self
    }

    pub fn high_score_threshold(mut self, threshold: f64) -> Self {
        self.config.high_score_threshold = threshold;
        self
    }

    pub fn min_score(mut self, score: f64) -> Self {
        self.config.min_score = score;
        self
    }

    /// Set the limit; 0 means no limit
    pub fn limit(mut self, limit: usize) -> Self {
        if limit == 0 {
            return self.no_limit();
        }
        self.config.limit = Some(limit);
        self
    }

    /// Clear the limit
    pub fn no_limit(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Overlay every setting present in `file`
    pub fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(dir) = file.data_dir {
            self.config.data_dir = dir;
        }
        if let Some(days) = file.new_window_days {
            self.config.new_window_days = days;
        }
        if let Some(days) = file.urgent_window_days {
            self.config.urgent_window_days = days;
        }
        if let Some(threshold) = file.high_score_threshold {
            self.config.high_score_threshold = threshold;
        }
        if let Some(score) = file.min_score {
            self.config.min_score = score;
        }
        if let Some(limit) = file.limit {
            self = self.limit(limit);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
