//! Run configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The CLI loads an optional JSON file and then applies its flags on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::{DEFAULT_RESOLUTION, MIN_RESOLUTION};
use crate::models::WeekLayout;
use crate::search::SearchStrategy;

/// Errors while loading or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid week layout: {0}")]
    InvalidWeek(String),

    #[error("calendar resolution {0}x{1} is below the minimum {2}x{3}")]
    ResolutionTooSmall(u32, u32, u32, u32),
}

/// Which writers run for accepted schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// One line per cell.
    pub plain_text: bool,
    /// Fixed-width text calendar.
    pub text_calendar: bool,
    /// JSON report.
    pub json: bool,
    /// Raster week calendar.
    pub png_calendar: bool,
    /// Raster calendar size in pixels, `[width, height]`.
    pub calendar_resolution: (u32, u32),
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plain_text: false,
            text_calendar: false,
            json: true,
            png_calendar: true,
            calendar_resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Directory holding `<subject>.txt` definitions.
    pub input_dir: PathBuf,
    /// Directory receiving rendered schedules.
    pub output_dir: PathBuf,
    /// Remove old files from `output_dir` before the run.
    pub cleanup_at_start: bool,
    /// Schedulable part of the week.
    pub week: WeekLayout,
    /// Enabled writers.
    pub outputs: OutputConfig,
    /// Exploration order.
    pub strategy: SearchStrategy,
    /// Stop after this many accepted schedules.
    pub limit: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("subjects"),
            output_dir: PathBuf::from("schedules"),
            cleanup_at_start: true,
            week: WeekLayout::default(),
            outputs: OutputConfig::default(),
            strategy: SearchStrategy::default(),
            limit: None,
        }
    }
}

impl RunConfig {
    /// Parses a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the week layout and the calendar resolution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.outputs.calendar_resolution;
        let (min_width, min_height) = MIN_RESOLUTION;
        if self.outputs.png_calendar && (width < min_width || height < min_height) {
            return Err(ConfigError::ResolutionTooSmall(
                width, height, min_width, min_height,
            ));
        }

        let week = &self.week;
        if !(1..=7).contains(&week.days) {
            return Err(ConfigError::InvalidWeek(format!(
                "days must be between 1 and 7, got {}",
                week.days
            )));
        }
        if week.end_hour > 24 {
            return Err(ConfigError::InvalidWeek(format!(
                "end hour {} is past midnight",
                week.end_hour
            )));
        }
        if week.start_hour >= week.end_hour {
            return Err(ConfigError::InvalidWeek(format!(
                "start hour {} is not before end hour {}",
                week.start_hour, week.end_hour
            )));
        }
        Ok(())
    }
}
