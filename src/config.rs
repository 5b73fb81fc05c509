use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::limits::*;
use crate::model::Minutes;

/// Calendar view a layout is computed for; selects the minimum block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Day,
    Week,
}

/// Visual density of the timeline grid.
///
/// Missing fields fall back to the defaults, so a host can deserialize a
/// partial table from its own settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub pixels_per_hour: f64,
    pub min_height_px: f64,
    pub max_columns: usize,
    pub default_duration_minutes: Minutes,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_hour: DEFAULT_PIXELS_PER_HOUR,
            min_height_px: DEFAULT_MIN_HEIGHT_PX,
            max_columns: DEFAULT_MAX_COLUMNS,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl LayoutConfig {
    pub fn for_view(view: ViewKind) -> Self {
        let min_height_px = match view {
            ViewKind::Day => DAY_VIEW_MIN_HEIGHT_PX,
            ViewKind::Week => WEEK_VIEW_MIN_HEIGHT_PX,
        };
        Self {
            min_height_px,
            ..Self::default()
        }
    }

    pub fn pixels_per_minute(&self) -> f64 {
        self.pixels_per_hour / 60.0
    }

    /// Height in pixels of the full 24-hour grid.
    pub fn grid_height(&self) -> f64 {
        f64::from(MINUTES_PER_DAY) * self.pixels_per_minute()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pixels_per_hour.is_finite()
            || self.pixels_per_hour <= 0.0
            || self.pixels_per_hour > MAX_PIXELS_PER_HOUR
        {
            return Err(ConfigError::PixelsPerHour(self.pixels_per_hour));
        }
        if !self.min_height_px.is_finite()
            || self.min_height_px < 0.0
            || self.min_height_px > self.grid_height()
        {
            return Err(ConfigError::MinHeight(self.min_height_px));
        }
        if self.max_columns == 0 || self.max_columns > MAX_COLUMNS_LIMIT {
            return Err(ConfigError::MaxColumns(self.max_columns));
        }
        if self.default_duration_minutes == 0 || self.default_duration_minutes > MINUTES_PER_DAY {
            return Err(ConfigError::DefaultDuration(self.default_duration_minutes));
        }
        Ok(())
    }
}
