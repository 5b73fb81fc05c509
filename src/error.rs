#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Not of the form `HH:MM` or `HH:MM:SS`.
    Malformed(String),
    OutOfRange(String),
    InvalidDate(String),
}

impl std::fmt::Display for TimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeError::Malformed(s) => write!(f, "malformed time of day: {s:?}"),
            TimeError::OutOfRange(s) => write!(f, "time of day out of range: {s:?}"),
            TimeError::InvalidDate(s) => write!(f, "invalid date {s:?}, expected YYYY-MM-DD"),
        }
    }
}

impl std::error::Error for TimeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    PixelsPerHour(f64),
    MinHeight(f64),
    MaxColumns(usize),
    DefaultDuration(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::PixelsPerHour(v) => {
                write!(f, "pixels_per_hour must be positive and finite, got {v}")
            }
            ConfigError::MinHeight(v) => {
                write!(f, "min_height_px must fit inside the day grid, got {v}")
            }
            ConfigError::MaxColumns(v) => write!(f, "max_columns out of range: {v}"),
            ConfigError::DefaultDuration(v) => {
                write!(f, "default_duration_minutes out of range: {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
