//! Named defaults and hard ceilings for the layout and expansion engines.

use crate::model::Minutes;

/// Minutes in one calendar day; the height of the timeline grid.
pub const MINUTES_PER_DAY: Minutes = 1_440;

/// Duration substituted when an activity has no usable end time.
pub const DEFAULT_DURATION_MINUTES: Minutes = 60;

pub const DEFAULT_PIXELS_PER_HOUR: f64 = 90.0;

/// Minimum rendered height of an activity block.
pub const DEFAULT_MIN_HEIGHT_PX: f64 = 20.0;
pub const DAY_VIEW_MIN_HEIGHT_PX: f64 = 45.0;
pub const WEEK_VIEW_MIN_HEIGHT_PX: f64 = 20.0;

/// Side-by-side columns before overlapping activities start stacking on column 0.
pub const DEFAULT_MAX_COLUMNS: usize = 3;

/// Upper bound accepted by `LayoutConfig::validate` for `max_columns`.
pub const MAX_COLUMNS_LIMIT: usize = 24;

/// Upper bound accepted for `pixels_per_hour`.
pub const MAX_PIXELS_PER_HOUR: f64 = 1_000.0;

/// Most clones one recurring activity yields per expansion call
/// (a daily rule over about 270 years).
pub const MAX_OCCURRENCES_PER_RULE: usize = 100_000;
