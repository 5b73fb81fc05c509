mod columns;

pub use columns::{pack_columns, Placement};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::TimeError;
use crate::limits::MINUTES_PER_DAY;
use crate::model::*;
use crate::time::{parse_time_of_day, TimeCache};

/// One activity queued for layout.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<'a> {
    pub activity: &'a Activity,
    /// Overnight tail from the previous day.
    pub continued: bool,
}

/// Interval layout engine: positions a day's activities on the timeline grid.
///
/// Stateless apart from the optional, caller-owned `TimeCache`.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
    cache: Option<Arc<TimeCache>>,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<TimeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// One layout per input activity, ordered by start time (ties keep input order).
    pub fn compute(&self, activities: &[Activity]) -> Vec<ActivityLayout> {
        let entries: Vec<Entry<'_>> = activities
            .iter()
            .map(|activity| Entry {
                activity,
                continued: false,
            })
            .collect();
        self.compute_entries(&entries)
    }

    pub(crate) fn compute_entries(&self, entries: &[Entry<'_>]) -> Vec<ActivityLayout> {
        if entries.is_empty() {
            return Vec::new();
        }

        // Step 1: resolve times, then sort by start. `sort_by_key` is stable.
        let spans: Vec<Span> = entries.iter().map(|e| self.resolve_span(e.activity)).collect();
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&i| spans[i].start);
        let sorted: Vec<Span> = order.iter().map(|&i| spans[i]).collect();

        // Step 2: columns
        let placements = pack_columns(&sorted, self.config.max_columns);

        // Step 3: geometry
        let mut overflowed = 0u64;
        let layouts: Vec<ActivityLayout> = order
            .iter()
            .zip(sorted.iter().zip(&placements))
            .map(|(&i, (span, placement))| {
                if placement.overflowed {
                    overflowed += 1;
                    debug!(
                        id = %entries[i].activity.id,
                        max_columns = self.config.max_columns,
                        "no free column, stacking on column 0"
                    );
                }
                self.position(entries[i], *span, *placement)
            })
            .collect();

        metrics::counter!(crate::observability::LAYOUT_ACTIVITIES_TOTAL).increment(layouts.len() as u64);
        if overflowed > 0 {
            metrics::counter!(crate::observability::LAYOUT_COLUMN_OVERFLOW_TOTAL).increment(overflowed);
        }
        debug!(activities = layouts.len(), overflowed, "computed layouts");
        layouts
    }

    fn parse(&self, s: &str) -> Result<Minutes, TimeError> {
        match &self.cache {
            Some(cache) => cache.parse(s),
            None => parse_time_of_day(s),
        }
    }

    /// Minute span used for packing. End is normalized past 1440 for
    /// midnight-crossing activities and is never equal to start.
    fn resolve_span(&self, activity: &Activity) -> Span {
        let start = match self.parse(&activity.start_time) {
            Ok(m) => m.min(MINUTES_PER_DAY - 1),
            Err(e) => {
                warn!(id = %activity.id, error = %e, "unreadable start time, using 00:00");
                metrics::counter!(crate::observability::MALFORMED_TIME_TOTAL, "field" => "start").increment(1);
                0
            }
        };

        let fallback = start.saturating_add(self.config.default_duration_minutes);
        let end = match activity.end_time.as_deref().map(|s| self.parse(s)) {
            Some(Ok(m)) if m < start => m + MINUTES_PER_DAY,
            Some(Ok(m)) => m,
            Some(Err(e)) => {
                warn!(
                    id = %activity.id,
                    error = %e,
                    minutes = self.config.default_duration_minutes,
                    "unreadable end time, using default duration"
                );
                metrics::counter!(crate::observability::MALFORMED_TIME_TOTAL, "field" => "end").increment(1);
                fallback
            }
            None => fallback,
        };

        // Zero-length activities still claim a column.
        Span::new(start, end.max(start + 1))
    }

    fn position(&self, entry: Entry<'_>, span: Span, placement: Placement) -> ActivityLayout {
        let ppm = self.config.pixels_per_minute();
        let grid = self.config.grid_height();
        let min_height = self.config.min_height_px;

        // Only the part before midnight is drawn on this day.
        let visible_end = span.end.min(MINUTES_PER_DAY);
        let mut top = f64::from(span.start) * ppm;
        let mut height = (f64::from(visible_end - span.start) * ppm).max(min_height);
        if top + height > grid {
            if grid - top >= min_height {
                height = grid - top;
            } else {
                top = (grid - min_height).max(0.0);
                height = min_height;
            }
        }

        let total_columns = placement.total_columns.max(1);
        let width = 100.0 / total_columns as f64;
        let left = placement.column as f64 * width;

        ActivityLayout {
            activity: entry.activity.clone(),
            top,
            height,
            left,
            width,
            column: placement.column,
            total_columns,
            continued: entry.continued,
        }
    }
}

/// Lay out one day's activities with the given configuration.
pub fn compute_layouts(activities: &[Activity], config: &LayoutConfig) -> Vec<ActivityLayout> {
    LayoutEngine::new(config.clone()).compute(activities)
}
