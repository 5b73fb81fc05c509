//! Metric names. The crate records through the `metrics` facade only; a host
//! that wants them exported installs its own recorder.

// ── Layout ──────────────────────────────────────────────────────

/// Counter: activities positioned by the layout engine.
pub const LAYOUT_ACTIVITIES_TOTAL: &str = "daygrid_layout_activities_total";

/// Counter: activities that found every column taken and were stacked on column 0.
pub const LAYOUT_COLUMN_OVERFLOW_TOTAL: &str = "daygrid_layout_column_overflow_total";

/// Counter: time strings that failed to parse and were replaced by a default.
/// Labels: field (`start` | `end`).
pub const MALFORMED_TIME_TOTAL: &str = "daygrid_malformed_time_total";

// ── Time cache ──────────────────────────────────────────────────

pub const TIME_CACHE_HITS_TOTAL: &str = "daygrid_time_cache_hits_total";
pub const TIME_CACHE_MISSES_TOTAL: &str = "daygrid_time_cache_misses_total";

// ── Recurrence ──────────────────────────────────────────────────

/// Counter: clones generated by recurrence expansion.
pub const RECURRENCE_CLONES_TOTAL: &str = "daygrid_recurrence_clones_total";

/// Counter: recurrence rules skipped because they were invalid.
pub const RECURRENCE_RULES_IGNORED_TOTAL: &str = "daygrid_recurrence_rules_ignored_total";

/// Counter: rules whose clones hit the per-rule occurrence limit.
pub const RECURRENCE_OCCURRENCES_TRUNCATED_TOTAL: &str = "daygrid_recurrence_occurrences_truncated_total";
