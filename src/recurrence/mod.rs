mod rule;

pub use rule::{first_period_from, months_between, occurs_on, period_date, period_index};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::limits::MAX_OCCURRENCES_PER_RULE;
use crate::model::*;

/// Recurrence expansion engine: turns base activities with a rule into
/// concrete dated clones inside a query range.
#[derive(Debug, Clone)]
pub struct RecurrenceExpander {
    /// Most clones produced for one rule in one call.
    pub max_occurrences: usize,
}

impl Default for RecurrenceExpander {
    fn default() -> Self {
        Self {
            max_occurrences: MAX_OCCURRENCES_PER_RULE,
        }
    }
}

impl RecurrenceExpander {
    pub fn new(max_occurrences: usize) -> Self {
        Self {
            max_occurrences: max_occurrences.max(1),
        }
    }

    /// Every input activity unchanged, each followed by its clones in date order.
    ///
    /// The base is emitted regardless of range; clones only for dates in
    /// `[range_start, range_end]` after the base's own date.
    pub fn expand(&self, activities: &[Activity], range_start: NaiveDate, range_end: NaiveDate) -> Vec<Activity> {
        let mut out = Vec::with_capacity(activities.len());
        let mut clones_total = 0u64;
        for base in activities {
            out.push(base.clone());
            let dates = self.occurrences(base, range_start, range_end);
            clones_total += dates.len() as u64;
            out.extend(dates.into_iter().map(|d| make_clone(base, d)));
        }
        if clones_total > 0 {
            metrics::counter!(crate::observability::RECURRENCE_CLONES_TOTAL).increment(clones_total);
        }
        debug!(
            base = activities.len(),
            clones = clones_total,
            %range_start,
            %range_end,
            "expanded recurring activities"
        );
        out
    }

    /// Dates in `[range_start, range_end]` on which `base` recurs, excluding its own date.
    pub fn occurrences(&self, base: &Activity, range_start: NaiveDate, range_end: NaiveDate) -> Vec<NaiveDate> {
        let Some(rule) = &base.recurring else {
            return Vec::new();
        };
        // Clones carry their rule for traceability only.
        if rule.is_clone {
            return Vec::new();
        }
        if !rule.is_valid() {
            debug!(id = %base.id, kind = ?rule.kind, interval = rule.interval, "ignoring invalid recurrence rule");
            metrics::counter!(crate::observability::RECURRENCE_RULES_IGNORED_TOTAL).increment(1);
            return Vec::new();
        }

        let Some(after_anchor) = base.date.succ_opt() else {
            return Vec::new();
        };
        let start = range_start.max(after_anchor);
        let end = match rule.until {
            Some(until) => range_end.min(until),
            None => range_end,
        };
        if end < start {
            return Vec::new();
        }

        // Jump from period to period; work follows the number of occurrences, not the range width.
        let mut dates = Vec::new();
        let mut period = first_period_from(rule, base.date, start).max(1);
        while rule.count.is_none_or(|count| period < i64::from(count)) {
            let Some(date) = period_date(rule, base.date, period) else {
                break;
            };
            if date > end {
                break;
            }
            if date >= start && occurs_on(rule, base.date, date) {
                if dates.len() == self.max_occurrences {
                    warn!(
                        id = %base.id,
                        max_occurrences = self.max_occurrences,
                        last = %dates.last().copied().unwrap_or(start),
                        "recurrence expansion truncated"
                    );
                    metrics::counter!(crate::observability::RECURRENCE_OCCURRENCES_TRUNCATED_TOTAL).increment(1);
                    break;
                }
                dates.push(date);
            }
            period += 1;
        }
        dates
    }
}

/// Shallow copy of `base` placed on `date`, with a deterministic synthetic id.
fn make_clone(base: &Activity, date: NaiveDate) -> Activity {
    let mut clone = base.clone();
    clone.id = ActivityId::Text(format!("{}_recurring_{}", base.id, date.format("%Y-%m-%d")));
    clone.date = date;
    if let Some(rule) = clone.recurring.as_mut() {
        rule.original_id = Some(base.id.clone());
        rule.is_clone = true;
    }
    clone
}

/// Expand with the default window limit.
pub fn expand(activities: &[Activity], range_start: NaiveDate, range_end: NaiveDate) -> Vec<Activity> {
    RecurrenceExpander::default().expand(activities, range_start, range_end)
}
