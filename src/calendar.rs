//! Query pipeline for day, week and month views: expand recurring activities,
//! filter, group per day, then lay each day out.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::layout::{Entry, LayoutEngine};
use crate::model::*;
use crate::recurrence::RecurrenceExpander;
use crate::time::parse_time_of_day;

/// An inclusive date range plus an optional category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    /// `None` keeps every category.
    pub types: Option<Vec<ActivityType>>,
}

impl CalendarQuery {
    pub fn new(range_start: NaiveDate, range_end: NaiveDate) -> Self {
        Self {
            range_start,
            range_end,
            types: None,
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The seven days containing `date`, starting on `week_start`.
    pub fn week_of(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
        let start = date - Duration::days(i64::from(offset));
        Self::new(start, start + Duration::days(6))
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.day0()));
        let next_month = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(start);
        Self::new(start, end)
    }

    pub fn with_types(mut self, types: Vec<ActivityType>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    pub fn accepts(&self, activity: &Activity) -> bool {
        self.types
            .as_ref()
            .is_none_or(|types| types.contains(&activity.activity_type))
    }

    /// Every date in the range, in order. Empty if the range is inverted.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.range_start.iter_days().take_while(move |d| *d <= self.range_end)
    }
}

/// Expanded, filtered activity instances grouped by date. Every date of the
/// range has an entry, possibly empty.
pub fn activities_by_day(activities: &[Activity], query: &CalendarQuery) -> BTreeMap<NaiveDate, Vec<Activity>> {
    let mut days: BTreeMap<NaiveDate, Vec<Activity>> = query.days().map(|d| (d, Vec::new())).collect();
    for instance in RecurrenceExpander::default().expand(activities, query.range_start, query.range_end) {
        if !query.accepts(&instance) {
            continue;
        }
        if let Some(day) = days.get_mut(&instance.date) {
            day.push(instance);
        }
    }
    days
}

/// Layouts for every date in the range.
///
/// Activities running past midnight also get a `continued` segment from
/// 00:00 on the following day, including one carried in from the day before
/// the range.
pub fn layout_days(
    activities: &[Activity],
    query: &CalendarQuery,
    engine: &LayoutEngine,
) -> BTreeMap<NaiveDate, Vec<ActivityLayout>> {
    let mut result = BTreeMap::new();
    if query.range_end < query.range_start {
        return result;
    }

    // Widen by one day so an overnight activity from the day before still shows its tail.
    let widened = CalendarQuery {
        range_start: query.range_start.pred_opt().unwrap_or(query.range_start),
        ..query.clone()
    };
    let by_day = activities_by_day(activities, &widened);

    let mut tails: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
    for (date, instances) in &by_day {
        let Some(next) = date.succ_opt() else { continue };
        if !query.contains(next) {
            continue;
        }
        for instance in instances {
            if let Some(tail) = overnight_tail(instance, next) {
                tails.entry(next).or_default().push(tail);
            }
        }
    }

    for date in query.days() {
        let own = by_day.get(&date).map(Vec::as_slice).unwrap_or_default();
        let carried = tails.get(&date).map(Vec::as_slice).unwrap_or_default();
        let entries: Vec<Entry<'_>> = carried
            .iter()
            .map(|activity| Entry {
                activity,
                continued: true,
            })
            .chain(own.iter().map(|activity| Entry {
                activity,
                continued: false,
            }))
            .collect();
        result.insert(date, engine.compute_entries(&entries));
    }

    debug!(
        start = %query.range_start,
        end = %query.range_end,
        days = result.len(),
        "laid out calendar range"
    );
    result
}

/// The after-midnight part of `activity`, placed on `next_day`, if it has one.
fn overnight_tail(activity: &Activity, next_day: NaiveDate) -> Option<Activity> {
    let start = parse_time_of_day(&activity.start_time).ok()?;
    let end = parse_time_of_day(activity.end_time.as_deref()?).ok()?;
    if end >= start || end == 0 {
        return None;
    }
    let mut tail = activity.clone();
    tail.date = next_day;
    tail.start_time = "00:00".to_string();
    Some(tail)
}
