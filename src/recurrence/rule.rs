use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::*;

/// Whole calendar months from `from` to `to`, ignoring the day of month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Zero-based rule period that `date` falls on, or `None` if the rule does
/// not produce an occurrence on `date`. The anchor itself is period 0.
///
/// Works on calendar days only, so DST shifts and time zones never move an
/// occurrence.
pub fn period_index(rule: &Recurrence, anchor: NaiveDate, date: NaiveDate) -> Option<i64> {
    if !rule.is_valid() || date < anchor {
        return None;
    }
    let k = rule.interval;
    let days = (date - anchor).num_days();
    match rule.kind {
        RecurrenceKind::Daily => (days % k == 0).then_some(days / k),
        RecurrenceKind::Weekly => {
            let weeks = days / 7;
            (days % 7 == 0 && weeks % k == 0).then_some(weeks / k)
        }
        RecurrenceKind::Monthly => {
            // No rollover: a 31st anchor simply has no occurrence in 30-day months.
            if date.day() != anchor.day() {
                return None;
            }
            let months = months_between(anchor, date);
            (months % k == 0).then_some(months / k)
        }
        RecurrenceKind::Unknown => None,
    }
}

/// Lowest period whose date can fall on or after `from`. Monthly periods may
/// still land before `from` and need checking.
pub fn first_period_from(rule: &Recurrence, anchor: NaiveDate, from: NaiveDate) -> i64 {
    if from <= anchor || !rule.is_valid() {
        return 0;
    }
    let days = (from - anchor).num_days();
    let ceil_div = |step: i64| days / step + i64::from(days % step != 0);
    match rule.kind {
        RecurrenceKind::Daily => ceil_div(rule.interval),
        RecurrenceKind::Weekly => ceil_div(rule.interval.saturating_mul(7)),
        RecurrenceKind::Monthly => months_between(anchor, from) / rule.interval,
        RecurrenceKind::Unknown => 0,
    }
}

/// Date of rule period `n`, the anchor being period 0.
///
/// Monthly dates are clamped to the length of the target month, so a 31st
/// anchor yields Feb 29 for February. Such dates are not occurrences;
/// `occurs_on` rejects them.
pub fn period_date(rule: &Recurrence, anchor: NaiveDate, n: i64) -> Option<NaiveDate> {
    if !rule.is_valid() {
        return None;
    }
    let steps = u64::try_from(n).ok()?.checked_mul(u64::try_from(rule.interval).ok()?)?;
    match rule.kind {
        RecurrenceKind::Daily => anchor.checked_add_days(Days::new(steps)),
        RecurrenceKind::Weekly => anchor.checked_add_days(Days::new(steps.checked_mul(7)?)),
        RecurrenceKind::Monthly => anchor.checked_add_months(Months::new(u32::try_from(steps).ok()?)),
        RecurrenceKind::Unknown => None,
    }
}

/// True when `rule`, anchored at `anchor`, has an occurrence on `date`,
/// honoring the `until` and `count` end conditions.
pub fn occurs_on(rule: &Recurrence, anchor: NaiveDate, date: NaiveDate) -> bool {
    let Some(period) = period_index(rule, anchor, date) else {
        return false;
    };
    rule.until.is_none_or(|until| date <= until)
        && rule.count.is_none_or(|count| period < i64::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(kind: RecurrenceKind, interval: i64) -> Recurrence {
        Recurrence::new(kind, interval)
    }

    #[test]
    fn months_between_ignores_day() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 3, 1)), 2);
        assert_eq!(months_between(date(2023, 11, 5), date(2024, 2, 5)), 3);
        assert_eq!(months_between(date(2024, 5, 5), date(2024, 5, 30)), 0);
    }

    #[test]
    fn daily_every_third_day() {
        let r = rule(RecurrenceKind::Daily, 3);
        let anchor = date(2024, 1, 1);
        assert_eq!(period_index(&r, anchor, anchor), Some(0));
        assert_eq!(period_index(&r, anchor, date(2024, 1, 4)), Some(1));
        assert_eq!(period_index(&r, anchor, date(2024, 1, 5)), None);
        assert_eq!(period_index(&r, anchor, date(2023, 12, 29)), None);
    }

    #[test]
    fn weekly_same_weekday_only() {
        let r = rule(RecurrenceKind::Weekly, 2);
        let anchor = date(2024, 1, 1);
        assert!(occurs_on(&r, anchor, date(2024, 1, 15)));
        assert!(occurs_on(&r, anchor, date(2024, 1, 29)));
        assert!(!occurs_on(&r, anchor, date(2024, 1, 8)));
        assert!(!occurs_on(&r, anchor, date(2024, 1, 22)));
        assert!(!occurs_on(&r, anchor, date(2024, 1, 16)));
    }

    #[test]
    fn weekly_across_dst_change() {
        // Spring-forward weekends in most zones; plain day counting is unaffected.
        let r = rule(RecurrenceKind::Weekly, 1);
        let anchor = date(2024, 3, 4);
        assert!(occurs_on(&r, anchor, date(2024, 3, 11)));
        assert!(occurs_on(&r, anchor, date(2024, 4, 1)));
        assert!(occurs_on(&r, anchor, date(2024, 11, 4)));
    }

    #[test]
    fn monthly_skips_short_months() {
        let r = rule(RecurrenceKind::Monthly, 1);
        let anchor = date(2024, 1, 31);
        assert!(!occurs_on(&r, anchor, date(2024, 2, 29)));
        assert!(occurs_on(&r, anchor, date(2024, 3, 31)));
        assert!(!occurs_on(&r, anchor, date(2024, 4, 30)));
        assert_eq!(period_index(&r, anchor, date(2024, 5, 31)), Some(4));
    }

    #[test]
    fn monthly_interval_and_year_boundary() {
        let r = rule(RecurrenceKind::Monthly, 3);
        let anchor = date(2023, 11, 15);
        assert!(occurs_on(&r, anchor, date(2024, 2, 15)));
        assert!(!occurs_on(&r, anchor, date(2024, 1, 15)));
        assert!(occurs_on(&r, anchor, date(2024, 5, 15)));
    }

    #[test]
    fn leap_day_anchor() {
        let r = rule(RecurrenceKind::Monthly, 12);
        let anchor = date(2024, 2, 29);
        assert!(!occurs_on(&r, anchor, date(2025, 2, 28)));
        assert!(occurs_on(&r, anchor, date(2028, 2, 29)));
    }

    #[test]
    fn first_period_lands_on_or_after() {
        let anchor = date(2024, 1, 1);
        let daily = rule(RecurrenceKind::Daily, 3);
        assert_eq!(first_period_from(&daily, anchor, date(2023, 6, 1)), 0);
        assert_eq!(first_period_from(&daily, anchor, date(2024, 1, 4)), 1);
        assert_eq!(first_period_from(&daily, anchor, date(2024, 1, 5)), 2);

        let biweekly = rule(RecurrenceKind::Weekly, 2);
        assert_eq!(first_period_from(&biweekly, anchor, date(2024, 1, 2)), 1);
        assert_eq!(period_date(&biweekly, anchor, 1), Some(date(2024, 1, 15)));

        let monthly = rule(RecurrenceKind::Monthly, 2);
        assert_eq!(first_period_from(&monthly, date(2024, 1, 31), date(2024, 5, 1)), 2);
    }

    #[test]
    fn period_date_steps_by_rule() {
        let anchor = date(2024, 1, 31);
        assert_eq!(period_date(&rule(RecurrenceKind::Daily, 2), anchor, 1), Some(date(2024, 2, 2)));
        assert_eq!(period_date(&rule(RecurrenceKind::Weekly, 1), anchor, 2), Some(date(2024, 2, 14)));
        let monthly = rule(RecurrenceKind::Monthly, 1);
        // Clamped, and therefore not an occurrence.
        let feb = period_date(&monthly, anchor, 1).unwrap();
        assert_eq!(feb, date(2024, 2, 29));
        assert!(!occurs_on(&monthly, anchor, feb));
        assert_eq!(period_date(&monthly, anchor, 2), Some(date(2024, 3, 31)));
        assert_eq!(period_date(&monthly, anchor, -1), None);
        assert_eq!(period_date(&rule(RecurrenceKind::Unknown, 1), anchor, 1), None);
    }

    #[test]
    fn invalid_rules_never_match() {
        let anchor = date(2024, 1, 1);
        for r in [
            rule(RecurrenceKind::Daily, 0),
            rule(RecurrenceKind::Weekly, -1),
            rule(RecurrenceKind::Unknown, 1),
        ] {
            assert!(!occurs_on(&r, anchor, date(2024, 1, 8)), "{r:?}");
        }
    }

    #[test]
    fn until_is_inclusive() {
        let mut r = rule(RecurrenceKind::Daily, 1);
        r.until = Some(date(2024, 1, 3));
        let anchor = date(2024, 1, 1);
        assert!(occurs_on(&r, anchor, date(2024, 1, 3)));
        assert!(!occurs_on(&r, anchor, date(2024, 1, 4)));
    }

    #[test]
    fn count_includes_base_period() {
        let mut r = rule(RecurrenceKind::Monthly, 1);
        r.count = Some(3);
        let anchor = date(2024, 1, 31);
        // Periods: Jan (base), Feb (skipped, no 31st), Mar.
        assert!(occurs_on(&r, anchor, date(2024, 3, 31)));
        assert!(!occurs_on(&r, anchor, date(2024, 5, 31)));
    }
}
