use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::error::TimeError;
use crate::limits::MINUTES_PER_DAY;
use crate::model::Minutes;

/// Parse `HH:MM` (or `HH:MM:SS`, seconds ignored) into minutes since midnight.
///
/// `24:00` is accepted and maps to 1440 so an end time can name the end of the day.
pub fn parse_time_of_day(s: &str) -> Result<Minutes, TimeError> {
    let trimmed = s.trim();
    let mut parts = trimmed.split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return Err(TimeError::Malformed(s.to_string()));
    };
    let sec = parts.next();
    if parts.next().is_some() {
        return Err(TimeError::Malformed(s.to_string()));
    }

    let hours = digits(h, 1..=2).ok_or_else(|| TimeError::Malformed(s.to_string()))?;
    let minutes = digits(m, 2..=2).ok_or_else(|| TimeError::Malformed(s.to_string()))?;
    let seconds = match sec {
        Some(sec) => digits(sec, 2..=2).ok_or_else(|| TimeError::Malformed(s.to_string()))?,
        None => 0,
    };

    if minutes > 59 || seconds > 59 || hours > 24 {
        return Err(TimeError::OutOfRange(s.to_string()));
    }
    if hours == 24 && (minutes > 0 || seconds > 0) {
        return Err(TimeError::OutOfRange(s.to_string()));
    }
    Ok(hours * 60 + minutes)
}

fn digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Render minutes since midnight as `HH:MM`, wrapping past midnight.
pub fn format_minutes(m: Minutes) -> String {
    let m = m % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| TimeError::InvalidDate(s.to_string()))
}

/// Memoized time-of-day parsing, keyed by the raw string. Only successful
/// parses are kept, so malformed store data cannot grow the cache.
///
/// Owned by the caller and handed to a `LayoutEngine`; one cache can be shared
/// by many engines and threads.
#[derive(Debug, Default)]
pub struct TimeCache {
    entries: DashMap<String, Minutes>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, s: &str) -> Result<Minutes, TimeError> {
        if let Some(entry) = self.entries.get(s) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            metrics::counter!(crate::observability::TIME_CACHE_HITS_TOTAL).increment(1);
            return Ok(*entry.value());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(crate::observability::TIME_CACHE_MISSES_TOTAL).increment(1);
        let minutes = parse_time_of_day(s)?;
        self.entries.insert(s.to_string(), minutes);
        Ok(minutes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation or the last `clear`.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
