use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Minutes since local midnight. The only time-of-day unit.
/// Values above 1440 appear only for midnight-crossing activities.
pub type Minutes = u32;

/// Half-open interval `[start, end)` in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Minutes,
    pub end: Minutes,
}

impl Span {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_minute(&self, m: Minutes) -> bool {
        self.start <= m && m < self.end
    }

    /// Union of both spans' boundaries.
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Store identifier: numeric for persisted rows, text for generated instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Num(i64),
    Text(String),
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Num(n) => write!(f, "{n}"),
            ActivityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ActivityId {
    fn from(n: i64) -> Self {
        ActivityId::Num(n)
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        ActivityId::Text(s.to_string())
    }
}

/// Category tag. Only used for filtering and colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    Task,
    Recovery,
    Exercise,
    Social,
    Sleep,
    Meal,
    Therapy,
    Diary,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
    Monthly,
    /// Any tag the store sent that we don't understand. Expansion ignores it.
    #[serde(other)]
    Unknown,
}

fn default_interval() -> i64 {
    1
}

/// Repetition rule held by a base activity, or carried by its clones for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    /// Signed so that bad store data (0, negatives) survives deserialization
    /// and can be rejected by expansion instead of by the parser.
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<ActivityId>,
    #[serde(default)]
    pub is_clone: bool,
    /// Last date (inclusive) an occurrence may fall on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    /// Total number of rule periods, the base's own included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl Recurrence {
    pub fn new(kind: RecurrenceKind, interval: i64) -> Self {
        Self {
            kind,
            interval,
            original_id: None,
            is_clone: false,
            until: None,
            count: None,
        }
    }

    /// A rule expansion can act on: known kind and a positive interval.
    pub fn is_valid(&self) -> bool {
        self.interval > 0 && self.kind != RecurrenceKind::Unknown
    }
}

/// A scheduled item on one calendar day, as the activity store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub date: NaiveDate,
    /// `HH:MM`, local to `date`.
    pub start_time: String,
    /// `HH:MM`. Earlier than `start_time` means the activity runs past midnight.
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
}

impl Activity {
    pub fn new(id: impl Into<ActivityId>, date: NaiveDate, start_time: &str, end_time: &str) -> Self {
        Self {
            id: id.into(),
            date,
            start_time: start_time.to_string(),
            end_time: Some(end_time.to_string()),
            activity_type: ActivityType::default(),
            title: String::new(),
            recurring: None,
        }
    }

    pub fn with_recurrence(mut self, rule: Recurrence) -> Self {
        self.recurring = Some(rule);
        self
    }

    pub fn with_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = activity_type;
        self
    }

    pub fn is_clone(&self) -> bool {
        self.recurring.as_ref().is_some_and(|r| r.is_clone)
    }

    /// Merge a partial update into this activity. Returns true if any field changed.
    pub fn apply_update(&mut self, update: &ActivityUpdate) -> bool {
        let mut changed = false;
        changed |= assign(&mut self.date, update.date);
        changed |= assign(&mut self.start_time, update.start_time.clone());
        changed |= assign(&mut self.end_time, update.end_time.clone());
        changed |= assign(&mut self.activity_type, update.activity_type);
        changed |= assign(&mut self.title, update.title.clone());
        changed |= assign(&mut self.recurring, update.recurring.clone());
        changed
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) if *slot != v => {
            *slot = v;
            true
        }
        _ => false,
    }
}

/// Partial update for an activity. `None` leaves a field untouched.
///
/// For the nullable fields, `Some(None)` clears the value; in JSON that is an
/// explicit `null`, while an absent key means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<Option<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurring: Option<Option<Recurrence>>,
}

impl ActivityUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ActivityUpdate::default()
    }
}

fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Rendered geometry for one activity on the timeline grid.
///
/// `top`/`height` are pixels; `left`/`width` are percentages of the day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLayout {
    pub activity: Activity,
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    pub column: usize,
    pub total_columns: usize,
    /// Overnight tail carried into the following day.
    pub continued: bool,
}
