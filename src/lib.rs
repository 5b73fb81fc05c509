//! Timeline layout and recurrence expansion for a personal activity calendar.
//!
//! Data flows one way: activities from the store go through
//! [`recurrence::expand`] to become dated instances, and each day's instances
//! go through [`layout::LayoutEngine`] to become pixel-positioned blocks.
//! Both steps are pure; nothing is kept between calls except an optional
//! caller-owned [`time::TimeCache`].

pub mod calendar;
pub mod config;
pub mod error;
pub mod layout;
pub mod limits;
pub mod model;
pub mod observability;
pub mod recurrence;
pub mod time;

pub use calendar::{activities_by_day, layout_days, CalendarQuery};
pub use config::{LayoutConfig, ViewKind};
pub use error::{ConfigError, TimeError};
pub use layout::{compute_layouts, LayoutEngine};
pub use model::{Activity, ActivityId, ActivityLayout, ActivityType, ActivityUpdate, Recurrence, RecurrenceKind};
pub use recurrence::{expand, RecurrenceExpander};
pub use time::TimeCache;
