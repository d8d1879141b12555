//! Maintenance window to image tag resolution.
//!
//! An image is produced once a week on the configured image day and tagged with
//! its build date (`YYYYMMDD`). Consumers pick a weekly maintenance window; once
//! that window has passed in the current week they move to the image of the
//! current cycle, before it they stay on the image of the previous cycle.
//!
//! Everything here is pure: the caller supplies the current time and the image
//! day, and the same inputs always produce the same tag.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Highest valid day index (Saturday, with Sunday = 0).
pub const MAX_DAY: u32 = 6;

/// Highest valid hour of day.
pub const MAX_HOUR: u32 = 23;

/// `strftime` pattern of a tag.
pub const TAG_FORMAT: &str = "%Y%m%d";

const TAG_LEN: usize = 8;

const DAYS_PER_WEEK: u32 = 7;

/// Weekdays indexed Sunday-first, matching the numbering used on the wire.
const SUNDAY_FIRST: [Weekday; DAYS_PER_WEEK as usize] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid maintenance window: day {day} must be 0-{max_day}, hour {hour} must be 0-{max_hour}", max_day = MAX_DAY, max_hour = MAX_HOUR)]
    InvalidWindow { day: u32, hour: u32 },

    #[error("invalid image day {0}: expected 0-6 (Sunday = 0)")]
    InvalidImageDay(u32),

    #[error("invalid tag {0:?}: expected YYYYMMDD")]
    InvalidTag(String),
}

/// Weekday on which the dated image is produced.
///
/// Serialized as its Sunday-based index (Sunday = 0 ... Saturday = 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ImageDay(Weekday);

impl ImageDay {
    /// Builds an image day from its Sunday-based index.
    pub fn from_index(index: u32) -> Option<Self> {
        SUNDAY_FIRST.get(index as usize).copied().map(Self)
    }

    /// Sunday-based index of this day.
    pub fn index(self) -> u32 {
        self.0.num_days_from_sunday()
    }

    pub fn weekday(self) -> Weekday {
        self.0
    }
}

impl Default for ImageDay {
    fn default() -> Self {
        Self(Weekday::Mon)
    }
}

impl From<Weekday> for ImageDay {
    fn from(weekday: Weekday) -> Self {
        Self(weekday)
    }
}

impl TryFrom<u32> for ImageDay {
    type Error = ResolveError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(ResolveError::InvalidImageDay(index))
    }
}

impl From<ImageDay> for u32 {
    fn from(day: ImageDay) -> Self {
        day.index()
    }
}

impl fmt::Display for ImageDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.index())
    }
}

/// The weekly instant after which the current cycle's image is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
    day: u32,
    hour: u32,
}

impl MaintenanceWindow {
    /// Validates a window given as a Sunday-based day index and an hour of day.
    pub fn new(day: u32, hour: u32) -> Result<Self, ResolveError> {
        if day > MAX_DAY || hour > MAX_HOUR {
            return Err(ResolveError::InvalidWindow { day, hour });
        }
        Ok(Self { day, hour })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// The window's occurrence in the week of `now`.
    ///
    /// Only the day and hour are moved; minutes and seconds of `now` are kept,
    /// so the comparison in [`has_elapsed`](Self::has_elapsed) is minute exact.
    pub fn occurrence_in_week_of<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let day_offset = i64::from(self.day) - i64::from(now.weekday().num_days_from_sunday());
        let hour_offset = i64::from(self.hour) - i64::from(now.hour());
        now.clone() + TimeDelta::days(day_offset) + TimeDelta::hours(hour_offset)
    }

    /// Whether this week's window is at or before `now`.
    pub fn has_elapsed<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        *now >= self.occurrence_in_week_of(now)
    }
}

/// A dated image tag, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(NaiveDate);

impl Tag {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TAG_FORMAT))
    }
}

impl FromStr for Tag {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != TAG_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ResolveError::InvalidTag(s.to_string()));
        }
        NaiveDate::parse_from_str(s, TAG_FORMAT)
            .map(Self)
            .map_err(|_| ResolveError::InvalidTag(s.to_string()))
    }
}

/// Latest date on or before `date` that falls on the image day.
pub fn floor_to_image_day(image_day: ImageDay, date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday();
    let back = (weekday + DAYS_PER_WEEK - image_day.index()) % DAYS_PER_WEEK;
    date - Days::new(u64::from(back))
}

/// Tag of the cycle `now` belongs to.
pub fn current_tag<Tz: TimeZone>(image_day: ImageDay, now: &DateTime<Tz>) -> Tag {
    Tag(floor_to_image_day(image_day, now.date_naive()))
}

/// Tag of the cycle before the one `now` belongs to.
///
/// Early in the week (before the image day) the floor of today already lands
/// in last week, so no extra week is taken off.
pub fn previous_tag<Tz: TimeZone>(image_day: ImageDay, now: &DateTime<Tz>) -> Tag {
    let today = now.date_naive();
    let root = if now.weekday().num_days_from_sunday() < image_day.index() {
        today
    } else {
        today - Days::new(u64::from(DAYS_PER_WEEK))
    };
    Tag(floor_to_image_day(image_day, root))
}

/// Resolves the tag that applies to the maintenance window `day`/`hour` at `now`.
pub fn resolve_tag<Tz: TimeZone>(
    image_day: ImageDay,
    day: u32,
    hour: u32,
    now: &DateTime<Tz>,
) -> Result<Tag, ResolveError> {
    let window = MaintenanceWindow::new(day, hour)?;

    if window.has_elapsed(now) {
        Ok(current_tag(image_day, now))
    } else {
        Ok(previous_tag(image_day, now))
    }
}
