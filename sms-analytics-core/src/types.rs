//! Core domain types for sms-analytics
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One message from the export, immutable once loaded |
//! | **Direction** | Whether a message was Sent (outgoing) or Received (incoming) |
//! | **Contact** | The display name the export attaches to a message |
//! | **Bucket** | A fixed-domain counter keyed by month, weekday or hour |

use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike, Utc};
use serde::Deserialize;

// ============================================
// Direction
// ============================================

/// Direction of a message relative to the phone owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Map the export's `type` attribute. `"1"` is the inbox; every other
    /// box (sent, draft, outbox, failed, queued) counts as sent.
    pub fn from_type_flag(flag: &str) -> Self {
        if flag.trim() == "1" {
            Direction::Received
        } else {
            Direction::Sent
        }
    }
}

// ============================================
// Time zone
// ============================================

/// Zone used to derive calendar fields from a record's timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    /// System local time
    #[default]
    Local,
    /// Coordinated universal time
    Utc,
}

impl TimeZoneMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeZoneMode::Local => "local",
            TimeZoneMode::Utc => "utc",
        }
    }

    /// Wall-clock time of `ts` in this zone.
    pub fn wall_clock(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        match self {
            TimeZoneMode::Local => ts.with_timezone(&Local).naive_local(),
            TimeZoneMode::Utc => ts.naive_utc(),
        }
    }
}

impl std::str::FromStr for TimeZoneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(TimeZoneMode::Local),
            "utc" => Ok(TimeZoneMode::Utc),
            _ => Err(format!("unknown timezone: {} (expected local or utc)", s)),
        }
    }
}

// ============================================
// Message records
// ============================================

/// A single message from the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// When the message was sent or received (second precision)
    pub timestamp: DateTime<Utc>,
    /// Sent or received
    pub direction: Direction,
    /// Contact display name as recorded by the export
    pub contact_name: String,
}

impl MessageRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        direction: Direction,
        contact_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            direction,
            contact_name: contact_name.into(),
        }
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Calendar fields of this record in the given zone.
    pub fn calendar(&self, tz: TimeZoneMode) -> CalendarFields {
        let wall = tz.wall_clock(self.timestamp);
        CalendarFields {
            year: wall.year(),
            month: wall.month(),
            weekday: wall.weekday().num_days_from_sunday(),
            hour: wall.hour(),
        }
    }
}

/// Calendar fields derived from a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 0=Sunday .. 6=Saturday
    pub weekday: u32,
    /// 0-23
    pub hour: u32,
}
