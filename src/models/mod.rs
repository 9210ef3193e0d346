use serde::{Deserialize, Serialize};

// ─── Deadlines ──────────────────────────────────────────────────────────────

/// A tracked deadline. Field order is the persisted JSON field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    /// Creation timestamp in milliseconds, unique within the store.
    pub id: i64,
    pub title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

// ─── Time Zones ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneEntry {
    pub city_id: &'static str,
    pub label: &'static str,
    pub iana_name: &'static str,
}

// ─── Clock Faces ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandRole {
    Hour,
    Minute,
    Second,
}

impl HandRole {
    pub const ALL: [HandRole; 3] = [HandRole::Hour, HandRole::Minute, HandRole::Second];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

/// One indicator on a clock face. `rotation` is in degrees clockwise from 12.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    pub role: HandRole,
    pub rotation: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockFace {
    pub hands: Vec<Hand>,
    /// Zero-padded `HH:MM`.
    pub digital: String,
}
