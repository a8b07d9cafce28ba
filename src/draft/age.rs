//! Human-readable draft age

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "amount", rename_all = "snake_case")]
pub enum DraftAge {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
}

impl DraftAge {
    /// Bucket the time elapsed between `saved` and `now`.
    /// Timestamps in the future count as just saved.
    pub fn between(saved: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes = (now - saved).num_minutes();
        if minutes < 1 {
            return DraftAge::JustNow;
        }
        if minutes < 60 {
            return DraftAge::Minutes(minutes);
        }

        let hours = minutes / 60;
        if hours < 24 {
            return DraftAge::Hours(hours);
        }

        DraftAge::Days(hours / 24)
    }
}

impl fmt::Display for DraftAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftAge::JustNow => write!(f, "just now"),
            DraftAge::Minutes(n) => write!(f, "{} minutes ago", n),
            DraftAge::Hours(n) => write!(f, "{} hours ago", n),
            DraftAge::Days(n) => write!(f, "{} days ago", n),
        }
    }
}
