use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Persisted outcome of one scheduled occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Taken,
    Skipped,
    Missed,
}

impl FromStr for EventStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "taken" => Ok(Self::Taken),
            "skipped" => Ok(Self::Skipped),
            "missed" => Ok(Self::Missed),
            other => Err(anyhow::anyhow!("unknown event status: {other}")),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Skipped => write!(f, "skipped"),
            Self::Missed => write!(f, "missed"),
        }
    }
}

// ---------------------------------------------------------------------------
// DisplayStatus
// ---------------------------------------------------------------------------

/// Derived per-day status for UI display. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Taken,
    Skipped,
    Missed,
    Pending,
    Upcoming,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Skipped => write!(f, "skipped"),
            Self::Missed => write!(f, "missed"),
            Self::Pending => write!(f, "pending"),
            Self::Upcoming => write!(f, "upcoming"),
        }
    }
}

// ---------------------------------------------------------------------------
// ReminderEvent
// ---------------------------------------------------------------------------

/// One outcome record for one scheduled occurrence of a reminder.
///
/// Rows are append-only: corrections add a new row and resolution always
/// prefers the most-recently-created one for the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEvent {
    pub id: String,
    pub reminder_id: String,
    pub scheduled_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_at: Option<NaiveDateTime>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ReminderEvent {
    pub fn new(
        reminder_id: impl Into<String>,
        scheduled_at: NaiveDateTime,
        status: EventStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            reminder_id: reminder_id.into(),
            scheduled_at,
            action_at: None,
            status,
            notes: None,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn event_status_from_str() {
        assert_eq!("taken".parse::<EventStatus>().unwrap(), EventStatus::Taken);
        assert_eq!(
            "SKIPPED".parse::<EventStatus>().unwrap(),
            EventStatus::Skipped
        );
        assert_eq!(
            "missed".parse::<EventStatus>().unwrap(),
            EventStatus::Missed
        );
        assert!("pending".parse::<EventStatus>().is_err());
    }

    #[test]
    fn event_status_display_roundtrip() {
        for s in [EventStatus::Taken, EventStatus::Skipped, EventStatus::Missed] {
            let parsed: EventStatus = s.to_string().parse().unwrap();
            assert_eq!(parsed, s);
        }
    }

    #[test]
    fn event_new_defaults() {
        let sched = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let ev = ReminderEvent::new("r1", sched, EventStatus::Taken);
        assert_eq!(ev.reminder_id, "r1");
        assert_eq!(ev.scheduled_at, sched);
        assert_eq!(ev.status, EventStatus::Taken);
        assert!(ev.action_at.is_none());
        assert!(!ev.id.is_empty());
    }
}
