use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    SpecificDays,
    Interval,
}

impl FromStr for Recurrence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "specific_days" => Ok(Self::SpecificDays),
            "interval" => Ok(Self::Interval),
            other => Err(anyhow::anyhow!("unknown recurrence: {other}")),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::SpecificDays => write!(f, "specific_days"),
            Self::Interval => write!(f, "interval"),
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedDosage + parse_dosage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDosage {
    pub amount: Option<String>,
    pub unit: Option<String>,
}

/// Split a dose string into an amount and a unit.
///
/// Handles decimal (`"400mg"`, `".5mg"`, `"2 drops"`) and fraction
/// (`"1/2 tablet"`) forms. Text with no leading numeric component is kept
/// whole as the unit (`"thin layer"`). `None` or empty input yields neither.
pub fn parse_dosage(input: Option<&str>) -> ParsedDosage {
    let raw = match input {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => {
            return ParsedDosage {
                amount: None,
                unit: None,
            };
        }
    };

    if let Some(parsed) = try_fraction(raw) {
        return parsed;
    }
    if let Some(parsed) = try_decimal(raw) {
        return parsed;
    }

    ParsedDosage {
        amount: None,
        unit: Some(raw.to_string()),
    }
}

fn try_fraction(s: &str) -> Option<ParsedDosage> {
    let re = Regex::new(r"^(\d+)\s*/\s*(\d+)\s*(.*)$").ok()?;
    let caps = re.captures(s)?;
    let num: f64 = caps[1].parse().ok()?;
    let den: f64 = caps[2].parse().ok()?;
    if den == 0.0 || num == 0.0 {
        return None;
    }
    let unit_str = caps[3].trim();
    Some(ParsedDosage {
        amount: Some(trim_trailing_zeros(num / den)),
        unit: if unit_str.is_empty() {
            None
        } else {
            Some(unit_str.to_string())
        },
    })
}

fn try_decimal(s: &str) -> Option<ParsedDosage> {
    let re = Regex::new(r"^(\d+\.?\d*|\.\d+)\s*(.*)$").ok()?;
    let caps = re.captures(s)?;
    let val: f64 = caps[1].parse().ok()?;
    if val <= 0.0 {
        return None;
    }
    let unit_str = caps[2].trim();
    Some(ParsedDosage {
        amount: Some(caps[1].to_string()),
        unit: if unit_str.is_empty() {
            None
        } else {
            Some(unit_str.to_string())
        },
    })
}

fn trim_trailing_zeros(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ---------------------------------------------------------------------------
// Reminder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub medicine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription_id: Option<String>,
    pub reminder_time: NaiveTime,
    pub recurrence: Recurrence,
    /// Weekday indices, 0 = Monday .. 6 = Sunday. Only consulted for
    /// `Recurrence::SpecificDays`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specific_days: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_unit: Option<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reminder {
    /// Create a new active reminder with sensible defaults.
    pub fn new(
        user_id: impl Into<String>,
        medicine_id: impl Into<String>,
        reminder_time: NaiveTime,
        recurrence: Recurrence,
        start_date: NaiveDate,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            medicine_id: medicine_id.into(),
            prescription_id: None,
            reminder_time,
            recurrence,
            specific_days: Vec::new(),
            dosage_amount: None,
            dosage_unit: None,
            start_date,
            end_date: None,
            active: true,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The instant this reminder is due on a given calendar day.
    pub fn scheduled_at(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.reminder_time)
    }

    /// Human dose string, e.g. `"1 tablet"`, or `None` when no dosage is set.
    pub fn dosage(&self) -> Option<String> {
        match (&self.dosage_amount, &self.dosage_unit) {
            (Some(a), Some(u)) => Some(format!("{a} {u}")),
            (Some(a), None) => Some(a.clone()),
            (None, Some(u)) => Some(u.clone()),
            (None, None) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
