use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::Database;
use crate::models::event::EventStatus;

// ---------------------------------------------------------------------------
// Report shapes
// ---------------------------------------------------------------------------

// Field names below are wire-compatible with existing consumers; renaming
// them is a breaking change.

#[derive(Debug, Clone, Serialize)]
pub struct AdherenceStats {
    pub total_scheduled: u32,
    pub taken: u32,
    pub skipped: u32,
    pub missed: u32,
    pub adherence_rate: f64,
}

impl AdherenceStats {
    pub fn zero() -> Self {
        Self {
            total_scheduled: 0,
            taken: 0,
            skipped: 0,
            missed: 0,
            adherence_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayAdherence {
    pub date: NaiveDate,
    pub total_scheduled: u32,
    pub taken: u32,
    pub skipped: u32,
    pub missed: u32,
    pub adherence_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Most recent perfect day. Wire name kept for existing consumers.
    pub last_taken_date: Option<NaiveDate>,
}

impl StreakStats {
    pub fn zero() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_taken_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicineAdherence {
    pub medicine_id: String,
    pub medicine_name: String,
    pub total_scheduled: u32,
    pub taken: u32,
    pub skipped: u32,
    pub missed: u32,
    pub adherence_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicineBreakdown {
    pub medicines: Vec<MedicineAdherence>,
    pub overall_adherence: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn rate(taken: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(f64::from(taken) / f64::from(total) * 100.0)
    }
}

/// Status counts for a date window.
pub fn stats(
    db: &Database,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<AdherenceStats> {
    let events = db.events_in_range(user_id, start, end, None, None)?;

    let mut taken = 0u32;
    let mut skipped = 0u32;
    let mut missed = 0u32;
    for ev in &events {
        match ev.event.status {
            EventStatus::Taken => taken += 1,
            EventStatus::Skipped => skipped += 1,
            EventStatus::Missed => missed += 1,
        }
    }
    let total = events.len() as u32;

    Ok(AdherenceStats {
        total_scheduled: total,
        taken,
        skipped,
        missed,
        adherence_rate: rate(taken, total),
    })
}

/// Per-day stats for the trailing `days` days ending at `today`, oldest
/// first. Days with nothing scheduled report a rate of 100 — an inherited
/// reporting convention, kept for compatibility.
pub fn daily_series(
    db: &Database,
    user_id: &str,
    days: u32,
    today: NaiveDate,
) -> Result<Vec<DayAdherence>> {
    let days = days.max(1);
    let from = today - Duration::days(i64::from(days) - 1);
    let by_day = statuses_by_day(db, user_id, from, today)?;

    let mut series = Vec::with_capacity(days as usize);
    for i in 0..days {
        let date = from + Duration::days(i64::from(i));
        let statuses = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);

        let mut taken = 0u32;
        let mut skipped = 0u32;
        let mut missed = 0u32;
        for s in statuses {
            match s {
                EventStatus::Taken => taken += 1,
                EventStatus::Skipped => skipped += 1,
                EventStatus::Missed => missed += 1,
            }
        }
        let total = statuses.len() as u32;

        series.push(DayAdherence {
            date,
            total_scheduled: total,
            taken,
            skipped,
            missed,
            adherence_rate: if total == 0 { 100.0 } else { rate(taken, total) },
        });
    }
    Ok(series)
}

/// Perfect-day streaks over the trailing 365 days.
///
/// A day is perfect iff it had at least one scheduled event and every one of
/// them was taken. Days with no events neither break nor extend the streak.
/// The in-progress current day never breaks the streak either — it may still
/// become perfect before midnight.
pub fn streak(db: &Database, user_id: &str, today: NaiveDate) -> Result<StreakStats> {
    let from = today - Duration::days(364);
    let by_day = statuses_by_day(db, user_id, from, today)?;

    let mut current = 0u32;
    let mut longest = 0u32;
    let mut last_perfect: Option<NaiveDate> = None;

    // BTreeMap iterates oldest to newest; event-free days are simply absent
    for (&date, statuses) in &by_day {
        let perfect = statuses.iter().all(|s| *s == EventStatus::Taken);
        if perfect {
            current += 1;
            longest = longest.max(current);
            last_perfect = Some(date);
        } else if date != today {
            current = 0;
        }
    }

    Ok(StreakStats {
        current_streak: current,
        longest_streak: longest,
        last_taken_date: last_perfect,
    })
}

/// Adherence broken down per medicine, best adherence first.
pub fn by_medicine(
    db: &Database,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<MedicineBreakdown> {
    let events = db.events_in_range(user_id, start, end, None, None)?;

    // medicine id -> (name, taken, skipped, missed)
    let mut groups: BTreeMap<String, (String, u32, u32, u32)> = BTreeMap::new();
    let mut total_taken = 0u32;
    for ev in &events {
        let entry = groups
            .entry(ev.medicine_id.clone())
            .or_insert_with(|| (ev.medicine_name.clone(), 0, 0, 0));
        match ev.event.status {
            EventStatus::Taken => {
                entry.1 += 1;
                total_taken += 1;
            }
            EventStatus::Skipped => entry.2 += 1,
            EventStatus::Missed => entry.3 += 1,
        }
    }

    let mut medicines: Vec<MedicineAdherence> = groups
        .into_iter()
        .map(|(medicine_id, (medicine_name, taken, skipped, missed))| {
            let total = taken + skipped + missed;
            MedicineAdherence {
                medicine_id,
                medicine_name,
                total_scheduled: total,
                taken,
                skipped,
                missed,
                adherence_rate: rate(taken, total),
            }
        })
        .collect();
    medicines.sort_by(|a, b| {
        b.adherence_rate
            .partial_cmp(&a.adherence_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let overall = rate(total_taken, events.len() as u32);
    Ok(MedicineBreakdown {
        medicines,
        overall_adherence: overall,
    })
}

fn statuses_by_day(
    db: &Database,
    user_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<BTreeMap<NaiveDate, Vec<EventStatus>>> {
    let events = db.events_in_range(user_id, from, to, None, None)?;
    let mut by_day: BTreeMap<NaiveDate, Vec<EventStatus>> = BTreeMap::new();
    for ev in events {
        by_day
            .entry(ev.event.scheduled_at.date())
            .or_default()
            .push(ev.event.status);
    }
    Ok(by_day)
}
