use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info};

use crate::core::{adherence, engine};
use crate::db::Database;
use crate::models::config::Config;

/// Streak lengths worth telling the user about.
pub const STREAK_MILESTONES: [u32; 8] = [3, 7, 14, 30, 60, 90, 180, 365];

/// A weekly adherence drop larger than this (percentage points) is reported.
const DROP_THRESHOLD: f64 = 20.0;

// ---------------------------------------------------------------------------
// Tick reports
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DailyTickReport {
    pub ran_at: NaiveDateTime,
    pub users: Vec<UserSweep>,
    pub total_missed: u32,
}

#[derive(Debug, Serialize)]
pub struct UserSweep {
    pub user_id: String,
    pub missed_recorded: u32,
}

#[derive(Debug, Serialize)]
pub struct WeeklyTickReport {
    pub ran_at: NaiveDateTime,
    pub observations: Vec<AdherenceObservation>,
}

/// What the weekly tick noticed about one user. An external notifier decides
/// what to do with it (and whether it already said so); nothing is persisted
/// here.
#[derive(Debug, Serialize)]
pub struct AdherenceObservation {
    pub user_id: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Largest milestone at or below the current streak, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u32>,
    /// Mean adherence of the last 3 days, when it dropped more than 20
    /// points below the 4 days before.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adherence_drop: Option<f64>,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Owns the tick logic an external timer drives. Constructed once at startup
/// from config and passed down; deliberately not a process-wide singleton.
pub struct Scheduler {
    weekly_weekday: u8,
}

impl Scheduler {
    pub fn new(config: &Config) -> Self {
        Self {
            weekly_weekday: config.schedule.weekly_weekday.min(6),
        }
    }

    /// Whether the weekly tick is due on this date.
    pub fn weekly_due(&self, date: NaiveDate) -> bool {
        date.weekday().num_days_from_monday() as u8 == self.weekly_weekday
    }

    /// Run the missed-backlog sweep for every user with active reminders.
    /// A failing user is logged and skipped so one broken account does not
    /// starve the rest of the tick.
    pub fn run_daily(&self, db: &Database, now: NaiveDateTime) -> Result<DailyTickReport> {
        let mut users = Vec::new();
        let mut total_missed = 0u32;

        for user_id in db.user_ids_with_active_reminders()? {
            match engine::sweep_missed(db, &user_id, now) {
                Ok(missed_recorded) => {
                    total_missed += missed_recorded;
                    users.push(UserSweep {
                        user_id,
                        missed_recorded,
                    });
                }
                Err(e) => error!(%user_id, error = %e, "daily sweep failed for user"),
            }
        }

        info!(total_missed, users = users.len(), "daily tick completed");
        Ok(DailyTickReport {
            ran_at: now,
            users,
            total_missed,
        })
    }

    /// Compute streaks and recent adherence for every user with active
    /// reminders. Aggregation failures degrade to a skipped user, logged.
    pub fn run_weekly(&self, db: &Database, now: NaiveDateTime) -> Result<WeeklyTickReport> {
        let today = now.date();
        let mut observations = Vec::new();

        for user_id in db.user_ids_with_active_reminders()? {
            let streak = match adherence::streak(db, &user_id, today) {
                Ok(s) => s,
                Err(e) => {
                    error!(%user_id, error = %e, "weekly streak computation failed");
                    continue;
                }
            };
            let series = match adherence::daily_series(db, &user_id, 7, today) {
                Ok(s) => s,
                Err(e) => {
                    error!(%user_id, error = %e, "weekly adherence series failed");
                    continue;
                }
            };

            observations.push(AdherenceObservation {
                milestone: reached_milestone(streak.current_streak),
                adherence_drop: detect_drop(&series),
                current_streak: streak.current_streak,
                longest_streak: streak.longest_streak,
                user_id,
            });
        }

        info!(observations = observations.len(), "weekly tick completed");
        Ok(WeeklyTickReport {
            ran_at: now,
            observations,
        })
    }
}

/// Largest milestone at or below the streak, if the streak reaches any.
fn reached_milestone(current_streak: u32) -> Option<u32> {
    STREAK_MILESTONES
        .iter()
        .rev()
        .find(|m| current_streak >= **m)
        .copied()
}

/// Compare the mean adherence of the last 3 days against the 4 days before.
/// Returns the recent mean when it fell more than 20 points.
fn detect_drop(series: &[adherence::DayAdherence]) -> Option<f64> {
    if series.len() < 7 {
        return None;
    }
    let (earlier, recent) = series.split_at(series.len() - 3);
    let earlier = &earlier[earlier.len() - 4..];

    let mean = |days: &[adherence::DayAdherence]| {
        days.iter().map(|d| d.adherence_rate).sum::<f64>() / days.len() as f64
    };
    let recent_mean = mean(recent);
    if recent_mean < mean(earlier) - DROP_THRESHOLD {
        Some(recent_mean)
    } else {
        None
    }
}
