use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde_json::json;
use tracing::warn;

use pillbox::core::adherence::{self, AdherenceStats, StreakStats};
use pillbox::db::Database;
use pillbox::models::config::Config;
use pillbox::output;

use super::resolve_user;

// Dashboard reads degrade to zero-filled shapes instead of failing the
// whole view; partial adherence data beats an error page.

pub fn run_stats(from: NaiveDate, to: NaiveDate, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let stats = adherence::stats(&db, &user, from, to).unwrap_or_else(|e| {
        warn!(error = %e, "adherence stats degraded to zero");
        AdherenceStats::zero()
    });

    if human {
        println!("{}", output::human::format_stats(&stats));
    } else {
        let out = output::success("adherence_stats", json!(stats));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_daily(days: u32, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let today = Local::now().date_naive();
    let series = adherence::daily_series(&db, &user, days, today).unwrap_or_else(|e| {
        warn!(error = %e, "daily adherence degraded to empty");
        Vec::new()
    });

    if human {
        println!("{}", output::human::format_daily(&series));
    } else {
        let out = output::success("adherence_daily", json!({ "days": series }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_streak(user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let today = Local::now().date_naive();
    let streak = adherence::streak(&db, &user, today).unwrap_or_else(|e| {
        warn!(error = %e, "streak computation degraded to zero");
        StreakStats::zero()
    });

    if human {
        println!("{}", output::human::format_streak(&streak));
    } else {
        let out = output::success("adherence_streak", json!(streak));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_by_medicine(
    from: NaiveDate,
    to: NaiveDate,
    user: Option<&str>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let breakdown = adherence::by_medicine(&db, &user, from, to)?;

    if human {
        println!("{}", output::human::format_by_medicine(&breakdown));
    } else {
        let out = output::success("adherence_by_medicine", json!(breakdown));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
