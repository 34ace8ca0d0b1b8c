use anyhow::Result;
use chrono::Local;
use serde_json::json;

use pillbox::core::schedule::Scheduler;
use pillbox::db::Database;
use pillbox::models::config::Config;
use pillbox::output;

use crate::cli::TickJob;

/// Entry point for the external timer. Without an explicit job, runs the
/// daily sweep and, on the configured weekday, the weekly check too.
pub fn run(job: Option<TickJob>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let scheduler = Scheduler::new(&config);

    let now = Local::now().naive_local();

    let daily = match job {
        None | Some(TickJob::Daily) => Some(scheduler.run_daily(&db, now)?),
        Some(TickJob::Weekly) => None,
    };
    let weekly = match job {
        Some(TickJob::Weekly) => Some(scheduler.run_weekly(&db, now)?),
        None if scheduler.weekly_due(now.date()) => Some(scheduler.run_weekly(&db, now)?),
        _ => None,
    };

    if human {
        if let Some(ref report) = daily {
            println!("{}", output::human::format_daily_tick(report));
        }
        if let Some(ref report) = weekly {
            println!("{}", output::human::format_weekly_tick(report));
        }
    } else {
        let out = output::success("tick", json!({ "daily": daily, "weekly": weekly }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
