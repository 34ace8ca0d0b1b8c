use anyhow::{Result, bail};
use chrono::{Local, NaiveDate, NaiveTime};
use serde_json::json;

use pillbox::core::engine::{self, NewReminderParams, ReminderPatch};
use pillbox::db::{Database, ReminderQuery};
use pillbox::models::config::Config;
use pillbox::models::event::EventStatus;
use pillbox::models::reminder::{Recurrence, parse_dosage};
use pillbox::output;

use super::resolve_user;

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| anyhow::anyhow!("invalid time '{s}', expected HH:MM"))
}

fn parse_days(s: &str) -> Result<Vec<u8>> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| anyhow::anyhow!("invalid weekday '{part}', expected 0..6"))
        })
        .collect()
}

/// Accept a medicine by name first, falling back to a raw id.
fn resolve_medicine_id(db: &Database, user: &str, input: &str) -> Result<String> {
    match db.get_medicine_by_name(input, user)? {
        Some(m) => Ok(m.id),
        None => Ok(input.to_string()),
    }
}

pub struct AddArgs<'a> {
    pub medicine: &'a str,
    pub time: &'a str,
    pub recurrence: &'a str,
    pub days: Option<&'a str>,
    pub dose: Option<&'a str>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub prescription: Option<&'a str>,
    pub note: Option<&'a str>,
}

pub fn run_add(args: AddArgs<'_>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let medicine_id = resolve_medicine_id(&db, &user, args.medicine)?;
    let recurrence: Recurrence = args.recurrence.parse()?;
    let specific_days = match args.days {
        Some(d) => parse_days(d)?,
        None => Vec::new(),
    };
    let dosage = parse_dosage(args.dose);

    let reminder = engine::create_reminder(
        &db,
        &user,
        NewReminderParams {
            medicine_id: &medicine_id,
            prescription_id: args.prescription,
            reminder_time: parse_time(args.time)?,
            recurrence,
            specific_days,
            dosage_amount: dosage.amount.as_deref(),
            dosage_unit: dosage.unit.as_deref(),
            start_date: args.start.unwrap_or_else(|| Local::now().date_naive()),
            end_date: args.end,
            notes: args.note,
        },
    )?;

    if human {
        let medicine_name = db
            .get_medicine(&reminder.medicine_id, &user)?
            .map(|m| m.name)
            .unwrap_or_else(|| reminder.medicine_id.clone());
        println!(
            "Added reminder: {}",
            output::human::format_reminder(&reminder, &medicine_name)
        );
    } else {
        let out = output::success("reminder_add", json!(reminder));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(
    active: Option<bool>,
    medicine: Option<&str>,
    page: u32,
    per_page: u32,
    user: Option<&str>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let query = ReminderQuery {
        active,
        medicine_id: medicine.map(String::from),
        page,
        per_page: per_page.clamp(1, 100),
    };
    let (reminders, total) = engine::list_reminders(&db, &user, &query)?;

    if human {
        for r in &reminders {
            let medicine_name = db
                .get_medicine(&r.medicine_id, &user)?
                .map(|m| m.name)
                .unwrap_or_else(|| r.medicine_id.clone());
            let flag = if r.active { "" } else { " (inactive)" };
            println!(
                "{}  {}{}",
                r.id,
                output::human::format_reminder(r, &medicine_name),
                flag
            );
        }
        println!("{} of {} reminders", reminders.len(), total);
    } else {
        let out = output::success(
            "reminder_list",
            json!({
                "reminders": reminders,
                "total": total,
                "page": query.page,
                "per_page": query.per_page,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub struct UpdateArgs<'a> {
    pub id: &'a str,
    pub time: Option<&'a str>,
    pub recurrence: Option<&'a str>,
    pub days: Option<&'a str>,
    pub dose: Option<&'a str>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub active: Option<bool>,
    pub note: Option<&'a str>,
}

pub fn run_update(args: UpdateArgs<'_>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let dosage = parse_dosage(args.dose);
    let patch = ReminderPatch {
        reminder_time: args.time.map(parse_time).transpose()?,
        recurrence: args.recurrence.map(str::parse).transpose()?,
        specific_days: args.days.map(parse_days).transpose()?,
        dosage_amount: dosage.amount,
        dosage_unit: dosage.unit,
        start_date: args.start,
        end_date: args.end,
        active: args.active,
        notes: args.note.map(String::from),
    };
    let reminder = engine::update_reminder(&db, args.id, &user, patch)?;

    if human {
        println!("Updated reminder {}", reminder.id);
    } else {
        let out = output::success("reminder_update", json!(reminder));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_delete(id: &str, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    engine::delete_reminder(&db, id, &user)?;

    if human {
        println!("Deleted reminder {id} and its event history");
    } else {
        let out = output::success("reminder_delete", json!({ "id": id, "deleted": true }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_today(user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let now = Local::now().naive_local();
    let entries = engine::today_with_status(&db, &user, now)?;

    if human {
        println!("{}", output::human::format_today(&entries));
    } else {
        let out = output::success("reminder_today", json!({ "reminders": entries }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_status(id: &str, date: Option<NaiveDate>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let now = Local::now().naive_local();
    let date = date.unwrap_or_else(|| now.date());
    let status = engine::reminder_status(&db, id, &user, date, now)?;

    if human {
        println!("{status}");
    } else {
        let out = output::success(
            "reminder_status",
            json!({ "id": id, "date": date, "status": status }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_take(id: &str, note: Option<&str>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let now = Local::now().naive_local();
    let event = engine::mark_taken(&db, id, &user, note, now)?;

    if human {
        println!(
            "Recorded taken at {}",
            event
                .action_at
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default()
        );
    } else {
        let out = output::success("reminder_take", json!(event));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_skip(id: &str, note: Option<&str>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let now = Local::now().naive_local();
    let event = engine::mark_skipped(&db, id, &user, note, now)?;

    if human {
        println!("Recorded skip for {}", event.scheduled_at.format("%Y-%m-%d"));
    } else {
        let out = output::success("reminder_skip", json!(event));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_sweep(user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    let now = Local::now().naive_local();
    let recorded = engine::sweep_missed(&db, &user, now)?;

    if human {
        println!("Recorded {recorded} missed reminders");
    } else {
        let out = output::success("reminder_sweep", json!({ "missed_recorded": recorded }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub struct HistoryArgs<'a> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub status: Option<&'a str>,
    pub medicine: Option<&'a str>,
    pub page: u32,
    pub per_page: u32,
}

pub fn run_history(args: HistoryArgs<'_>, user: Option<&str>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let user = resolve_user(&config, user);

    if args.to < args.from {
        bail!("end date {} is before start date {}", args.to, args.from);
    }
    let status: Option<EventStatus> = args.status.map(str::parse).transpose()?;

    let (events, total) = engine::reminder_history(
        &db,
        &user,
        args.from,
        args.to,
        status,
        args.medicine,
        args.page,
        args.per_page.clamp(1, 100),
    )?;

    if human {
        println!("{}", output::human::format_history(&events));
        println!("{} of {} events", events.len(), total);
    } else {
        let out = output::success(
            "reminder_history",
            json!({
                "events": events,
                "total": total,
                "page": args.page,
                "per_page": args.per_page,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
