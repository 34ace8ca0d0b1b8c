use colored::Colorize;
use comfy_table::{Table, presets};

use crate::core::adherence::{AdherenceStats, DayAdherence, MedicineBreakdown, StreakStats};
use crate::core::engine::TodayEntry;
use crate::core::schedule::{DailyTickReport, WeeklyTickReport};
use crate::db::EventWithContext;
use crate::models::event::DisplayStatus;
use crate::models::medicine::Medicine;
use crate::models::reminder::Reminder;

fn status_label(status: DisplayStatus) -> String {
    let s = status.to_string();
    match status {
        DisplayStatus::Taken => s.green().to_string(),
        DisplayStatus::Missed => s.red().to_string(),
        DisplayStatus::Pending => s.yellow().to_string(),
        DisplayStatus::Skipped | DisplayStatus::Upcoming => s.dimmed().to_string(),
    }
}

/// Pretty-print one reminder definition.
pub fn format_reminder(r: &Reminder, medicine_name: &str) -> String {
    let dose = r.dosage().unwrap_or_else(|| "(no dose)".to_string());
    let days = if r.specific_days.is_empty() {
        String::new()
    } else {
        let names = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        let listed: Vec<&str> = r
            .specific_days
            .iter()
            .filter_map(|d| names.get(*d as usize).copied())
            .collect();
        format!(" on {}", listed.join(","))
    };
    let until = r
        .end_date
        .map(|d| format!(" until {d}"))
        .unwrap_or_default();
    format!(
        "{} {} at {} {}{} from {}{}",
        medicine_name,
        dose,
        r.reminder_time.format("%H:%M"),
        r.recurrence,
        days,
        r.start_date,
        until,
    )
}

/// Today's dashboard as a table, one row per unresolved reminder.
pub fn format_today(entries: &[TodayEntry]) -> String {
    if entries.is_empty() {
        return "Nothing left to take today.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["Time", "Medicine", "Dose", "Status"]);
    for e in entries {
        let status = if e.is_pending {
            "due now".yellow().to_string()
        } else {
            status_label(e.status)
        };
        table.add_row(vec![
            e.scheduled_at.format("%H:%M").to_string(),
            e.medicine_name.clone(),
            e.dosage.clone().unwrap_or_default(),
            status,
        ]);
    }
    table.to_string()
}

pub fn format_stats(s: &AdherenceStats) -> String {
    let rate = format!("{:.1}%", s.adherence_rate);
    let rate = if s.adherence_rate >= 80.0 {
        rate.green().to_string()
    } else if s.adherence_rate >= 50.0 {
        rate.yellow().to_string()
    } else {
        rate.red().to_string()
    };
    format!(
        "{} scheduled | {} taken, {} skipped, {} missed | adherence {}",
        s.total_scheduled, s.taken, s.skipped, s.missed, rate,
    )
}

pub fn format_daily(series: &[DayAdherence]) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["Date", "Scheduled", "Taken", "Skipped", "Missed", "Rate"]);
    for d in series {
        table.add_row(vec![
            d.date.to_string(),
            d.total_scheduled.to_string(),
            d.taken.to_string(),
            d.skipped.to_string(),
            d.missed.to_string(),
            format!("{:.0}%", d.adherence_rate),
        ]);
    }
    table.to_string()
}

pub fn format_streak(s: &StreakStats) -> String {
    let last = s
        .last_taken_date
        .map(|d| format!(" (last perfect day {d})"))
        .unwrap_or_default();
    format!(
        "Current streak: {} days | longest: {} days{}",
        s.current_streak, s.longest_streak, last,
    )
}

pub fn format_by_medicine(b: &MedicineBreakdown) -> String {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["Medicine", "Scheduled", "Taken", "Rate"]);
    for m in &b.medicines {
        table.add_row(vec![
            m.medicine_name.clone(),
            m.total_scheduled.to_string(),
            m.taken.to_string(),
            format!("{:.1}%", m.adherence_rate),
        ]);
    }
    format!(
        "{}\nOverall adherence: {:.1}%",
        table, b.overall_adherence
    )
}

pub fn format_history(events: &[EventWithContext]) -> String {
    if events.is_empty() {
        return "No events in range.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_header(vec!["Scheduled", "Medicine", "Status", "Acted at", "Notes"]);
    for e in events {
        table.add_row(vec![
            e.event.scheduled_at.format("%Y-%m-%d %H:%M").to_string(),
            e.medicine_name.clone(),
            e.event.status.to_string(),
            e.event
                .action_at
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            e.event.notes.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn format_medicines(meds: &[Medicine]) -> String {
    if meds.is_empty() {
        return "No medicines registered.".to_string();
    }
    meds.iter()
        .map(|m| {
            let notes = m
                .notes
                .as_ref()
                .map(|n| format!("  # {n}"))
                .unwrap_or_default();
            format!("{}  {}{}", m.id, m.name, notes)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_daily_tick(report: &DailyTickReport) -> String {
    format!(
        "Daily tick: {} missed reminders recorded across {} users",
        report.total_missed,
        report.users.len(),
    )
}

pub fn format_weekly_tick(report: &WeeklyTickReport) -> String {
    if report.observations.is_empty() {
        return "Weekly tick: no users with active reminders.".to_string();
    }
    let mut out = String::from("Weekly tick:\n");
    for o in &report.observations {
        out.push_str(&format!(
            "  {}: streak {} (longest {})",
            o.user_id, o.current_streak, o.longest_streak
        ));
        if let Some(m) = o.milestone {
            out.push_str(&format!("  milestone: {m} days"));
        }
        if let Some(d) = o.adherence_drop {
            out.push_str(&format!("  adherence dropped to {d:.0}%"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
