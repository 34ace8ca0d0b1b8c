mod common;

use pillbox::core::{adherence, engine};
use pillbox::models::event::EventStatus;

use common::{date, record_event, seed_medicine, seed_reminder, setup_db, time};

// ---------------------------------------------------------------------------
// 1. stats arithmetic (P5)
// ---------------------------------------------------------------------------

#[test]
fn stats_counts_and_rate() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));

    // 10 scheduled: 7 taken, 2 skipped, 1 missed
    let start = date(2025, 6, 1);
    for i in 0..7 {
        record_event(&db, &r, start + chrono::Duration::days(i), EventStatus::Taken);
    }
    record_event(&db, &r, date(2025, 6, 8), EventStatus::Skipped);
    record_event(&db, &r, date(2025, 6, 9), EventStatus::Skipped);
    record_event(&db, &r, date(2025, 6, 10), EventStatus::Missed);

    let stats = adherence::stats(&db, "u1", date(2025, 6, 1), date(2025, 6, 10)).unwrap();
    assert_eq!(stats.total_scheduled, 10);
    assert_eq!(stats.taken, 7);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.missed, 1);
    assert!((stats.adherence_rate - 70.0).abs() < f64::EPSILON);
}

#[test]
fn stats_empty_window_is_zero() {
    let (_dir, db) = setup_db();
    let stats = adherence::stats(&db, "u1", date(2025, 6, 1), date(2025, 6, 30)).unwrap();
    assert_eq!(stats.total_scheduled, 0);
    assert!((stats.adherence_rate - 0.0).abs() < f64::EPSILON);
}

#[test]
fn stats_scoped_to_window_and_user() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));
    let other_med = seed_medicine(&db, "u2", "aspirin");
    let other = seed_reminder(&db, "u2", &other_med.id, time(8, 0), date(2025, 5, 1));

    record_event(&db, &r, date(2025, 5, 31), EventStatus::Taken); // before window
    record_event(&db, &r, date(2025, 6, 1), EventStatus::Taken);
    record_event(&db, &other, date(2025, 6, 1), EventStatus::Missed); // other user

    let stats = adherence::stats(&db, "u1", date(2025, 6, 1), date(2025, 6, 30)).unwrap();
    assert_eq!(stats.total_scheduled, 1);
    assert_eq!(stats.taken, 1);
    assert!((stats.adherence_rate - 100.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// 2. daily series
// ---------------------------------------------------------------------------

#[test]
fn daily_series_oldest_first_with_empty_days_at_100() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));

    let today = date(2025, 6, 10);
    record_event(&db, &r, date(2025, 6, 9), EventStatus::Missed);
    record_event(&db, &r, today, EventStatus::Taken);

    let series = adherence::daily_series(&db, "u1", 3, today).unwrap();
    assert_eq!(series.len(), 3);

    // Oldest first
    assert_eq!(series[0].date, date(2025, 6, 8));
    assert_eq!(series[1].date, date(2025, 6, 9));
    assert_eq!(series[2].date, today);

    // Day with nothing scheduled reports 100 (inherited convention)
    assert_eq!(series[0].total_scheduled, 0);
    assert!((series[0].adherence_rate - 100.0).abs() < f64::EPSILON);

    assert_eq!(series[1].missed, 1);
    assert!((series[1].adherence_rate - 0.0).abs() < f64::EPSILON);

    assert_eq!(series[2].taken, 1);
    assert!((series[2].adherence_rate - 100.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// 3. per-medicine breakdown
// ---------------------------------------------------------------------------

#[test]
fn by_medicine_groups_and_sorts_by_rate() {
    let (_dir, db) = setup_db();
    let good = seed_medicine(&db, "u1", "metformin");
    let bad = seed_medicine(&db, "u1", "lisinopril");
    let r_good = seed_reminder(&db, "u1", &good.id, time(8, 0), date(2025, 5, 1));
    let r_bad = seed_reminder(&db, "u1", &bad.id, time(9, 0), date(2025, 5, 1));

    record_event(&db, &r_good, date(2025, 6, 1), EventStatus::Taken);
    record_event(&db, &r_good, date(2025, 6, 2), EventStatus::Taken);
    record_event(&db, &r_bad, date(2025, 6, 1), EventStatus::Taken);
    record_event(&db, &r_bad, date(2025, 6, 2), EventStatus::Missed);
    record_event(&db, &r_bad, date(2025, 6, 3), EventStatus::Skipped);

    let breakdown = adherence::by_medicine(&db, "u1", date(2025, 6, 1), date(2025, 6, 30)).unwrap();
    assert_eq!(breakdown.medicines.len(), 2);

    // Best adherence first
    assert_eq!(breakdown.medicines[0].medicine_name, "metformin");
    assert!((breakdown.medicines[0].adherence_rate - 100.0).abs() < f64::EPSILON);
    assert_eq!(breakdown.medicines[1].medicine_name, "lisinopril");
    assert!((breakdown.medicines[1].adherence_rate - 33.33).abs() < 0.01);

    // 3 of 5 events taken overall
    assert!((breakdown.overall_adherence - 60.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// 4. end-to-end scenario: create → today → take → stats
// ---------------------------------------------------------------------------

#[test]
fn take_today_flows_into_stats() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 6, 10));

    let day = date(2025, 6, 10);
    let now = day.and_hms_opt(7, 0, 0).unwrap();

    let today = engine::today_reminders(&db, "u1", day).unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].id, r.id);

    engine::mark_taken(&db, &r.id, "u1", None, now).unwrap();

    let stats = adherence::stats(&db, "u1", day, day).unwrap();
    assert_eq!(stats.total_scheduled, 1);
    assert_eq!(stats.taken, 1);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.missed, 0);
    assert!((stats.adherence_rate - 100.0).abs() < f64::EPSILON);
}
