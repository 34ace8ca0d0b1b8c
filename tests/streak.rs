mod common;

use pillbox::core::adherence;
use pillbox::models::event::EventStatus;

use common::{date, record_event, seed_medicine, seed_reminder, setup_db, time};

// ---------------------------------------------------------------------------
// 1. imperfect day resets the run (P6)
// ---------------------------------------------------------------------------

#[test]
fn imperfect_day_resets_current_streak() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let morning = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));
    let evening = seed_reminder(&db, "u1", &med.id, time(20, 0), date(2025, 5, 1));

    let d1 = date(2025, 6, 8);
    let d2 = date(2025, 6, 9);
    let d3 = date(2025, 6, 10);

    // D1: perfect (single scheduled event, taken)
    record_event(&db, &morning, d1, EventStatus::Taken);
    // D2: imperfect — one of two scheduled occurrences missed
    record_event(&db, &morning, d2, EventStatus::Taken);
    record_event(&db, &evening, d2, EventStatus::Missed);
    // D3: perfect
    record_event(&db, &morning, d3, EventStatus::Taken);

    let s = adherence::streak(&db, "u1", d3).unwrap();
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.longest_streak, 1);
    assert_eq!(s.last_taken_date, Some(d3));
}

// ---------------------------------------------------------------------------
// 2. event-free days are neutral
// ---------------------------------------------------------------------------

#[test]
fn days_without_events_do_not_break_streak() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));

    // Perfect days with a two-day gap in between
    record_event(&db, &r, date(2025, 6, 5), EventStatus::Taken);
    record_event(&db, &r, date(2025, 6, 8), EventStatus::Taken);
    record_event(&db, &r, date(2025, 6, 9), EventStatus::Taken);

    let s = adherence::streak(&db, "u1", date(2025, 6, 9)).unwrap();
    assert_eq!(s.current_streak, 3);
    assert_eq!(s.longest_streak, 3);
}

// ---------------------------------------------------------------------------
// 3. longest remembers a broken run
// ---------------------------------------------------------------------------

#[test]
fn longest_streak_survives_reset() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));

    // 4 perfect days, a missed day, then 2 perfect days
    for i in 1..=4 {
        record_event(&db, &r, date(2025, 6, i), EventStatus::Taken);
    }
    record_event(&db, &r, date(2025, 6, 5), EventStatus::Missed);
    record_event(&db, &r, date(2025, 6, 6), EventStatus::Taken);
    record_event(&db, &r, date(2025, 6, 7), EventStatus::Taken);

    let s = adherence::streak(&db, "u1", date(2025, 6, 7)).unwrap();
    assert_eq!(s.current_streak, 2);
    assert_eq!(s.longest_streak, 4);
    assert_eq!(s.last_taken_date, Some(date(2025, 6, 7)));
}

// ---------------------------------------------------------------------------
// 4. the in-progress day cannot break the streak
// ---------------------------------------------------------------------------

#[test]
fn current_day_never_breaks_streak() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let morning = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));
    let evening = seed_reminder(&db, "u1", &med.id, time(20, 0), date(2025, 5, 1));

    let yesterday = date(2025, 6, 9);
    let today = date(2025, 6, 10);

    record_event(&db, &morning, yesterday, EventStatus::Taken);
    // Today is so far imperfect: morning taken, evening swept as missed by
    // an earlier tick, but the day is not over
    record_event(&db, &morning, today, EventStatus::Taken);
    record_event(&db, &evening, today, EventStatus::Missed);

    let s = adherence::streak(&db, "u1", today).unwrap();
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.last_taken_date, Some(yesterday));
}

// ---------------------------------------------------------------------------
// 5. skipped doses are not perfect
// ---------------------------------------------------------------------------

#[test]
fn skipped_day_is_not_perfect() {
    let (_dir, db) = setup_db();
    let med = seed_medicine(&db, "u1", "metformin");
    let r = seed_reminder(&db, "u1", &med.id, time(8, 0), date(2025, 5, 1));

    record_event(&db, &r, date(2025, 6, 9), EventStatus::Skipped);

    let s = adherence::streak(&db, "u1", date(2025, 6, 10)).unwrap();
    assert_eq!(s.current_streak, 0);
    assert_eq!(s.longest_streak, 0);
    assert_eq!(s.last_taken_date, None);
}

// ---------------------------------------------------------------------------
// 6. nothing on record
// ---------------------------------------------------------------------------

#[test]
fn empty_history_yields_zero_streak() {
    let (_dir, db) = setup_db();
    let s = adherence::streak(&db, "u1", date(2025, 6, 10)).unwrap();
    assert_eq!(s.current_streak, 0);
    assert_eq!(s.longest_streak, 0);
    assert_eq!(s.last_taken_date, None);
}
