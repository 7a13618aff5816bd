#![forbid(unsafe_code)]
use carerota::{
    GenerationRequest, Generator, RuleKind, ScheduleRule, Staff, StaffId, StaffPreference,
    WorkCode,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, day).unwrap()
}

fn roster(n: usize) -> Vec<Staff> {
    (1..=n)
        .map(|i| Staff::new(format!("s{i}"), format!("Staff {i}"), "caregiver"))
        .collect()
}

fn codes_for(result: &carerota::GenerationResult, id: &str) -> Vec<WorkCode> {
    result
        .schedules
        .iter()
        .filter(|s| s.staff_id.as_str() == id)
        .map(|s| s.work_type)
        .collect()
}

#[test]
fn five_staff_one_week() {
    let rule = ScheduleRule::default()
        .with_max_consecutive_days(5)
        .with_weekend_staff_count(3)
        .with_off_days_after_night(1);
    let staff = roster(5);
    // lundi 6 → dimanche 12 janvier
    let req = GenerationRequest::new(&rule, &staff, d(1, 6), d(1, 12)).with_location("A동", "2층");

    for seed in 0..20 {
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        assert_eq!(result.statistics.total_schedules, 35);
        assert_eq!(result.schedules.len(), 35);

        for member in &staff {
            let codes = codes_for(&result, member.id.as_str());
            assert_eq!(codes.len(), 7);
            if codes[..5].iter().all(|c| c.is_working()) {
                assert_eq!(codes[5], WorkCode::Off, "seed {seed}, {}", member.id);
            }
        }
    }
}

#[test]
fn unavailable_date_always_off() {
    let rule = ScheduleRule::default();
    let staff = roster(4);
    let mut pref = StaffPreference::new(StaffId::new("s2"));
    pref.unavailable_dates.insert(d(1, 3));
    pref.preferred_shifts.insert(WorkCode::N);
    let prefs = HashMap::from([(pref.staff_id.clone(), pref)]);

    for seed in 0..20 {
        let req = GenerationRequest::new(&rule, &staff, d(1, 1), d(1, 10)).with_preferences(&prefs);
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        let entry = result.schedule_for(&StaffId::new("s2"), d(1, 3)).unwrap();
        assert_eq!(entry.work_type, WorkCode::Off);
        assert_eq!(entry.break_time, 0);
    }
}

#[test]
fn saturday_cap_follows_roster_order() {
    let rule = ScheduleRule::default().with_weekend_staff_count(3);
    let staff = roster(5);
    let saturday = d(1, 4);
    assert_eq!(saturday.weekday(), Weekday::Sat);

    for seed in 0..20 {
        let req = GenerationRequest::new(&rule, &staff, saturday, saturday);
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        let codes: Vec<_> = result.schedules.iter().map(|s| s.work_type).collect();
        assert!(codes[..3].iter().all(|c| matches!(c, WorkCode::D | WorkCode::A)));
        assert_eq!(&codes[3..], &[WorkCode::Off, WorkCode::Off]);
    }
}

#[test]
fn weekend_working_count_never_exceeds_cap() {
    let rule = ScheduleRule::default().with_weekend_staff_count(2);
    let staff = roster(6);
    let req = GenerationRequest::new(&rule, &staff, d(1, 1), d(2, 28));
    let result = Generator::with_seed(17).generate(&req).unwrap();
    let mut by_date: HashMap<NaiveDate, usize> = HashMap::new();
    for s in &result.schedules {
        if s.work_type.is_working() {
            *by_date.entry(s.date).or_default() += 1;
        }
    }
    for (date, count) in by_date {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            assert!(count <= 2, "{date}: {count}");
        }
    }
}

#[test]
fn small_roster_always_trips_weekend_floor() {
    let rule = ScheduleRule::default().with_weekend_staff_count(3);
    let staff = roster(2);
    let req = GenerationRequest::new(&rule, &staff, d(1, 1), d(1, 14));
    let result = Generator::with_seed(4).generate(&req).unwrap();
    let mut flagged: Vec<_> = result
        .violations
        .iter()
        .filter(|v| v.rule == RuleKind::WeekendStaffCount)
        .inspect(|v| {
            assert!(v.is_hard());
            assert!(v.is_system());
        })
        .map(|v| v.date)
        .collect();
    flagged.sort();
    assert_eq!(flagged, vec![d(1, 4), d(1, 5), d(1, 11), d(1, 12)]);
}

#[test]
fn same_seed_same_bytes() {
    let rule = ScheduleRule::default();
    let staff = roster(7);
    let req = GenerationRequest::new(&rule, &staff, d(3, 1), d(3, 31)).with_location("B", "1F");
    let a = Generator::with_seed(2025).generate(&req).unwrap();
    let b = Generator::with_seed(2025).generate(&req).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn statistics_and_score_are_consistent() {
    let rule = ScheduleRule::default();
    let staff = roster(5);
    for seed in 0..25 {
        let req = GenerationRequest::new(&rule, &staff, d(1, 1), d(1, 31));
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        let stats = &result.statistics;
        assert_eq!(stats.by_shift.values().sum::<usize>(), stats.total_schedules);
        assert_eq!(stats.by_staff.len(), staff.len());
        assert!(result.score <= 100);
        let recomputed = carerota::score(&result.schedules, &result.violations, &rule);
        assert_eq!(recomputed, result.score);
        assert!(result
            .violations
            .iter()
            .all(|v| v.rule != RuleKind::MaxConsecutiveDays));
    }
}

#[test]
fn nights_capped_within_seven_entry_window() {
    let rule = ScheduleRule::default().with_night_shift_ratio(100);
    let staff = roster(6);
    for seed in 0..20 {
        let req = GenerationRequest::new(&rule, &staff, d(1, 1), d(2, 28));
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        for member in &staff {
            let codes = codes_for(&result, member.id.as_str());
            for (i, code) in codes.iter().enumerate() {
                if *code != WorkCode::N {
                    continue;
                }
                let prior = codes[i.saturating_sub(7)..i]
                    .iter()
                    .filter(|c| **c == WorkCode::N)
                    .count();
                assert!(prior < 2, "seed {seed}, {} day {i}: {prior}", member.id);
            }
        }
    }
}

#[test]
fn unavailable_member_does_not_use_weekend_slot() {
    let rule = ScheduleRule::default().with_weekend_staff_count(3);
    let staff = roster(5);
    let saturday = d(1, 4);
    let mut pref = StaffPreference::new(StaffId::new("s1"));
    pref.unavailable_dates.insert(saturday);
    let prefs = HashMap::from([(pref.staff_id.clone(), pref)]);

    for seed in 0..20 {
        let req = GenerationRequest::new(&rule, &staff, saturday, saturday).with_preferences(&prefs);
        let result = Generator::with_seed(seed).generate(&req).unwrap();
        let codes: Vec<_> = result.schedules.iter().map(|s| s.work_type).collect();
        assert_eq!(codes[0], WorkCode::Off);
        assert!(codes[1..4].iter().all(|c| c.is_working()), "seed {seed}: {codes:?}");
        assert_eq!(codes[4], WorkCode::Off);
    }
}
