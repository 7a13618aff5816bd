use super::types::{RuleKind, RuleViolation, Severity, SYSTEM_STAFF_ID};
use super::util;
use crate::model::{GeneratedSchedule, Staff, StaffId, StaffPreference, WorkCode};
use crate::rules::ScheduleRule;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Réexamine un planning terminé, indépendamment de sa provenance.
///
/// Pur et déterministe : les violations sortent par membre (ordre du roster,
/// puis date), suivies des violations d'effectif du week-end par date croissante.
/// Les entrées d'un `staff_id` absent du roster sont ignorées par toutes les règles.
pub fn validate_all(
    schedules: &[GeneratedSchedule],
    rule: &ScheduleRule,
    staff: &[Staff],
) -> Vec<RuleViolation> {
    let mut out = Vec::new();

    for member in staff {
        let mut entries: Vec<&GeneratedSchedule> = schedules
            .iter()
            .filter(|s| s.staff_id == member.id)
            .collect();
        entries.sort_by_key(|s| s.date);
        check_staff_entries(&member.id, &entries, rule, &mut out);
    }

    check_weekend_staffing(schedules, rule, staff, &mut out);
    out
}

fn check_staff_entries(
    staff_id: &StaffId,
    entries: &[&GeneratedSchedule],
    rule: &ScheduleRule,
    out: &mut Vec<RuleViolation>,
) {
    let max_days = rule.consecutive_work.max_consecutive_days;
    let rest_after_night = rule.consecutive_work.off_days_after_night as usize;
    let mut consecutive = 0u32;

    for (idx, entry) in entries.iter().enumerate() {
        if entry.work_type.is_working() {
            consecutive += 1;
            if consecutive > max_days {
                out.push(RuleViolation {
                    severity: Severity::Hard,
                    staff_id: staff_id.clone(),
                    date: entry.date,
                    rule: RuleKind::MaxConsecutiveDays,
                    message: format!(
                        "{consecutive} consecutive working days (max {max_days})"
                    ),
                });
            }
        } else {
            consecutive = 0;
        }

        if entry.work_type != WorkCode::N {
            continue;
        }
        // entrées suivantes existantes, pas forcément les jours calendaires suivants
        for next in entries.iter().skip(idx + 1).take(rest_after_night) {
            if next.work_type.is_working() {
                out.push(RuleViolation {
                    severity: Severity::Soft,
                    staff_id: staff_id.clone(),
                    date: next.date,
                    rule: RuleKind::OffDaysAfterNight,
                    message: format!(
                        "worked {} after night shift on {} (rest required: {rest_after_night} day(s))",
                        next.work_type, entry.date
                    ),
                });
            }
        }
    }
}

fn check_weekend_staffing(
    schedules: &[GeneratedSchedule],
    rule: &ScheduleRule,
    staff: &[Staff],
    out: &mut Vec<RuleViolation>,
) {
    let required = rule.weekend_holiday.weekend_staff_count as usize;
    let roster: HashSet<&StaffId> = staff.iter().map(|m| &m.id).collect();
    let mut working_by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for s in schedules.iter().filter(|s| roster.contains(&s.staff_id)) {
        let count = working_by_date.entry(s.date).or_insert(0);
        if s.work_type.is_working() {
            *count += 1;
        }
    }

    for (date, working) in working_by_date {
        if !util::is_weekend(date) || working >= required {
            continue;
        }
        out.push(RuleViolation {
            severity: Severity::Hard,
            staff_id: StaffId::new(SYSTEM_STAFF_ID),
            date,
            rule: RuleKind::WeekendStaffCount,
            message: format!("{working} staff working on weekend (min {required})"),
        });
    }
}

/// Confronte un planning aux préférences individuelles.
///
/// Travail sur une date indisponible : violation dure. Nombre de jours travaillés
/// hors des bornes `minWorkDays`/`maxWorkDays` : violation souple, datée du
/// dernier jour planifié du membre.
pub fn validate_preferences(
    schedules: &[GeneratedSchedule],
    preferences: &HashMap<StaffId, StaffPreference>,
) -> Vec<RuleViolation> {
    let mut out = Vec::new();
    let mut ordered: Vec<&StaffPreference> = preferences.values().collect();
    ordered.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));

    for pref in ordered {
        let mut entries: Vec<&GeneratedSchedule> = schedules
            .iter()
            .filter(|s| s.staff_id == pref.staff_id)
            .collect();
        entries.sort_by_key(|s| s.date);

        for entry in &entries {
            if entry.work_type.is_working() && pref.is_unavailable(entry.date) {
                out.push(RuleViolation {
                    severity: Severity::Hard,
                    staff_id: pref.staff_id.clone(),
                    date: entry.date,
                    rule: RuleKind::UnavailableDates,
                    message: format!("assigned {} on an unavailable date", entry.work_type),
                });
            }
        }

        let Some(last) = entries.last() else {
            continue;
        };
        let worked = entries.iter().filter(|s| s.work_type.is_working()).count() as u32;
        if let Some(max) = pref.max_work_days.filter(|max| worked > *max) {
            out.push(RuleViolation {
                severity: Severity::Soft,
                staff_id: pref.staff_id.clone(),
                date: last.date,
                rule: RuleKind::MaxWorkDays,
                message: format!("{worked} working days (preferred max {max})"),
            });
        }
        if let Some(min) = pref.min_work_days.filter(|min| worked < *min) {
            out.push(RuleViolation {
                severity: Severity::Soft,
                staff_id: pref.staff_id.clone(),
                date: last.date,
                rule: RuleKind::MinWorkDays,
                message: format!("{worked} working days (preferred min {min})"),
            });
        }
    }

    out
}
