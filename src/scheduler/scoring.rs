use super::types::{GenerationStatistics, RuleViolation, Severity};
use super::util;
use crate::model::{GeneratedSchedule, StaffId, WorkCode};
use crate::rules::ScheduleRule;
use std::collections::BTreeMap;

const HARD_PENALTY: f64 = 10.0;
const SOFT_PENALTY: f64 = 2.0;
const MAX_WORKLOAD_PENALTY: f64 = 20.0;

/// Agrège les affectations par membre et par code.
pub fn compute_statistics(schedules: &[GeneratedSchedule]) -> GenerationStatistics {
    let mut stats = GenerationStatistics {
        total_schedules: schedules.len(),
        ..GenerationStatistics::default()
    };

    for s in schedules {
        *stats.by_shift.entry(s.work_type).or_insert(0) += 1;

        let entry = stats.by_staff.entry(s.staff_id.clone()).or_default();
        entry.total_hours += s.hours();
        if !s.work_type.is_working() {
            continue;
        }
        entry.work_days += 1;
        if s.work_type == WorkCode::N {
            entry.night_count += 1;
        }
        if util::is_weekend(s.date) {
            entry.weekend_count += 1;
        }
    }

    stats
}

/// Note de qualité dans `[0, 100]`.
///
/// 100, moins 10 par violation dure et 2 par violation souple ; si
/// `balanceWorkload` est actif, moins `min(variance * 0.5, 20)` où la variance
/// (population) porte sur le nombre de jours travaillés par membre.
pub fn score(
    schedules: &[GeneratedSchedule],
    violations: &[RuleViolation],
    rule: &ScheduleRule,
) -> u8 {
    let mut total: f64 = 100.0;
    for v in violations {
        total -= match v.severity {
            Severity::Hard => HARD_PENALTY,
            Severity::Soft => SOFT_PENALTY,
        };
    }

    if rule.fairness.balance_workload {
        let variance = workload_variance(schedules);
        total -= (variance * 0.5).min(MAX_WORKLOAD_PENALTY);
    }

    total.clamp(0.0, 100.0).round() as u8
}

/// Variance (population) du nombre de jours travaillés par membre planifié.
pub fn workload_variance(schedules: &[GeneratedSchedule]) -> f64 {
    let mut work_days: BTreeMap<&StaffId, u32> = BTreeMap::new();
    for s in schedules {
        let days = work_days.entry(&s.staff_id).or_insert(0);
        if s.work_type.is_working() {
            *days += 1;
        }
    }
    if work_days.is_empty() {
        return 0.0;
    }

    let n = work_days.len() as f64;
    let mean = work_days.values().map(|d| f64::from(*d)).sum::<f64>() / n;
    work_days
        .values()
        .map(|d| (f64::from(*d) - mean).powi(2))
        .sum::<f64>()
        / n
}
