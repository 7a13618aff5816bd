use super::types::{GenerationResult, SchedError};
use super::{scoring, util, validation, GenerationRequest};
use crate::model::{GeneratedSchedule, StaffPreference, WorkCode};
use crate::rules::ScheduleRule;
use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashSet;

const WEEKEND_DAY_SHIFT_PROBABILITY: f64 = 0.7;
const MAX_NIGHTS_IN_LOOKBACK: usize = 2;

/// Motif d'un repos imposé, par ordre de priorité.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForcedOff {
    Unavailable,
    MaxConsecutive,
    RestAfterNight,
    WeekendCap,
}

impl ForcedOff {
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            ForcedOff::Unavailable => "unavailable date",
            ForcedOff::MaxConsecutive => "max consecutive days reached",
            ForcedOff::RestAfterNight => "rest after night shift",
            ForcedOff::WeekendCap => "weekend staffing cap reached",
        }
    }
}

pub(super) fn generate<R: Rng>(
    req: &GenerationRequest<'_>,
    rng: &mut R,
) -> Result<GenerationResult, SchedError> {
    check_request(req)?;

    let days = (req.end - req.start).num_days() as usize + 1;
    let mut schedules = Vec::with_capacity(req.staff.len() * days);
    // historique chronologique des codes, par position dans le roster
    let mut history: Vec<Vec<WorkCode>> = vec![Vec::with_capacity(days); req.staff.len()];

    for date in util::days_inclusive(req.start, req.end) {
        let weekend = util::is_weekend(date);
        let mut working_today = 0u32;

        // ordre du roster : le plafond du week-end favorise les premiers membres
        for (member, past) in req.staff.iter().zip(history.iter_mut()) {
            let pref = req.preferences.and_then(|p| p.get(&member.id));
            let ctx = DayContext {
                rule: req.rule,
                date,
                weekend,
                working_today,
            };

            let code = match forced_off(&ctx, pref, past) {
                Some(_reason) => {
                    #[cfg(feature = "logging")]
                    tracing::debug!(staff = %member.id, %date, reason = _reason.as_str(), "forced day off");
                    WorkCode::Off
                }
                None => select_work_type(&ctx, pref, past, rng),
            };

            if code.is_working() {
                working_today += 1;
            }
            past.push(code);
            schedules.push(GeneratedSchedule::new(
                member.id.clone(),
                date,
                code,
                req.building,
                req.floor,
            ));
        }
    }

    let statistics = scoring::compute_statistics(&schedules);
    let violations = validation::validate_all(&schedules, req.rule, req.staff);
    let score = scoring::score(&schedules, &violations, req.rule);

    #[cfg(feature = "logging")]
    tracing::info!(
        schedules = schedules.len(),
        violations = violations.len(),
        score,
        "schedule generated"
    );

    Ok(GenerationResult {
        schedules,
        statistics,
        violations,
        score,
    })
}

fn check_request(req: &GenerationRequest<'_>) -> Result<(), SchedError> {
    if req.staff.is_empty() {
        return Err(SchedError::EmptyRoster);
    }
    if req.start > req.end {
        return Err(SchedError::InvalidDateRange {
            start: req.start,
            end: req.end,
        });
    }
    let mut seen = HashSet::with_capacity(req.staff.len());
    if let Some(dup) = req.staff.iter().find(|s| !seen.insert(&s.id)) {
        return Err(SchedError::DuplicateStaff(dup.id.as_str().to_string()));
    }
    req.rule.validate()
}

struct DayContext<'a> {
    rule: &'a ScheduleRule,
    date: NaiveDate,
    weekend: bool,
    /// membres déjà placés sur un poste travaillé ce jour-là
    working_today: u32,
}

fn forced_off(
    ctx: &DayContext<'_>,
    pref: Option<&StaffPreference>,
    past: &[WorkCode],
) -> Option<ForcedOff> {
    if pref.is_some_and(|p| p.is_unavailable(ctx.date)) {
        return Some(ForcedOff::Unavailable);
    }

    let consec = &ctx.rule.consecutive_work;
    let window = util::tail(
        past,
        util::LOOKBACK_DAYS.max(consec.max_consecutive_days as usize),
    );
    if util::trailing_work_days(window) >= consec.max_consecutive_days {
        return Some(ForcedOff::MaxConsecutive);
    }

    if past.last() == Some(&WorkCode::N) && consec.off_days_after_night > 0 {
        return Some(ForcedOff::RestAfterNight);
    }

    if ctx.weekend && ctx.working_today >= ctx.rule.weekend_holiday.weekend_staff_count {
        return Some(ForcedOff::WeekendCap);
    }

    None
}

fn select_work_type<R: Rng>(
    ctx: &DayContext<'_>,
    pref: Option<&StaffPreference>,
    past: &[WorkCode],
    rng: &mut R,
) -> WorkCode {
    if let Some(preferred) = pref.map(|p| &p.preferred_shifts).filter(|s| !s.is_empty()) {
        let idx = rng.random_range(0..preferred.len());
        if let Some(code) = preferred.iter().nth(idx) {
            return *code;
        }
    }

    if ctx.weekend {
        return if rng.random::<f64>() < WEEKEND_DAY_SHIFT_PROBABILITY {
            WorkCode::D
        } else {
            WorkCode::A
        };
    }

    let recent_nights = util::night_count(util::tail(past, util::LOOKBACK_DAYS));
    if recent_nights < MAX_NIGHTS_IN_LOOKBACK
        && rng.random::<f64>() < ctx.rule.night_probability()
    {
        return WorkCode::N;
    }

    let draw = rng.random::<f64>();
    if draw < 0.4 {
        WorkCode::A
    } else if draw < 0.7 {
        WorkCode::D
    } else {
        WorkCode::E
    }
}

