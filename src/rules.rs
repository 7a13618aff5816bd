use crate::scheduler::SchedError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration complète de génération, telle que produite par l'écran de réglages.
///
/// Valeur immuable : les `with_*` renvoient une copie modifiée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    pub work_patterns: WorkPatterns,
    pub consecutive_work: ConsecutiveWork,
    pub weekend_holiday: WeekendHoliday,
    pub fairness: Fairness,
}

/// Pourcentages cibles (0–100), utilisés uniquement comme poids de tirage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatterns {
    pub day_shift_ratio: u8,
    pub night_shift_ratio: u8,
    pub off_day_ratio: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsecutiveWork {
    pub max_consecutive_days: u32,
    pub min_off_days: u32,
    pub off_days_after_night: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekendHoliday {
    pub weekend_staff_count: u32,
    /// Accepté mais non consommé par la génération.
    #[serde(default)]
    pub holiday_rotation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fairness {
    #[serde(default)]
    pub balance_workload: bool,
    #[serde(default)]
    pub balance_night_shift: bool,
    #[serde(default)]
    pub balance_weekend: bool,
}

impl Default for ScheduleRule {
    fn default() -> Self {
        Self {
            work_patterns: WorkPatterns {
                day_shift_ratio: 60,
                night_shift_ratio: 20,
                off_day_ratio: 20,
            },
            consecutive_work: ConsecutiveWork {
                max_consecutive_days: 5,
                min_off_days: 2,
                off_days_after_night: 1,
            },
            weekend_holiday: WeekendHoliday {
                weekend_staff_count: 3,
                holiday_rotation: true,
            },
            fairness: Fairness {
                balance_workload: true,
                balance_night_shift: true,
                balance_weekend: true,
            },
        }
    }
}

impl ScheduleRule {
    pub fn validate(&self) -> Result<(), SchedError> {
        let wp = &self.work_patterns;
        for (name, ratio) in [
            ("dayShiftRatio", wp.day_shift_ratio),
            ("nightShiftRatio", wp.night_shift_ratio),
            ("offDayRatio", wp.off_day_ratio),
        ] {
            if ratio > 100 {
                return Err(SchedError::InvalidRule(format!(
                    "{name} must be within 0..=100, got {ratio}"
                )));
            }
        }
        if self.consecutive_work.max_consecutive_days == 0 {
            return Err(SchedError::InvalidRule(
                "maxConsecutiveDays must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Probabilité d'un poste de nuit, dans [0, 1].
    pub fn night_probability(&self) -> f64 {
        f64::from(self.work_patterns.night_shift_ratio) / 100.0
    }

    pub fn with_work_patterns(mut self, day: u8, night: u8, off: u8) -> Self {
        self.work_patterns = WorkPatterns {
            day_shift_ratio: day,
            night_shift_ratio: night,
            off_day_ratio: off,
        };
        self
    }

    pub fn with_night_shift_ratio(mut self, ratio: u8) -> Self {
        self.work_patterns.night_shift_ratio = ratio;
        self
    }

    pub fn with_max_consecutive_days(mut self, days: u32) -> Self {
        self.consecutive_work.max_consecutive_days = days;
        self
    }

    pub fn with_min_off_days(mut self, days: u32) -> Self {
        self.consecutive_work.min_off_days = days;
        self
    }

    pub fn with_off_days_after_night(mut self, days: u32) -> Self {
        self.consecutive_work.off_days_after_night = days;
        self
    }

    pub fn with_weekend_staff_count(mut self, count: u32) -> Self {
        self.weekend_holiday.weekend_staff_count = count;
        self
    }

    pub fn with_holiday_rotation(mut self, enabled: bool) -> Self {
        self.weekend_holiday.holiday_rotation = enabled;
        self
    }

    pub fn with_fairness(mut self, fairness: Fairness) -> Self {
        self.fairness = fairness;
        self
    }

    pub fn with_balance_workload(mut self, enabled: bool) -> Self {
        self.fairness.balance_workload = enabled;
        self
    }
}

/// Parse et valide une règle JSON ; un champ numérique manquant est une entrée invalide.
pub fn parse_rule_json(raw: &str) -> Result<ScheduleRule, SchedError> {
    let rule: ScheduleRule =
        serde_json::from_str(raw).map_err(|e| SchedError::InvalidRule(e.to_string()))?;
    rule.validate()?;
    Ok(rule)
}

pub fn load_rule_from_file<P: AsRef<Path>>(path: P) -> Result<ScheduleRule> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).with_context(|| format!("reading rule {}", path.display()))?;
    let rule =
        parse_rule_json(&data).with_context(|| format!("parsing rule {}", path.display()))?;
    Ok(rule)
}

pub fn export_rule_json<P: AsRef<Path>>(path: P, rule: &ScheduleRule) -> Result<()> {
    let json = serde_json::to_string_pretty(rule)?;
    fs::write(path, json)?;
    Ok(())
}
