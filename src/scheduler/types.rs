use crate::model::{GeneratedSchedule, StaffId, WorkCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// `staffId` porté par les violations qui concernent tout l'établissement.
pub const SYSTEM_STAFF_ID: &str = "SYSTEM";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hard,
    Soft,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Hard => "hard",
            Severity::Soft => "soft",
        }
    }
}

/// Nom de la règle enfreinte, sérialisé comme dans la configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    MaxConsecutiveDays,
    OffDaysAfterNight,
    WeekendStaffCount,
    UnavailableDates,
    MaxWorkDays,
    MinWorkDays,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::MaxConsecutiveDays => "maxConsecutiveDays",
            RuleKind::OffDaysAfterNight => "offDaysAfterNight",
            RuleKind::WeekendStaffCount => "weekendStaffCount",
            RuleKind::UnavailableDates => "unavailableDates",
            RuleKind::MaxWorkDays => "maxWorkDays",
            RuleKind::MinWorkDays => "minWorkDays",
        }
    }
}

/// Infraction constatée : une donnée du résultat, jamais une erreur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub rule: RuleKind,
    pub message: String,
}

impl RuleViolation {
    pub fn is_hard(&self) -> bool {
        self.severity == Severity::Hard
    }

    pub fn is_system(&self) -> bool {
        self.staff_id.as_str() == SYSTEM_STAFF_ID
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStatistics {
    pub work_days: u32,
    pub total_hours: u32,
    pub night_count: u32,
    pub weekend_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatistics {
    pub total_schedules: usize,
    pub by_staff: BTreeMap<StaffId, StaffStatistics>,
    pub by_shift: BTreeMap<WorkCode, usize>,
}

/// Artefact terminal d'une génération.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub schedules: Vec<GeneratedSchedule>,
    pub statistics: GenerationStatistics,
    pub violations: Vec<RuleViolation>,
    pub score: u8,
}

impl GenerationResult {
    pub fn hard_violations(&self) -> impl Iterator<Item = &RuleViolation> {
        self.violations.iter().filter(|v| v.is_hard())
    }

    pub fn schedule_for(&self, staff: &StaffId, date: NaiveDate) -> Option<&GeneratedSchedule> {
        self.schedules
            .iter()
            .find(|s| &s.staff_id == staff && s.date == date)
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid input: staff roster is empty")]
    EmptyRoster,
    #[error("invalid input: start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid input: duplicate staff id in roster: {0}")]
    DuplicateStaff(String),
    #[error("invalid input: malformed schedule rule: {0}")]
    InvalidRule(String),
}

impl SchedError {
    /// Toutes les erreurs de la génération relèvent de la classe « entrée invalide ».
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SchedError::EmptyRoster
                | SchedError::InvalidDateRange { .. }
                | SchedError::DuplicateStaff(_)
                | SchedError::InvalidRule(_)
        )
    }
}
