#![forbid(unsafe_code)]
//! Carerota — génération et contrôle de plannings de postes pour un établissement de soins.
//!
//! - Génération jour par jour, membre par membre, contraintes dures appliquées en ligne.
//! - Moteur de règles unique (repos après nuit, jours consécutifs, effectif du week-end).
//! - Note de qualité 0–100 à partir des violations et de l'équilibre de charge.
//! - Aléa injectable et reproductible ; aucune persistance des plannings générés.

pub mod io;
pub mod model;
pub mod rules;
pub mod scheduler;
pub mod storage;

pub use model::{
    index_preferences, GeneratedSchedule, ShiftTimes, Staff, StaffId, StaffPreference,
    StaffStatus, WorkCode,
};
pub use rules::{
    load_rule_from_file, parse_rule_json, ConsecutiveWork, Fairness, ScheduleRule,
    WeekendHoliday, WorkPatterns,
};
pub use scheduler::{
    compute_statistics, generate, score, validate_all, validate_preferences, GenerationRequest,
    GenerationResult, GenerationStatistics, Generator, RuleKind, RuleViolation, SchedError,
    Severity, StaffStatistics,
};
pub use storage::{JsonRuleStorage, RuleStorage};
