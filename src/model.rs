use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

/// Membre du personnel tel que fourni par la source du roster (lecture seule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub status: StaffStatus,
}

impl Staff {
    pub fn new<I: AsRef<str>, N: Into<String>, P: Into<String>>(
        id: I,
        name: N,
        position: P,
    ) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            position: position.into(),
            status: StaffStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

/// Code de poste. Les codes administratifs sont transportés tels quels,
/// sans sémantique de poste propre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkCode {
    S,
    A,
    D,
    E,
    N,
    O,
    #[serde(rename = "연")]
    AnnualLeave,
    #[serde(rename = "휴")]
    Off,
    #[serde(rename = "공")]
    PublicHoliday,
    #[serde(rename = "교육")]
    Training,
    #[serde(rename = "출장")]
    BusinessTrip,
    #[serde(rename = "회의")]
    Meeting,
}

impl WorkCode {
    pub const ALL: [WorkCode; 12] = [
        WorkCode::S,
        WorkCode::A,
        WorkCode::D,
        WorkCode::E,
        WorkCode::N,
        WorkCode::O,
        WorkCode::AnnualLeave,
        WorkCode::Off,
        WorkCode::PublicHoliday,
        WorkCode::Training,
        WorkCode::BusinessTrip,
        WorkCode::Meeting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkCode::S => "S",
            WorkCode::A => "A",
            WorkCode::D => "D",
            WorkCode::E => "E",
            WorkCode::N => "N",
            WorkCode::O => "O",
            WorkCode::AnnualLeave => "연",
            WorkCode::Off => "휴",
            WorkCode::PublicHoliday => "공",
            WorkCode::Training => "교육",
            WorkCode::BusinessTrip => "출장",
            WorkCode::Meeting => "회의",
        }
    }

    /// `휴`, `연` et `공` ne comptent pas comme jours travaillés.
    pub fn is_working(self) -> bool {
        !matches!(
            self,
            WorkCode::Off | WorkCode::AnnualLeave | WorkCode::PublicHoliday
        )
    }

    /// Horaires fixes du code ; un code absent de la table retombe sur 09:00–18:00 (9h).
    pub fn shift_times(self) -> ShiftTimes {
        SHIFT_TABLE
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, times)| *times)
            .unwrap_or(DEFAULT_SHIFT)
    }
}

impl fmt::Display for WorkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WorkCode::ALL
            .iter()
            .copied()
            .find(|code| code.label() == s)
            .ok_or_else(|| format!("unknown work code: {s}"))
    }
}

/// Heures payées et bornes horaires d'un code (heures locales, `end < start` = nuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftTimes {
    pub hours: u8,
    start: (u32, u32),
    end: (u32, u32),
}

impl ShiftTimes {
    pub fn start_time(&self) -> NaiveTime {
        hm(self.start)
    }
    pub fn end_time(&self) -> NaiveTime {
        hm(self.end)
    }
}

fn hm((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

const fn times(hours: u8, start: (u32, u32), end: (u32, u32)) -> ShiftTimes {
    ShiftTimes { hours, start, end }
}

const DEFAULT_SHIFT: ShiftTimes = times(9, (9, 0), (18, 0));

static SHIFT_TABLE: [(WorkCode, ShiftTimes); 9] = [
    (WorkCode::S, times(8, (7, 0), (16, 0))),
    (WorkCode::A, times(8, (9, 0), (18, 0))),
    (WorkCode::D, times(8, (8, 0), (17, 0))),
    (WorkCode::E, times(8, (14, 0), (23, 0))),
    (WorkCode::N, times(10, (22, 0), (8, 0))),
    (WorkCode::O, times(4, (9, 0), (13, 0))),
    (WorkCode::AnnualLeave, times(0, (0, 0), (0, 0))),
    (WorkCode::Off, times(0, (0, 0), (0, 0))),
    (WorkCode::PublicHoliday, times(0, (0, 0), (0, 0))),
];

/// Préférences individuelles ; l'absence d'enregistrement vaut « aucune contrainte ».
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPreference {
    pub staff_id: StaffId,
    #[serde(default)]
    pub preferred_shifts: BTreeSet<WorkCode>,
    #[serde(default)]
    pub unavailable_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_work_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_work_days: Option<u32>,
}

impl StaffPreference {
    pub fn new(staff_id: StaffId) -> Self {
        Self {
            staff_id,
            ..Self::default()
        }
    }

    pub fn is_unavailable(&self, date: NaiveDate) -> bool {
        self.unavailable_dates.contains(&date)
    }
}

/// Indexe une liste de préférences par membre ; la dernière entrée l'emporte.
pub fn index_preferences(prefs: Vec<StaffPreference>) -> HashMap<StaffId, StaffPreference> {
    prefs
        .into_iter()
        .map(|p| (p.staff_id.clone(), p))
        .collect()
}

/// Une affectation (membre, jour). Au plus une par couple `(staff_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSchedule {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub work_type: WorkCode,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// minutes
    pub break_time: u32,
    /// minutes
    pub overtime: u32,
    pub building: String,
    pub floor: String,
}

impl GeneratedSchedule {
    /// Pause standard accordée à un poste travaillé.
    pub const WORKING_BREAK_MINUTES: u32 = 60;

    pub fn new(
        staff_id: StaffId,
        date: NaiveDate,
        work_type: WorkCode,
        building: &str,
        floor: &str,
    ) -> Self {
        let times = work_type.shift_times();
        let break_time = if work_type.is_working() {
            Self::WORKING_BREAK_MINUTES
        } else {
            0
        };
        Self {
            staff_id,
            date,
            work_type,
            start_time: times.start_time(),
            end_time: times.end_time(),
            break_time,
            overtime: 0,
            building: building.to_owned(),
            floor: floor.to_owned(),
        }
    }

    pub fn hours(&self) -> u32 {
        u32::from(self.work_type.shift_times().hours)
    }
}
