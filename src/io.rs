use crate::model::{GeneratedSchedule, Staff, StaffId, StaffPreference, StaffStatus, WorkCode};
use crate::scheduler::{GenerationResult, RuleViolation};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du roster depuis CSV: header `id,name,position[,status]`.
/// L'ordre des lignes est conservé ; un `id` vide reçoit un identifiant aléatoire.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let position = rec.get(2).map(str::trim).unwrap_or("");
        let mut staff = Staff::new(id, name, position);
        if id.is_empty() {
            staff.id = StaffId::random();
        }
        if let Some(status) = rec.get(3) {
            let status = status.trim();
            if !status.is_empty() {
                staff.status = parse_status(status)
                    .with_context(|| format!("invalid status for staff {name}"))?;
            }
        }
        out.push(staff);
    }
    Ok(out)
}

fn parse_status(s: &str) -> anyhow::Result<StaffStatus> {
    match s.to_ascii_lowercase().as_str() {
        "active" | "1" | "yes" => Ok(StaffStatus::Active),
        "on_leave" | "leave" => Ok(StaffStatus::OnLeave),
        "inactive" | "0" | "no" | "resigned" => Ok(StaffStatus::Inactive),
        _ => bail!("expected active/on_leave/inactive"),
    }
}

/// Import d'un planning existant: colonnes `staff_id,date,work_type` requises,
/// `break_time,overtime,building,floor` optionnelles (ordre libre, repérées par le header).
pub fn import_schedules_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<GeneratedSchedule>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let staff_col = column("staff_id").context("missing staff_id column")?;
    let date_col = column("date").context("missing date column")?;
    let code_col = column("work_type").context("missing work_type column")?;
    let break_col = column("break_time");
    let overtime_col = column("overtime");
    let building_col = column("building");
    let floor_col = column("floor");

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let field = |idx: Option<usize>| idx.and_then(|i| rec.get(i)).map(str::trim).unwrap_or("");
        let staff_id = field(Some(staff_col));
        let date = field(Some(date_col));
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {date}"))?;
        let code: WorkCode = field(Some(code_col)).parse().map_err(anyhow::Error::msg)?;

        let mut schedule = GeneratedSchedule::new(
            StaffId::new(staff_id),
            date,
            code,
            field(building_col),
            field(floor_col),
        );
        let break_time = field(break_col);
        if !break_time.is_empty() {
            schedule.break_time = break_time
                .parse()
                .with_context(|| format!("invalid break_time for {staff_id} on {date}"))?;
        }
        let overtime = field(overtime_col);
        if !overtime.is_empty() {
            schedule.overtime = overtime
                .parse()
                .with_context(|| format!("invalid overtime for {staff_id} on {date}"))?;
        }
        out.push(schedule);
    }
    Ok(out)
}

/// Import des préférences: tableau JSON de `StaffPreference` (camelCase).
pub fn import_preferences_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffPreference>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let prefs: Vec<StaffPreference> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing preferences {}", path.display()))?;
    Ok(prefs)
}

/// Export JSON du résultat complet (jolie mise en forme)
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &GenerationResult) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(result)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des affectations:
/// header `staff_id,date,work_type,start_time,end_time,break_time,overtime,building,floor`
pub fn export_schedules_csv<P: AsRef<Path>>(
    path: P,
    schedules: &[GeneratedSchedule],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "staff_id",
        "date",
        "work_type",
        "start_time",
        "end_time",
        "break_time",
        "overtime",
        "building",
        "floor",
    ])?;
    for s in schedules {
        let date = s.date.format("%Y-%m-%d").to_string();
        let start = s.start_time.format("%H:%M").to_string();
        let end = s.end_time.format("%H:%M").to_string();
        let break_time = s.break_time.to_string();
        let overtime = s.overtime.to_string();
        w.write_record([
            s.staff_id.as_str(),
            date.as_str(),
            s.work_type.label(),
            start.as_str(),
            end.as_str(),
            break_time.as_str(),
            overtime.as_str(),
            s.building.as_str(),
            s.floor.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des violations: header `type,staff_id,date,rule,message`
pub fn export_violations_csv<P: AsRef<Path>>(
    path: P,
    violations: &[RuleViolation],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["type", "staff_id", "date", "rule", "message"])?;
    for v in violations {
        let date = v.date.format("%Y-%m-%d").to_string();
        w.write_record([
            v.severity.as_str(),
            v.staff_id.as_str(),
            date.as_str(),
            v.rule.as_str(),
            v.message.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staff_csv_keeps_order_and_status() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("staff.csv");
        fs::write(
            &path,
            "id,name,position,status\nn2,Kim,nurse,active\nn1,Lee,caregiver,on_leave\n,Park,aide,\n",
        )
        .unwrap();
        let staff = import_staff_csv(&path).unwrap();
        assert_eq!(staff.len(), 3);
        assert_eq!(staff[0].id.as_str(), "n2");
        assert_eq!(staff[1].status, StaffStatus::OnLeave);
        assert!(!staff[2].id.as_str().is_empty());
        assert!(staff[2].is_active());
    }

    #[test]
    fn schedules_csv_roundtrip_keeps_codes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedules.csv");
        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let schedules = vec![
            GeneratedSchedule::new(StaffId::new("n1"), date, WorkCode::Off, "B", "2F"),
            GeneratedSchedule::new(StaffId::new("n2"), date, WorkCode::N, "B", "2F"),
        ];
        export_schedules_csv(&path, &schedules).unwrap();
        let back = import_schedules_csv(&path).unwrap();
        assert_eq!(back, schedules);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "staff_id,date,work_type\nn1,2025-01-03,Z\n").unwrap();
        assert!(import_schedules_csv(&path).is_err());
    }
}
