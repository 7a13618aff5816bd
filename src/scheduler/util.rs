use crate::model::WorkCode;
use chrono::{Datelike, NaiveDate, Weekday};

/// Fenêtre de rétrospective (en entrées) pour l'équilibrage des nuits.
pub(super) const LOOKBACK_DAYS: usize = 7;

pub(super) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Jours de `start` à `end` inclus.
pub(super) fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Les `n` dernières entrées, dans l'ordre chronologique.
pub(super) fn tail(history: &[WorkCode], n: usize) -> &[WorkCode] {
    &history[history.len().saturating_sub(n)..]
}

/// Jours travaillés consécutifs en remontant depuis l'entrée la plus récente.
pub(super) fn trailing_work_days(window: &[WorkCode]) -> u32 {
    window.iter().rev().take_while(|code| code.is_working()).count() as u32
}

pub(super) fn night_count(window: &[WorkCode]) -> usize {
    window.iter().filter(|code| **code == WorkCode::N).count()
}
