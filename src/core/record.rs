use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::month::Month;

/// One canonical month-year mortality observation.
///
/// Constructed once at load time and immutable thereafter; views read a
/// shared slice and never copy-mutate. `male + female + trans` is not
/// guaranteed to equal `total` (the source data does not balance), so
/// consumers must not assume additivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortalityRecord {
    pub year: i32,
    pub month: Month,
    pub total: u32,
    pub male: u32,
    pub female: u32,
    pub trans: u32,
}

impl MortalityRecord {
    /// First calendar day of the observation month.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        // Month numbers are always 1..=12, so this cannot fail.
        NaiveDate::from_ymd_opt(self.year, self.month.number(), 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Inclusive (min, max) span of years observed in `records`, or `None` when empty.
#[must_use]
pub fn observed_year_span(records: &[MortalityRecord]) -> Option<(i32, i32)> {
    let first = records.first()?.year;
    Some(records.iter().fold((first, first), |(min, max), record| {
        (min.min(record.year), max.max(record.year))
    }))
}

/// Distinct years observed in `records`, ascending.
#[must_use]
pub fn observed_years(records: &[MortalityRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|record| record.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}
