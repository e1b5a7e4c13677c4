use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Month, MortalityRecord};

/// Calendar year from which observations count as pandemic-era.
pub const PANDEMIC_ONSET_YEAR: i32 = 2020;

/// Axis a heatmap drill-down slices along, chosen with a pointer modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrilldownAxis {
    /// The clicked cell's calendar month across every observed year.
    MonthAcrossYears,
    /// The clicked cell's year across all twelve months.
    YearAcrossMonths,
}

/// Pandemic-era change of the drill-down series relative to its pre-2020
/// baseline. `Undefined` covers a zero or absent baseline, which would
/// otherwise surface as NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PandemicShift {
    Undefined,
    Percent(f64),
}

impl PandemicShift {
    /// Display form, e.g. `+42.3%` or `n/a`.
    #[must_use]
    pub fn format(self) -> String {
        match self {
            Self::Undefined => "n/a".to_owned(),
            Self::Percent(percent) => format!("{percent:+.1}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrilldownPoint {
    pub year: i32,
    pub month: Month,
    pub value: u32,
}

/// Series behind one heatmap cell, derived from the cell's own identity
/// (never from the shared filter state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrilldownSeries {
    pub axis: DrilldownAxis,
    pub anchor_year: i32,
    pub anchor_month: Month,
    pub points: Vec<DrilldownPoint>,
    pub pandemic_shift: PandemicShift,
}

/// Derives the drill-down series for one cell.
///
/// Returns `None` (after logging) when no record matches; the caller keeps
/// its previous display in that case.
#[must_use]
pub fn derive_drilldown(
    records: &[MortalityRecord],
    anchor_year: i32,
    anchor_month: Month,
    axis: DrilldownAxis,
) -> Option<DrilldownSeries> {
    let mut points: Vec<DrilldownPoint> = records
        .iter()
        .filter(|record| match axis {
            DrilldownAxis::MonthAcrossYears => record.month == anchor_month,
            DrilldownAxis::YearAcrossMonths => record.year == anchor_year,
        })
        .map(|record| DrilldownPoint {
            year: record.year,
            month: record.month,
            value: record.total,
        })
        .collect();

    if points.is_empty() {
        warn!(
            year = anchor_year,
            month = %anchor_month,
            ?axis,
            "drill-down matched no records; keeping previous display"
        );
        return None;
    }

    points.sort_by_key(|point| (point.year, point.month));

    let pandemic_shift = pandemic_shift(&points);
    Some(DrilldownSeries {
        axis,
        anchor_year,
        anchor_month,
        points,
        pandemic_shift,
    })
}

/// Mean pandemic-era value vs. mean pre-pandemic baseline, as a percentage
/// change. A missing or zero baseline (and a missing pandemic era) yields
/// `Undefined` rather than NaN/infinity.
fn pandemic_shift(points: &[DrilldownPoint]) -> PandemicShift {
    let mean_of = |pandemic_era: bool| -> Option<f64> {
        let values: Vec<f64> = points
            .iter()
            .filter(|point| (point.year >= PANDEMIC_ONSET_YEAR) == pandemic_era)
            .map(|point| f64::from(point.value))
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    };

    match (mean_of(false), mean_of(true)) {
        (Some(baseline), Some(pandemic)) if baseline > 0.0 => {
            PandemicShift::Percent((pandemic - baseline) / baseline * 100.0)
        }
        _ => PandemicShift::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::{DrilldownAxis, PandemicShift, derive_drilldown};
    use crate::core::{Month, MortalityRecord};

    fn record(year: i32, month: Month, total: u32) -> MortalityRecord {
        MortalityRecord {
            year,
            month,
            total,
            male: 0,
            female: 0,
            trans: 0,
        }
    }

    #[test]
    fn month_axis_collects_that_month_across_years() {
        let records = vec![
            record(2019, Month::January, 10),
            record(2019, Month::February, 99),
            record(2020, Month::January, 40),
        ];

        let series = derive_drilldown(&records, 2019, Month::January, DrilldownAxis::MonthAcrossYears)
            .expect("non-empty series");
        assert_eq!(series.points.len(), 2);
        assert!(series.points.iter().all(|point| point.month == Month::January));
        assert_eq!(series.points[0].year, 2019);
    }

    #[test]
    fn year_axis_collects_that_year_across_months() {
        let records = vec![
            record(2019, Month::March, 5),
            record(2019, Month::January, 10),
            record(2020, Month::January, 40),
        ];

        let series = derive_drilldown(&records, 2019, Month::January, DrilldownAxis::YearAcrossMonths)
            .expect("non-empty series");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].month, Month::January);
        assert_eq!(series.points[1].month, Month::March);
    }

    #[test]
    fn empty_match_yields_none() {
        let records = vec![record(2019, Month::January, 10)];
        assert!(
            derive_drilldown(&records, 1990, Month::May, DrilldownAxis::YearAcrossMonths).is_none()
        );
    }

    #[test]
    fn pandemic_shift_reports_percent_change() {
        let records = vec![
            record(2018, Month::January, 10),
            record(2019, Month::January, 10),
            record(2020, Month::January, 15),
            record(2021, Month::January, 25),
        ];

        let series = derive_drilldown(&records, 2018, Month::January, DrilldownAxis::MonthAcrossYears)
            .expect("non-empty series");
        assert_eq!(series.pandemic_shift, PandemicShift::Percent(100.0));
    }

    #[test]
    fn zero_baseline_is_undefined_not_infinite() {
        let records = vec![
            record(2019, Month::January, 0),
            record(2020, Month::January, 25),
        ];

        let series = derive_drilldown(&records, 2019, Month::January, DrilldownAxis::MonthAcrossYears)
            .expect("non-empty series");
        assert_eq!(series.pandemic_shift, PandemicShift::Undefined);
        assert_eq!(series.pandemic_shift.format(), "n/a");
    }
}
