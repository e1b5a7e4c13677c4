use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Continuous value-to-pixel mapping over an explicit pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> DashboardResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(DashboardError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> DashboardResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() || range_start == range_end {
            return Err(DashboardError::InvalidData(
                "scale range must be finite and non-zero".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value into the pixel range (no clamping).
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a pixel back into the domain (no clamping).
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Evenly spaced tick values with both domain endpoints included.
    ///
    /// Unlike nice-step tick selection, the domain maximum is always one of
    /// the returned values, which the gradient legend relies on.
    #[must_use]
    pub fn even_ticks(self, tick_count: usize) -> Vec<f64> {
        match tick_count {
            0 => Vec::new(),
            1 => vec![self.domain_start],
            _ => {
                let span = self.domain_end - self.domain_start;
                let denominator = (tick_count - 1) as f64;
                (0..tick_count)
                    .map(|index| self.domain_start + span * (index as f64) / denominator)
                    .collect()
            }
        }
    }

    /// Ticks at nice-step positions covering the current domain.
    #[must_use]
    pub fn nice_ticks(self, tick_count: usize) -> Vec<f64> {
        if tick_count == 0 {
            return Vec::new();
        }
        let step = tick_step(self.domain_start, self.domain_end, tick_count);
        if step <= 0.0 {
            return vec![self.domain_start];
        }
        let first = (self.domain_start / step).ceil();
        let last = (self.domain_end / step).floor();
        let mut ticks = Vec::new();
        let mut index = first;
        while index <= last {
            ticks.push(index * step);
            index += 1.0;
        }
        ticks
    }
}

/// Expands `(min, max)` outward to nice-step multiples, mirroring a
/// `domain().nice()` pass on a continuous axis.
#[must_use]
pub fn nice_domain(min: f64, max: f64, tick_count: usize) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() || min == max {
        return (min, max);
    }
    let step = tick_step(min, max, tick_count.max(1));
    if step <= 0.0 {
        return (min, max);
    }
    ((min / step).floor() * step, (max / step).ceil() * step)
}

fn tick_step(start: f64, end: f64, tick_count: usize) -> f64 {
    let span = (end - start).abs();
    if span == 0.0 || tick_count == 0 {
        return 0.0;
    }
    let raw_step = span / tick_count as f64;
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let residual = raw_step / magnitude;
    let factor = if residual >= 50_f64.sqrt() {
        10.0
    } else if residual >= 10_f64.sqrt() {
        5.0
    } else if residual >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    magnitude * factor
}

/// Categorical band layout over an ascending pixel range.
///
/// Index order follows the caller's domain order; callers that want a
/// bottom-up vertical axis reverse their indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    count: usize,
    range_start: f64,
    range_end: f64,
    padding_ratio: f64,
}

impl BandScale {
    pub fn new(
        count: usize,
        range_start: f64,
        range_end: f64,
        padding_ratio: f64,
    ) -> DashboardResult<Self> {
        if count == 0 {
            return Err(DashboardError::InvalidData(
                "band scale requires at least one band".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() || range_start >= range_end {
            return Err(DashboardError::InvalidData(
                "band scale range must be finite and ascending".to_owned(),
            ));
        }
        if !padding_ratio.is_finite() || !(0.0..1.0).contains(&padding_ratio) {
            return Err(DashboardError::InvalidData(
                "band scale padding must be in [0, 1)".to_owned(),
            ));
        }
        Ok(Self {
            count,
            range_start,
            range_end,
            padding_ratio,
        })
    }

    #[must_use]
    pub fn step(self) -> f64 {
        (self.range_end - self.range_start) / self.count as f64
    }

    /// Leading pixel edge of the band at `index`.
    #[must_use]
    pub fn position(self, index: usize) -> f64 {
        self.range_start + self.step() * (index as f64) + self.step() * self.padding_ratio / 2.0
    }

    #[must_use]
    pub fn bandwidth(self) -> f64 {
        self.step() * (1.0 - self.padding_ratio)
    }

    /// Index of the band containing `pixel`, if any.
    #[must_use]
    pub fn index_at(self, pixel: f64) -> Option<usize> {
        if !pixel.is_finite() || pixel < self.range_start || pixel > self.range_end {
            return None;
        }
        let index = ((pixel - self.range_start) / self.step()).floor() as usize;
        (index < self.count).then_some(index)
    }
}

/// Calendar-date axis backed by a linear scale over day numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarScale {
    start: NaiveDate,
    end: NaiveDate,
    linear: LinearScale,
}

impl CalendarScale {
    /// Builds a scale over `[start, end]`; a degenerate single-date extent is
    /// widened by one month so the mapping stays invertible.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DashboardResult<Self> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let end = if start == end {
            end.checked_add_months(Months::new(1)).ok_or_else(|| {
                DashboardError::InvalidData("calendar scale end date overflows".to_owned())
            })?
        } else {
            end
        };
        let linear = LinearScale::new(day_number(start), day_number(end))?;
        Ok(Self { start, end, linear })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> DashboardResult<Self> {
        self.linear = self.linear.with_range(range_start, range_end)?;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    #[must_use]
    pub fn map(self, date: NaiveDate) -> f64 {
        self.linear.map(day_number(date))
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}
