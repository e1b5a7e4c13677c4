use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::record::{MortalityRecord, observed_year_span};
use crate::error::{DashboardError, DashboardResult};

/// Gender categories tracked by the source data, in fixed stack order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Trans,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Trans];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Trans => "Trans/NB/2S",
        }
    }

    /// Per-category count carried by a record.
    #[must_use]
    pub fn count_in(self, record: &MortalityRecord) -> u32 {
        match self {
            Self::Male => record.male,
            Self::Female => record.female,
            Self::Trans => record.trans,
        }
    }
}

/// Inclusive year bounds. Construction orders the bounds, so
/// `min() <= max()` holds for every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    #[must_use]
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[must_use]
    pub fn min(self) -> i32 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> i32 {
        self.max
    }

    #[must_use]
    pub fn contains(self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }

    /// Returns a copy with both bounds clamped into `domain`.
    #[must_use]
    pub fn clamped_to(self, domain: Self) -> Self {
        Self::new(
            self.min.clamp(domain.min, domain.max),
            self.max.clamp(domain.min, domain.max),
        )
    }
}

/// Per-category enablement toggles; all enabled initially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderSelection {
    pub male: bool,
    pub female: bool,
    pub trans: bool,
}

impl Default for GenderSelection {
    fn default() -> Self {
        Self {
            male: true,
            female: true,
            trans: true,
        }
    }
}

impl GenderSelection {
    #[must_use]
    pub fn is_enabled(self, gender: Gender) -> bool {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Trans => self.trans,
        }
    }

    pub fn set_enabled(&mut self, gender: Gender, enabled: bool) {
        match gender {
            Gender::Male => self.male = enabled,
            Gender::Female => self.female = enabled,
            Gender::Trans => self.trans = enabled,
        }
    }

    /// Enabled categories in fixed stack order.
    #[must_use]
    pub fn enabled(self) -> SmallVec<[Gender; 3]> {
        Gender::ALL
            .iter()
            .copied()
            .filter(|gender| self.is_enabled(*gender))
            .collect()
    }

    /// Sum of the enabled per-category counts of a record.
    #[must_use]
    pub fn filtered_value(self, record: &MortalityRecord) -> u32 {
        self.enabled()
            .iter()
            .map(|gender| gender.count_in(record))
            .sum()
    }
}

/// Immutable per-render filter snapshot handed to every view during fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub year_range: YearRange,
    pub genders: GenderSelection,
}

impl FilterSnapshot {
    #[must_use]
    pub fn matches(self, record: &MortalityRecord) -> bool {
        self.year_range.contains(record.year)
    }
}

/// Shared year-range + gender selection, the single source of truth read by
/// every chart. Owned by the engine; views only ever see [`FilterSnapshot`]
/// values taken at fan-out time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    domain: YearRange,
    year_range: YearRange,
    genders: GenderSelection,
}

impl FilterState {
    /// Builds the default state from the observed year span of the records.
    pub fn from_records(records: &[MortalityRecord]) -> DashboardResult<Self> {
        let (min, max) = observed_year_span(records).ok_or_else(|| {
            DashboardError::InvalidData("cannot build filter state from an empty record set".to_owned())
        })?;
        let domain = YearRange::new(min, max);
        Ok(Self {
            domain,
            year_range: domain,
            genders: GenderSelection::default(),
        })
    }

    #[must_use]
    pub fn domain(self) -> YearRange {
        self.domain
    }

    #[must_use]
    pub fn year_range(self) -> YearRange {
        self.year_range
    }

    #[must_use]
    pub fn genders(self) -> GenderSelection {
        self.genders
    }

    /// Sets the year range, ordering swapped bounds and clamping both into
    /// the observed domain.
    pub fn set_year_range(&mut self, a: i32, b: i32) {
        self.year_range = YearRange::new(a, b).clamped_to(self.domain);
    }

    pub fn set_gender_enabled(&mut self, gender: Gender, enabled: bool) {
        self.genders.set_enabled(gender, enabled);
    }

    /// Restores the full observed span and enables every category.
    pub fn reset(&mut self) {
        self.year_range = self.domain;
        self.genders = GenderSelection::default();
    }

    #[must_use]
    pub fn snapshot(self) -> FilterSnapshot {
        FilterSnapshot {
            year_range: self.year_range,
            genders: self.genders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterState, Gender, GenderSelection, YearRange};
    use crate::core::month::Month;
    use crate::core::record::MortalityRecord;

    fn record(year: i32) -> MortalityRecord {
        MortalityRecord {
            year,
            month: Month::January,
            total: 10,
            male: 6,
            female: 3,
            trans: 1,
        }
    }

    #[test]
    fn year_range_orders_swapped_bounds() {
        let range = YearRange::new(2020, 2007);
        assert_eq!(range.min(), 2007);
        assert_eq!(range.max(), 2020);
    }

    #[test]
    fn set_year_range_clamps_to_observed_domain() {
        let records = [record(2007), record(2024)];
        let mut state = FilterState::from_records(&records).expect("non-empty records");

        state.set_year_range(1990, 2050);
        assert_eq!(state.year_range(), YearRange::new(2007, 2024));

        state.set_year_range(2024, 2010);
        assert_eq!(state.year_range(), YearRange::new(2010, 2024));
    }

    #[test]
    fn reset_restores_full_span_and_all_genders() {
        let records = [record(2007), record(2024)];
        let mut state = FilterState::from_records(&records).expect("non-empty records");
        state.set_year_range(2010, 2012);
        state.set_gender_enabled(Gender::Male, false);

        state.reset();
        assert_eq!(state.year_range(), state.domain());
        assert_eq!(state.genders(), GenderSelection::default());
    }

    #[test]
    fn filtered_value_sums_only_enabled_categories() {
        let mut selection = GenderSelection::default();
        selection.set_enabled(Gender::Male, false);
        assert_eq!(selection.filtered_value(&record(2019)), 4);

        selection.set_enabled(Gender::Female, false);
        selection.set_enabled(Gender::Trans, false);
        assert_eq!(selection.filtered_value(&record(2019)), 0);
    }

    #[test]
    fn empty_record_set_is_rejected() {
        assert!(FilterState::from_records(&[]).is_err());
    }
}
