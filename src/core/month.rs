use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar month in fixed chart order (January first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Parses a full month name or a 3-letter abbreviation, case-insensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.len() < 3 {
            return None;
        }
        let lowered = trimmed.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|month| {
            let full = month.name().to_ascii_lowercase();
            lowered == full || lowered == full[..3]
        })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Zero-based position in calendar order (January = 0).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based calendar number (January = 1).
    #[must_use]
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Month;

    #[test]
    fn parses_full_and_abbreviated_names() {
        assert_eq!(Month::from_name("January"), Some(Month::January));
        assert_eq!(Month::from_name("jan"), Some(Month::January));
        assert_eq!(Month::from_name("SEP"), Some(Month::September));
        assert_eq!(Month::from_name(" December "), Some(Month::December));
        assert_eq!(Month::from_name("Janvier"), None);
        assert_eq!(Month::from_name(""), None);
    }

    #[test]
    fn calendar_order_is_fixed() {
        assert_eq!(Month::January.index(), 0);
        assert_eq!(Month::December.index(), 11);
        assert_eq!(Month::March.number(), 3);
        assert!(Month::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
