pub mod filter;
pub mod month;
pub mod record;
pub mod scale;
pub mod types;

pub use filter::{FilterSnapshot, FilterState, Gender, GenderSelection, YearRange};
pub use month::Month;
pub use record::{MortalityRecord, observed_year_span, observed_years};
pub use scale::{BandScale, CalendarScale, LinearScale, nice_domain};
pub use types::{Margin, Viewport};
