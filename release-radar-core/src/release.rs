use chrono::{Datelike, NaiveDate};

/// Month of the sentinel date stored for a TBA entry.
pub const TBA_MONTH: u32 = 12;
/// Day of the sentinel date stored for a TBA entry.
pub const TBA_DAY: u32 = 31;

/// When a game comes out: an exact date, or only a year with the date still
/// to be announced. The two representations are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseTime {
    Date(NaiveDate),
    Tba { year: i32 },
}

impl ReleaseTime {
    /// Date handed to persistence. TBA entries use December 31 of their year.
    pub fn sentinel_date(&self) -> Option<NaiveDate> {
        match *self {
            Self::Date(d) => Some(d),
            Self::Tba { year } => NaiveDate::from_ymd_opt(year, TBA_MONTH, TBA_DAY),
        }
    }

    pub fn is_tba(&self) -> bool {
        matches!(self, Self::Tba { .. })
    }

    /// Rebuild from the stored (date, tba) pair the backend returns.
    pub fn from_stored(date: NaiveDate, tba: bool) -> Self {
        if tba {
            Self::Tba { year: date.year() }
        } else {
            Self::Date(date)
        }
    }
}

impl std::fmt::Display for ReleaseTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Tba { year } => write!(f, "TBA {}", year),
        }
    }
}
