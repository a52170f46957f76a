use std::fmt::{Display, Formatter, Result as FmtResult};

/// Northern-hemisphere meteorological season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Season for a calendar month (1 = January). Months outside 1-12 map to winter.
    ///
    /// The table is the zero-based 2-4 / 5-7 / 8-10 month mapping shifted to 1-based months.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Season::Spring => f.write_str("spring"),
            Season::Summer => f.write_str("summer"),
            Season::Fall => f.write_str("fall"),
            Season::Winter => f.write_str("winter"),
        }
    }
}
