/// Year and month validation for budget requests
///
/// Annual budgets may only be provisioned for years inside a window around
/// the current year. With the default window a user in 2017 can open budgets
/// for 2015 through 2020.
///
/// Both failure kinds collapse to the same "not found" response at the HTTP
/// boundary, but they stay distinct here so they can be logged separately.
///
/// # Example
///
/// ```
/// use budgetal_shared::budget::year::{validate_year, YearError, YearWindow};
///
/// let window = YearWindow::default();
/// assert_eq!(validate_year("2018", 2017, window), Ok(2018));
/// assert!(matches!(validate_year("2014", 2017, window), Err(YearError::OutOfRange { .. })));
/// assert!(matches!(validate_year("abcd", 2017, window), Err(YearError::Malformed(_))));
/// ```

use serde::{Deserialize, Serialize};

/// Error returned when a year or month path segment is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum YearError {
    /// Input could not be parsed as an integer
    #[error("Malformed value: {0:?}")]
    Malformed(String),

    /// Input parsed but falls outside the accepted range
    #[error("Value {value} outside accepted range {min}..={max}")]
    OutOfRange { value: i32, min: i32, max: i32 },
}

impl YearError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            YearError::Malformed(_) => "malformed",
            YearError::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Window of years accepted relative to the current year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    /// How many years before the current one are accepted
    pub years_back: i32,

    /// How many years after the current one are accepted
    pub years_ahead: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            years_back: 2,
            years_ahead: 3,
        }
    }
}

impl YearWindow {
    /// Inclusive `(min, max)` bounds for the given current year
    pub fn bounds(&self, current_year: i32) -> (i32, i32) {
        (
            current_year - self.years_back,
            current_year + self.years_ahead,
        )
    }
}

/// Parses a year without applying any window
pub fn parse_year(raw: &str) -> Result<i32, YearError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| YearError::Malformed(raw.to_string()))
}

/// Parses a year and checks it against the provisioning window
pub fn validate_year(raw: &str, current_year: i32, window: YearWindow) -> Result<i32, YearError> {
    let year = parse_year(raw)?;
    let (min, max) = window.bounds(current_year);

    if year < min || year > max {
        return Err(YearError::OutOfRange {
            value: year,
            min,
            max,
        });
    }

    Ok(year)
}

/// Parses a calendar month (1-12)
pub fn validate_month(raw: &str) -> Result<u32, YearError> {
    let month = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| YearError::Malformed(raw.to_string()))?;

    if !(1..=12).contains(&month) {
        return Err(YearError::OutOfRange {
            value: month,
            min: 1,
            max: 12,
        });
    }

    Ok(month as u32)
}
