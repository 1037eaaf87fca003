use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Day offset applied to the dates of a record
///
/// A configured value that is not a whole number of days is kept as
/// [`TimeShift::Invalid`] so that the date step can fail closed on it
/// instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum TimeShift {
    /// Signed number of days
    Days(i64),

    /// Raw configured value that could not be read as days
    Invalid(String),
}

impl TimeShift {
    /// Returns the number of days, if this is a valid shift
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeShift::Days(days) => Some(*days),
            TimeShift::Invalid(_) => None,
        }
    }

    /// Checks whether this shift moves dates (anything but `Days(0)`)
    ///
    /// An invalid shift counts as configured: it is not "no shift", even
    /// though it cannot move any date.
    pub fn is_configured(&self) -> bool {
        !matches!(self, TimeShift::Days(0))
    }
}

/// Checks whether an optional shift is absent or zero
pub fn is_unshifted(time_shift: Option<&TimeShift>) -> bool {
    time_shift.map_or(true, |shift| !shift.is_configured())
}

impl From<i64> for TimeShift {
    fn from(days: i64) -> Self {
        TimeShift::Days(days)
    }
}

impl FromStr for TimeShift {
    type Err = Infallible;

    /// Parses a day count, keeping anything else as [`TimeShift::Invalid`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map(TimeShift::Days)
            .unwrap_or_else(|_| TimeShift::Invalid(s.to_string())))
    }
}

/// Reads whole numbers as days and keeps any other JSON value as
/// [`TimeShift::Invalid`]
#[cfg(feature = "json")]
impl<'de> serde::Deserialize<'de> for TimeShift {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde_json::Value;

        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(ref n) => n
                .as_i64()
                .map(TimeShift::Days)
                .unwrap_or_else(|| TimeShift::Invalid(value.to_string())),
            Value::String(raw) => TimeShift::Invalid(raw),
            other => TimeShift::Invalid(other.to_string()),
        })
    }
}

impl fmt::Display for TimeShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeShift::Days(days) => write!(f, "{} days", days),
            TimeShift::Invalid(raw) => write!(f, "invalid ({:?})", raw),
        }
    }
}
