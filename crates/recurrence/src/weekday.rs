//! Weekday enum for recurrence weekday filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A day of the week as used in weekday filters.
///
/// `Unspecified` never denotes a real calendar day. Its presence in a
/// filter makes the filter unsatisfiable (no instant ever matches it),
/// so a rule carrying it enumerates as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Unspecified,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Convert from a chrono weekday (always a real day).
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }

    /// Convert to a chrono weekday; `None` for the sentinel.
    pub fn to_chrono(self) -> Option<chrono::Weekday> {
        match self {
            Weekday::Unspecified => None,
            Weekday::Monday => Some(chrono::Weekday::Mon),
            Weekday::Tuesday => Some(chrono::Weekday::Tue),
            Weekday::Wednesday => Some(chrono::Weekday::Wed),
            Weekday::Thursday => Some(chrono::Weekday::Thu),
            Weekday::Friday => Some(chrono::Weekday::Fri),
            Weekday::Saturday => Some(chrono::Weekday::Sat),
            Weekday::Sunday => Some(chrono::Weekday::Sun),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Unspecified => write!(f, "UNSPECIFIED"),
            Weekday::Monday => write!(f, "MONDAY"),
            Weekday::Tuesday => write!(f, "TUESDAY"),
            Weekday::Wednesday => write!(f, "WEDNESDAY"),
            Weekday::Thursday => write!(f, "THURSDAY"),
            Weekday::Friday => write!(f, "FRIDAY"),
            Weekday::Saturday => write!(f, "SATURDAY"),
            Weekday::Sunday => write!(f, "SUNDAY"),
        }
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UNSPECIFIED" => Ok(Weekday::Unspecified),
            "MONDAY" => Ok(Weekday::Monday),
            "TUESDAY" => Ok(Weekday::Tuesday),
            "WEDNESDAY" => Ok(Weekday::Wednesday),
            "THURSDAY" => Ok(Weekday::Thursday),
            "FRIDAY" => Ok(Weekday::Friday),
            "SATURDAY" => Ok(Weekday::Saturday),
            "SUNDAY" => Ok(Weekday::Sunday),
            other => Err(format!("unknown weekday: '{}'", other)),
        }
    }
}
