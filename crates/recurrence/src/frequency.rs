//! Recurrence frequency enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The base unit a recurrence repeats in.
///
/// `Unspecified` is a real sentinel variant, not an absent value: a rule
/// with unspecified frequency denotes "no recurrence" (single-shot
/// schedule), which is distinct from a rule with invalid filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    Unspecified,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// True if this frequency denotes "no recurrence".
    pub fn is_unspecified(self) -> bool {
        self == Frequency::Unspecified
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Unspecified => write!(f, "UNSPECIFIED"),
            Frequency::Hourly => write!(f, "HOURLY"),
            Frequency::Daily => write!(f, "DAILY"),
            Frequency::Weekly => write!(f, "WEEKLY"),
            Frequency::Monthly => write!(f, "MONTHLY"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UNSPECIFIED" => Ok(Frequency::Unspecified),
            "HOURLY" => Ok(Frequency::Hourly),
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            other => Err(format!("unknown frequency: '{}'", other)),
        }
    }
}
