//! [`RecurrenceRule`] — immutable description of a repeating pattern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::end_criteria::EndCriteria;
use crate::error::{RecurrenceError, Result};
use crate::frequency::Frequency;
use crate::occurrences::Occurrences;
use crate::weekday::Weekday;

/// An immutable recurrence rule.
///
/// The default rule has unspecified frequency and denotes "no
/// recurrence". All `by_*` fields are restriction filters: when
/// non-empty, only instants whose corresponding calendar field is in
/// the set are valid occurrences; when empty, the field is
/// unconstrained. Element order in the filter vectors is insignificant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Base repeat unit; `Unspecified` means single-shot.
    pub frequency: Frequency,
    /// Repeat every N units of `frequency`; 0 and 1 both mean "every unit".
    pub interval: u32,
    /// Termination condition; `None` means the rule never terminates.
    pub end_criteria: Option<EndCriteria>,
    /// Valid minutes of the hour (0-59).
    pub by_minute: Vec<u8>,
    /// Valid hours of the day (0-23).
    pub by_hour: Vec<u8>,
    /// Valid days of the week.
    pub by_weekday: Vec<Weekday>,
    /// Valid days of the month (1-31).
    pub by_monthday: Vec<u8>,
    /// Valid months of the year (1-12).
    pub by_month: Vec<u8>,
}

impl RecurrenceRule {
    /// True if the rule describes a real repeating pattern.
    pub fn is_recurring(&self) -> bool {
        !self.frequency.is_unspecified()
    }

    /// True if the weekday filter contains the UNSPECIFIED sentinel,
    /// which makes the rule unsatisfiable.
    pub fn has_unspecified_weekday(&self) -> bool {
        self.by_weekday.contains(&Weekday::Unspecified)
    }

    /// Check all field filters against their calendar ranges.
    ///
    /// An UNSPECIFIED weekday in the filter is not an error here; it is
    /// the documented "no occurrences" degenerate case. Callers that
    /// want to reject it at construction use
    /// [`has_unspecified_weekday`](Self::has_unspecified_weekday).
    pub fn validate(&self) -> Result<()> {
        check_range("by_minute", &self.by_minute, 0, 59)?;
        check_range("by_hour", &self.by_hour, 0, 23)?;
        check_range("by_monthday", &self.by_monthday, 1, 31)?;
        check_range("by_month", &self.by_month, 1, 12)?;
        Ok(())
    }

    /// Lazy enumeration of the occurrences implied by this rule,
    /// anchored at `start_time`.
    ///
    /// The sequence is strictly increasing and begins at or after
    /// `start_time`. It is empty when the frequency is unspecified or
    /// the weekday filter contains the UNSPECIFIED sentinel.
    pub fn occurrences_from(&self, start_time: DateTime<Utc>) -> Occurrences<'_> {
        Occurrences::new(self, start_time)
    }

    /// Earliest occurrence at or after `reference`, or `None` if the
    /// sequence terminates (or is empty) before reaching it.
    pub fn first_at_or_after(
        &self,
        start_time: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.occurrences_from(start_time).find(|&t| t >= reference)
    }

    /// Latest occurrence at or before `reference`, or `None` if the
    /// first occurrence is already after it.
    pub fn last_at_or_before(
        &self,
        start_time: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let mut last = None;
        for t in self.occurrences_from(start_time) {
            if t > reference {
                break;
            }
            last = Some(t);
        }
        last
    }
}

fn check_range(field: &'static str, values: &[u8], min: u8, max: u8) -> Result<()> {
    for &value in values {
        if value < min || value > max {
            return Err(RecurrenceError::FieldOutOfRange {
                field,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}
