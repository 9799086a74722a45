//! Error types for recurrence rule construction and validation.

/// Errors that can occur when building or validating a recurrence rule.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecurrenceError {
    /// Both a count and an until instant were supplied as end criteria.
    #[error("count and until end criteria are mutually exclusive")]
    ConflictingEndCriteria,

    /// A count end criteria of zero occurrences.
    #[error("end criteria count must be positive")]
    ZeroCount,

    /// A field filter value outside its calendar range.
    #[error("{field} value {value} out of range {min}..={max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    /// The weekday filter contains the UNSPECIFIED sentinel.
    ///
    /// Only reported by strict validation; enumeration itself treats
    /// such a rule as having no occurrences.
    #[error("weekday filter contains the UNSPECIFIED sentinel")]
    UnspecifiedWeekday,
}

/// Result alias for recurrence operations.
pub type Result<T> = std::result::Result<T, RecurrenceError>;
