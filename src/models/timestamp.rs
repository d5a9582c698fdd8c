//! Timestamp format used on the wire
//!
//! The outage API exchanges ISO-8601 date-times with a numeric UTC offset and
//! a fractional-second part of exactly three digits. The remote rejects values
//! with any other precision, so formatting always pads to milliseconds and a
//! zero offset is written as `Z`.

use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike};

use crate::error::SyncError;

/// Format a timestamp with exactly three fractional-second digits
pub fn format(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp in the wire format
///
/// Letters are matched case-insensitively. A fractional-second part is
/// optional, but when present it must have exactly three digits. Field values
/// are resolved strictly: `25:00` or `2022-02-30` are rejected rather than
/// rolled over.
pub fn parse(input: &str) -> Result<DateTime<FixedOffset>, SyncError> {
    let normalized = input.trim().to_ascii_uppercase();

    if normalized.as_bytes().get(10) != Some(&b'T') {
        return Err(SyncError::InvalidArgument(format!(
            "Timestamp '{}' must separate date and time with 'T'",
            input
        )));
    }

    if let Some(digits) = fraction_digits(&normalized) {
        if digits != 3 {
            return Err(SyncError::InvalidArgument(format!(
                "Timestamp '{}' must have exactly 3 fractional-second digits",
                input
            )));
        }
    }

    let value = DateTime::parse_from_rfc3339(&normalized).map_err(|e| {
        SyncError::InvalidArgument(format!("Invalid timestamp '{}': {}", input, e))
    })?;

    // chrono encodes a leap second as a nanosecond value past one second
    if value.nanosecond() >= 1_000_000_000 {
        return Err(SyncError::InvalidArgument(format!(
            "Invalid timestamp '{}': second out of range",
            input
        )));
    }

    Ok(value)
}

/// Number of digits after the seconds' decimal point, if there is one
fn fraction_digits(value: &str) -> Option<usize> {
    let time = value.split_once('T').map(|(_, time)| time)?;
    let (_, after_dot) = time.split_once('.')?;

    Some(after_dot.chars().take_while(char::is_ascii_digit).count())
}

/// Serde adapter for required timestamps
pub mod serde_millis {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize in the wire format
    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(value))
    }

    /// Deserialize from the wire format
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(|e| serde::de::Error::custom(e.message()))
    }

    /// Serde adapter for optional timestamps; `null` and absent both map to `None`
    pub mod option {
        use chrono::{DateTime, FixedOffset};
        use serde::{Deserialize, Deserializer, Serializer};

        /// Serialize in the wire format, `None` as `null`
        pub fn serialize<S>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => serializer.serialize_some(&crate::models::timestamp::format(value)),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize from the wire format
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => crate::models::timestamp::parse(&raw)
                    .map(Some)
                    .map_err(|e| serde::de::Error::custom(e.message())),
                None => Ok(None),
            }
        }
    }
}
