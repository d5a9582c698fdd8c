//! Outage-related domain models
//!
//! This module defines the outage records fetched from the remote API and the
//! enriched records submitted back to it once a device name is known.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::timestamp;
use crate::error::SyncError;

/// Opaque device identifier
///
/// The API uses UUID strings today, but any JSON scalar is accepted: strings,
/// numbers of any size or precision, and booleans. Ids are compared by exact
/// value: the string `"1"`, the integer `1` and the decimal `1.0` are three
/// different devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    /// Boolean id
    Bool(bool),
    /// Numeric id
    Number(serde_json::Number),
    /// String id
    Text(String),
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceId::Bool(id) => write!(f, "{}", id),
            DeviceId::Number(id) => write!(f, "{}", id),
            DeviceId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        DeviceId::Text(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        DeviceId::Text(id)
    }
}

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        DeviceId::Number(id.into())
    }
}

impl From<bool> for DeviceId {
    fn from(id: bool) -> Self {
        DeviceId::Bool(id)
    }
}

impl From<serde_json::Number> for DeviceId {
    fn from(id: serde_json::Number) -> Self {
        DeviceId::Number(id)
    }
}

/// A period of outage for a single device, as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceOutage {
    /// Device that experienced the outage
    #[serde(rename = "id")]
    pub device_id: DeviceId,

    /// Start of the outage
    #[serde(with = "timestamp::serde_millis")]
    pub begin: DateTime<FixedOffset>,

    /// End of the outage (None = ongoing)
    ///
    /// Not checked against `begin`; values are passed through as received.
    #[serde(default, with = "timestamp::serde_millis::option")]
    pub end: Option<DateTime<FixedOffset>>,
}

impl DeviceOutage {
    /// Create a new outage record
    pub fn new(
        device_id: impl Into<DeviceId>,
        begin: DateTime<FixedOffset>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            begin,
            end,
        }
    }

    /// Whether the outage started strictly before `cutoff`
    pub fn begins_before(&self, cutoff: &DateTime<FixedOffset>) -> bool {
        self.begin < *cutoff
    }

    /// Attach the device name, producing the record submitted to the API
    ///
    /// Fails with `InvalidArgument` if the name is empty or only whitespace.
    pub fn with_device_name(self, name: &str) -> Result<SiteOutage, SyncError> {
        let name = DeviceName::new(name)?;
        Ok(SiteOutage::new(self, name))
    }
}

/// A non-blank device name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeviceName(String);

impl DeviceName {
    /// Create a device name, rejecting blank values
    pub fn new(name: impl Into<String>) -> Result<Self, SyncError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SyncError::InvalidArgument(
                "A meaningful device name is required.".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An outage joined with the name of its device
///
/// Equality and hashing ignore the name: two records describe the same outage
/// when device id, begin and end match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "SubmissionEntry", try_from = "SubmissionEntry")]
pub struct SiteOutage {
    outage: DeviceOutage,
    device_name: DeviceName,
}

impl SiteOutage {
    /// Create a named outage
    pub fn new(outage: DeviceOutage, device_name: DeviceName) -> Self {
        Self {
            outage,
            device_name,
        }
    }

    /// Device id
    pub fn device_id(&self) -> &DeviceId {
        &self.outage.device_id
    }

    /// Device name
    pub fn device_name(&self) -> &str {
        self.device_name.as_str()
    }

    /// Start of the outage
    pub fn begin(&self) -> &DateTime<FixedOffset> {
        &self.outage.begin
    }

    /// End of the outage (None = ongoing)
    pub fn end(&self) -> Option<&DateTime<FixedOffset>> {
        self.outage.end.as_ref()
    }

    /// The underlying outage record
    pub fn outage(&self) -> &DeviceOutage {
        &self.outage
    }
}

impl PartialEq for SiteOutage {
    fn eq(&self, other: &Self) -> bool {
        self.outage == other.outage
    }
}

impl Eq for SiteOutage {}

impl Hash for SiteOutage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.outage.hash(state);
    }
}

/// Wire shape of a submitted outage; the id is always sent as text
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubmissionEntry {
    id: String,
    name: String,
    #[serde(with = "timestamp::serde_millis")]
    begin: DateTime<FixedOffset>,
    #[serde(default, with = "timestamp::serde_millis::option")]
    end: Option<DateTime<FixedOffset>>,
}

impl From<SiteOutage> for SubmissionEntry {
    fn from(value: SiteOutage) -> Self {
        Self {
            id: value.outage.device_id.to_string(),
            name: value.device_name.0,
            begin: value.outage.begin,
            end: value.outage.end,
        }
    }
}

impl TryFrom<SubmissionEntry> for SiteOutage {
    type Error = SyncError;

    fn try_from(entry: SubmissionEntry) -> Result<Self, Self::Error> {
        DeviceOutage::new(entry.id, entry.begin, entry.end).with_device_name(&entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ts(value: &str) -> DateTime<FixedOffset> {
        timestamp::parse(value).unwrap()
    }

    // Test 1: Deserialize an outage from the API
    #[test]
    fn test_deserialize_outage() {
        let json = r#"{
            "id": "002b28fc-283c-47ec-9af2-ea287336dc1b",
            "begin": "2021-07-26T17:09:31.036Z",
            "end": "2021-08-29T00:37:42.253Z"
        }"#;

        let outage: DeviceOutage = serde_json::from_str(json).unwrap();

        assert_eq!(
            outage.device_id,
            DeviceId::from("002b28fc-283c-47ec-9af2-ea287336dc1b")
        );
        assert_eq!(outage.begin, ts("2021-07-26T17:09:31.036Z"));
        assert_eq!(outage.end, Some(ts("2021-08-29T00:37:42.253Z")));
    }

    // Test 2: Null and absent end both mean ongoing
    #[test]
    fn test_deserialize_ongoing_outage() {
        let with_null: DeviceOutage =
            serde_json::from_str(r#"{"id": "a", "begin": "2022-01-01T00:00:00.000Z", "end": null}"#)
                .unwrap();
        let without: DeviceOutage =
            serde_json::from_str(r#"{"id": "a", "begin": "2022-01-01T00:00:00.000Z"}"#).unwrap();

        assert_eq!(with_null.end, None);
        assert_eq!(without.end, None);
        assert_eq!(with_null, without);
    }

    // Test 3: Integer ids stay integers
    #[test]
    fn test_integer_device_id() {
        let outage: DeviceOutage =
            serde_json::from_str(r#"{"id": 42, "begin": "2022-01-01T00:00:00.000Z"}"#).unwrap();

        assert_eq!(outage.device_id, DeviceId::from(42i64));
        assert_ne!(outage.device_id, DeviceId::from("42"));
    }

    // Test 4: Missing begin is rejected
    #[test]
    fn test_begin_is_required() {
        let result: Result<DeviceOutage, _> = serde_json::from_str(r#"{"id": "a"}"#);
        assert!(result.is_err());
    }

    // Test 5: End before begin is passed through unchanged
    #[test]
    fn test_end_before_begin_passthrough() {
        let outage = DeviceOutage::new(
            "a",
            ts("2022-01-02T00:00:00.000Z"),
            Some(ts("2022-01-01T00:00:00.000Z")),
        );

        let named = outage.clone().with_device_name("Device 1").unwrap();
        assert_eq!(named.outage(), &outage);
    }

    // Test 6: Blank device names are rejected
    #[test]
    fn test_blank_device_name_rejected() {
        let outage = DeviceOutage::new("a", ts("2022-01-01T00:00:00.000Z"), None);

        let err = outage.clone().with_device_name("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = outage.with_device_name(" \t\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    // Test 7: Equality ignores the device name
    #[test]
    fn test_equality_ignores_name() {
        let outage = DeviceOutage::new("a", ts("2022-01-01T00:00:00.000Z"), None);

        let first = outage.clone().with_device_name("Device 1").unwrap();
        let second = outage.with_device_name("Renamed").unwrap();

        assert_eq!(first, second);
    }

    // Test 8: Equality covers id, begin and end
    #[test]
    fn test_equality_fields() {
        let base = DeviceOutage::new("a", ts("2022-01-01T00:00:00.000Z"), None);

        assert_ne!(
            base,
            DeviceOutage::new("b", ts("2022-01-01T00:00:00.000Z"), None)
        );
        assert_ne!(
            base,
            DeviceOutage::new("a", ts("2022-01-01T00:00:00.001Z"), None)
        );
        assert_ne!(
            base,
            DeviceOutage::new(
                "a",
                ts("2022-01-01T00:00:00.000Z"),
                Some(ts("2022-01-02T00:00:00.000Z"))
            )
        );
    }

    // Test 9: Submission shape sends the id as text and end as null
    #[test]
    fn test_submission_shape() {
        let named = DeviceOutage::new(7i64, ts("2022-01-01T00:00:00.000Z"), None)
            .with_device_name("Battery 7")
            .unwrap();

        let value = serde_json::to_value(&named).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "id": "7",
                "name": "Battery 7",
                "begin": "2022-01-01T00:00:00.000Z",
                "end": null
            })
        );
    }

    // Test 10: Submitted record re-parses to the same outage
    #[test]
    fn test_submission_reparse() {
        let named = DeviceOutage::new(
            "70656668-571e-49fa-be2e-099c67d136ab",
            ts("2022-02-15T11:28:26.965+01:00"),
            Some(ts("2022-08-28T03:37:48.568Z")),
        )
        .with_device_name("Battery 4")
        .unwrap();

        let json = serde_json::to_string(&named).unwrap();
        let parsed: SiteOutage = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.device_id(), named.device_id());
        assert_eq!(parsed.begin(), named.begin());
        assert_eq!(parsed.end(), named.end());
        assert_eq!(parsed.device_name(), "Battery 4");
    }

    // Test 11: begins_before is strict
    #[test]
    fn test_begins_before_is_strict() {
        let cutoff = ts("2022-01-01T00:00:00.000Z");

        let at_cutoff = DeviceOutage::new("a", cutoff, None);
        let just_before = DeviceOutage::new("a", ts("2021-12-31T23:59:59.999Z"), None);

        assert!(!at_cutoff.begins_before(&cutoff));
        assert!(just_before.begins_before(&cutoff));
    }

    // Test 12: Any JSON scalar is accepted as a device id
    #[test]
    fn test_scalar_device_ids() {
        let parse = |id: &str| -> DeviceOutage {
            serde_json::from_str(&format!(
                r#"{{"id": {}, "begin": "2022-01-01T00:00:00.000Z"}}"#,
                id
            ))
            .unwrap()
        };

        let decimal = parse("1.5");
        let huge = parse("18446744073709551615");
        let flag = parse("true");
        let whole = parse("1");
        let whole_decimal = parse("1.0");

        assert_eq!(decimal.device_id.to_string(), "1.5");
        assert_eq!(huge.device_id.to_string(), "18446744073709551615");
        assert_eq!(flag.device_id, DeviceId::from(true));
        assert_eq!(whole.device_id, DeviceId::from(1i64));
        assert_ne!(whole.device_id, whole_decimal.device_id);
        assert_ne!(whole.device_id, DeviceId::from("1"));
    }

    // Test 13: Scalar ids are submitted as text
    #[test]
    fn test_scalar_ids_submitted_as_text() {
        for (raw, expected) in [
            ("1.5", "1.5"),
            ("18446744073709551615", "18446744073709551615"),
            ("false", "false"),
        ] {
            let outage: DeviceOutage = serde_json::from_str(&format!(
                r#"{{"id": {}, "begin": "2022-01-01T00:00:00.000Z"}}"#,
                raw
            ))
            .unwrap();

            let named = outage.with_device_name("Device").unwrap();
            let value = serde_json::to_value(&named).unwrap();

            assert_eq!(value["id"], serde_json::json!(expected));
        }
    }

    // Test 14: Non-scalar ids are rejected
    #[test]
    fn test_non_scalar_device_id_rejected() {
        let result: Result<DeviceOutage, _> =
            serde_json::from_str(r#"{"id": {"nested": 1}, "begin": "2022-01-01T00:00:00.000Z"}"#);
        assert!(result.is_err());
    }
}
