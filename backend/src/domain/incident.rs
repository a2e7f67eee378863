//! Incident entities and the event vocabulary reported by monitoring probes.
//!
//! A device has at most one open [`Incident`]. Probes report state changes as
//! an [`IncidentEvent`]; the [`EventType`] decides whether the event opens,
//! updates or closes that incident.

use chrono::{DateTime, Utc};

/// Label used by probes to report that a device is back to normal.
pub const OK_LABEL: &str = "OK";

/// Validation failures for incident primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncidentValidationError {
    /// Device identifiers start at one; zero means "not provided".
    #[error("device id must be a positive integer")]
    ZeroDeviceId,
    /// The device identifier is not an unsigned integer.
    #[error("device id must be a positive integer, got '{value}'")]
    MalformedDeviceId { value: String },
    /// The device identifier does not fit the store's signed 64-bit column.
    #[error("device id must not exceed 9223372036854775807, got {value}")]
    DeviceIdOutOfRange { value: u64 },
}

/// External identifier of the monitored device (the probe ID).
///
/// Valid identifiers run from one to [`DeviceId::MAX`], the largest value a
/// SQLite `BIGINT` holds.
///
/// # Examples
/// ```
/// use incident_board::domain::DeviceId;
///
/// let id: DeviceId = "5000000000".parse().expect("valid device id");
/// assert_eq!(id.get(), 5_000_000_000);
/// assert!("0".parse::<DeviceId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(i64);

impl DeviceId {
    /// Largest accepted identifier.
    pub const MAX: u64 = i64::MAX.unsigned_abs();

    /// Validate and wrap a raw device identifier.
    ///
    /// # Errors
    /// Returns [`IncidentValidationError::ZeroDeviceId`] for zero and
    /// [`IncidentValidationError::DeviceIdOutOfRange`] above [`Self::MAX`].
    pub fn new(value: u64) -> Result<Self, IncidentValidationError> {
        if value == 0 {
            return Err(IncidentValidationError::ZeroDeviceId);
        }
        i64::try_from(value)
            .map(Self)
            .map_err(|_| IncidentValidationError::DeviceIdOutOfRange { value })
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Identifier as stored in the `incident_device_id` column.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl std::str::FromStr for DeviceId {
    type Err = IncidentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u64>()
            .map_err(|_| IncidentValidationError::MalformedDeviceId {
                value: s.to_owned(),
            })?;
        Self::new(value)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-normal device states that keep an incident open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentType {
    /// Degraded but still answering.
    Warning,
    /// Down or failing.
    Error,
}

impl IncidentType {
    /// Canonical label persisted and rendered for this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Match a probe label, accepting the German probe vocabulary as aliases.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Warning" | "Warnung" => Some(Self::Warning),
            "Error" | "Fehler" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a reported event type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// The device recovered; its incident closes.
    Ok,
    /// The device is in a non-normal state.
    Incident(IncidentType),
}

impl EventType {
    /// Classify a probe label. Matching is exact and case-sensitive.
    #[must_use]
    pub fn classify(label: &str) -> Option<Self> {
        if label == OK_LABEL {
            return Some(Self::Ok);
        }
        IncidentType::from_label(label).map(Self::Incident)
    }
}

/// State transition reported by a probe, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentEvent {
    pub device_id: DeviceId,
    /// Raw type label as sent by the probe.
    pub incident_type: String,
    pub date: String,
    pub time: String,
    pub details: String,
}

/// Incident to open for a device, or whose type to refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub device_id: DeviceId,
    pub incident_type: IncidentType,
    pub date: String,
    pub time: String,
    pub details: String,
}

/// Lifecycle timestamps kept alongside each incident row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the incident was closed; closed rows are kept as history.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecordMetadata {
    /// Metadata for a row created at `at`.
    #[must_use]
    pub const fn created(at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    /// Whether the row is still an open incident.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Persisted incident record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub id: i64,
    pub device_id: DeviceId,
    pub incident_type: IncidentType,
    pub date: String,
    pub time: String,
    pub details: String,
    pub metadata: RecordMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", 7)]
    #[case(" 42 ", 42)]
    #[case("5000000000", 5_000_000_000)]
    #[case("9223372036854775807", DeviceId::MAX)]
    fn device_id_parses_positive_integers(#[case] raw: &str, #[case] expected: u64) {
        let id: DeviceId = raw.parse().expect("valid device id");
        assert_eq!(id.get(), expected);
    }

    #[rstest]
    #[case("0", IncidentValidationError::ZeroDeviceId)]
    #[case("-1", IncidentValidationError::MalformedDeviceId { value: "-1".to_owned() })]
    #[case("seven", IncidentValidationError::MalformedDeviceId { value: "seven".to_owned() })]
    #[case("", IncidentValidationError::MalformedDeviceId { value: String::new() })]
    #[case(
        "9223372036854775808",
        IncidentValidationError::DeviceIdOutOfRange { value: DeviceId::MAX + 1 }
    )]
    #[case(
        "18446744073709551616",
        IncidentValidationError::MalformedDeviceId { value: "18446744073709551616".to_owned() }
    )]
    fn device_id_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: IncidentValidationError,
    ) {
        assert_eq!(raw.parse::<DeviceId>(), Err(expected));
    }

    #[rstest]
    #[case("OK", Some(EventType::Ok))]
    #[case("Warning", Some(EventType::Incident(IncidentType::Warning)))]
    #[case("Warnung", Some(EventType::Incident(IncidentType::Warning)))]
    #[case("Error", Some(EventType::Incident(IncidentType::Error)))]
    #[case("Fehler", Some(EventType::Incident(IncidentType::Error)))]
    #[case("ok", None)]
    #[case("warning", None)]
    #[case("Down", None)]
    #[case("", None)]
    fn classify_matches_the_vocabulary_exactly(
        #[case] label: &str,
        #[case] expected: Option<EventType>,
    ) {
        assert_eq!(EventType::classify(label), expected);
    }

    #[rstest]
    fn aliases_persist_under_the_canonical_label() {
        let kind = IncidentType::from_label("Fehler").expect("known alias");
        assert_eq!(kind.as_str(), "Error");
    }
}
