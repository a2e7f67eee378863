//! Shared validation helpers for inbound HTTP adapters.

use crate::domain::{DeviceId, Error, IncidentValidationError};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    Error::invalid_request(format!("missing required field {}", field.as_str()))
}

/// Return the field's value, treating absent and empty input alike.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Parse a required device identifier.
///
/// Zero is rejected the same way as a missing value.
pub(crate) fn parse_device_id(value: Option<String>, field: FieldName) -> Result<DeviceId, Error> {
    let raw = require_field(value, field)?;
    raw.parse::<DeviceId>().map_err(|err| match err {
        IncidentValidationError::ZeroDeviceId => missing_field_error(field),
        IncidentValidationError::MalformedDeviceId { .. }
        | IncidentValidationError::DeviceIdOutOfRange { .. } => {
            Error::invalid_request(format!("{} {err}", field.as_str()))
        }
    })
}
