//! Incident reconciliation rule.
//!
//! Maps a reported event onto the storage operation it implies. The rule is
//! pure; [`crate::domain::IncidentService`] applies the result.
//!
//! | event type          | operation                                      |
//! |---------------------|------------------------------------------------|
//! | `OK`                | close the device's open incident, if any       |
//! | `Warning` / `Error` | open an incident, or refresh its type only     |
//! | anything else       | reject; nothing is persisted                   |

use tracing::warn;

use crate::domain::{DeviceId, Error, EventType, IncidentEvent, NewIncident};

/// Storage operation implied by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Insert the incident, or on an open incident for the same device update
    /// its type and leave date, time and details untouched.
    Open(NewIncident),
    /// Close the open incident for the device. Closing nothing is a success.
    Close(DeviceId),
}

/// Decide what an event does to the incident store.
///
/// # Errors
/// Returns [`crate::domain::ErrorCode::UnknownIncidentType`] when the type
/// label is outside the vocabulary.
///
/// # Examples
/// ```
/// use incident_board::domain::{reconcile, DeviceId, IncidentEvent, Reconciliation};
///
/// let device_id = DeviceId::new(7).expect("non-zero");
/// let event = IncidentEvent {
///     device_id,
///     incident_type: "OK".to_owned(),
///     date: "2024-01-01".to_owned(),
///     time: "10:05".to_owned(),
///     details: "recovered".to_owned(),
/// };
/// assert_eq!(reconcile(event), Ok(Reconciliation::Close(device_id)));
/// ```
pub fn reconcile(event: IncidentEvent) -> Result<Reconciliation, Error> {
    let IncidentEvent {
        device_id,
        incident_type,
        date,
        time,
        details,
    } = event;

    match EventType::classify(&incident_type) {
        Some(EventType::Ok) => Ok(Reconciliation::Close(device_id)),
        Some(EventType::Incident(kind)) => Ok(Reconciliation::Open(NewIncident {
            device_id,
            incident_type: kind,
            date,
            time,
            details,
        })),
        None => {
            warn!(%device_id, incident_type = %incident_type, "unknown incident type");
            Err(Error::unknown_incident_type(format!(
                "Unknown incident type {incident_type}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, IncidentType};
    use rstest::{fixture, rstest};

    #[fixture]
    fn device_id() -> DeviceId {
        DeviceId::new(7).expect("non-zero device id")
    }

    fn event(device_id: DeviceId, incident_type: &str) -> IncidentEvent {
        IncidentEvent {
            device_id,
            incident_type: incident_type.to_owned(),
            date: "2024-01-01".to_owned(),
            time: "10:00".to_owned(),
            details: "low disk".to_owned(),
        }
    }

    #[rstest]
    fn ok_closes_the_device(device_id: DeviceId) {
        let outcome = reconcile(event(device_id, "OK")).expect("ok is known");
        assert_eq!(outcome, Reconciliation::Close(device_id));
    }

    #[rstest]
    #[case("Warning", IncidentType::Warning)]
    #[case("Warnung", IncidentType::Warning)]
    #[case("Error", IncidentType::Error)]
    #[case("Fehler", IncidentType::Error)]
    fn non_ok_types_open_an_incident(
        device_id: DeviceId,
        #[case] label: &str,
        #[case] expected: IncidentType,
    ) {
        let outcome = reconcile(event(device_id, label)).expect("type is known");
        assert_eq!(
            outcome,
            Reconciliation::Open(NewIncident {
                device_id,
                incident_type: expected,
                date: "2024-01-01".to_owned(),
                time: "10:00".to_owned(),
                details: "low disk".to_owned(),
            })
        );
    }

    #[rstest]
    #[case("Down")]
    #[case("ok")]
    #[case("")]
    fn unknown_types_are_rejected(device_id: DeviceId, #[case] label: &str) {
        let err = reconcile(event(device_id, label)).expect_err("type is unknown");
        assert_eq!(err.code(), ErrorCode::UnknownIncidentType);
        assert_eq!(err.message(), format!("Unknown incident type {label}"));
    }
}
