use super::variant::VariantError;

const SERVICE_UNKNOWN: &str = "org.freedesktop.DBus.Error.ServiceUnknown";
const NAME_HAS_NO_OWNER: &str = "org.freedesktop.DBus.Error.NameHasNoOwner";

/// Errors that can occur while talking to media players over the bus
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// The session bus could not be reached
    #[error("D-Bus session unavailable: {0}")]
    TransportUnavailable(String),

    /// The named player (or the aggregator itself) is not on the bus
    #[error("Service {0} not found")]
    ServiceNotFound(String),

    /// A method or property operation failed against a live player
    #[error("{operation} failed: {reason}")]
    RemoteCallFailed {
        /// Bus operation that failed (e.g. `Play`, `Get Volume`)
        operation: String,
        /// Error reported by the transport or the remote player
        reason: String,
    },

    /// A value came back in a shape the caller did not expect
    #[error(transparent)]
    UnexpectedShape(#[from] VariantError),

    /// The change signal filter could not be registered
    #[error("Failed to subscribe to player changes: {0}")]
    Subscription(String),
}

impl MediaError {
    /// Creates a `RemoteCallFailed` error for the given operation.
    pub fn remote(operation: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::RemoteCallFailed {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Classifies a zbus error raised while talking to `destination`.
    ///
    /// Errors telling us the destination has no owner become
    /// `ServiceNotFound`; everything else is a failed remote call.
    pub fn from_zbus(destination: &str, operation: &str, error: zbus::Error) -> Self {
        match &error {
            zbus::Error::MethodError(name, _, _)
                if matches!(name.as_str(), SERVICE_UNKNOWN | NAME_HAS_NO_OWNER) =>
            {
                Self::ServiceNotFound(destination.to_string())
            }
            _ => Self::remote(operation, error),
        }
    }

    /// Classifies an error returned by one of the standard `fdo` proxies.
    pub fn from_fdo(destination: &str, operation: &str, error: zbus::fdo::Error) -> Self {
        match error {
            zbus::fdo::Error::ServiceUnknown(_) | zbus::fdo::Error::NameHasNoOwner(_) => {
                Self::ServiceNotFound(destination.to_string())
            }
            other => Self::remote(operation, other),
        }
    }
}
