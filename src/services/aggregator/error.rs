use zbus::fdo;

use crate::services::mpris::MediaError;

/// Errors answered to a bus caller of the aggregator
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// A forwarded call failed against the selected player
    #[error(transparent)]
    Remote(#[from] MediaError),

    /// The object does not implement the requested method
    #[error("Unknown method {interface}.{member}")]
    UnknownMethod {
        /// Interface named by the caller
        interface: String,
        /// Member named by the caller
        member: String,
    },

    /// The property cannot be read or written here
    #[error("Unknown property {interface}.{property}")]
    UnknownProperty {
        /// Interface named by the caller
        interface: String,
        /// Property named by the caller
        property: String,
    },

    /// The call carried arguments of the wrong number or type
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// A player requested by name is not on the bus
    #[error("Service {0} not found")]
    ServiceNotFound(String),

    /// A local resource could not be read
    #[error("I/O error: {0}")]
    Io(String),
}

impl DispatchError {
    /// Creates an `UnknownMethod` error
    pub fn unknown_method(interface: &str, member: &str) -> Self {
        Self::UnknownMethod {
            interface: interface.to_string(),
            member: member.to_string(),
        }
    }

    /// Creates an `UnknownProperty` error
    pub fn unknown_property(interface: &str, property: &str) -> Self {
        Self::UnknownProperty {
            interface: interface.to_string(),
            property: property.to_string(),
        }
    }
}

impl From<DispatchError> for fdo::Error {
    fn from(error: DispatchError) -> Self {
        let message = error.to_string();
        match error {
            DispatchError::Remote(MediaError::ServiceNotFound(_))
            | DispatchError::ServiceNotFound(_) => fdo::Error::ServiceUnknown(message),
            DispatchError::Remote(_) => fdo::Error::Failed(message),
            DispatchError::UnknownMethod { .. } => fdo::Error::UnknownMethod(message),
            DispatchError::UnknownProperty { .. } => fdo::Error::UnknownProperty(message),
            DispatchError::InvalidArgs(_) => fdo::Error::InvalidArgs(message),
            DispatchError::Io(_) => fdo::Error::IOError(message),
        }
    }
}

/// Errors that stop the daemon from starting
#[derive(thiserror::Error, Debug)]
pub enum DaemonError {
    /// The session bus could not be reached
    #[error("D-Bus session unavailable: {0}")]
    TransportUnavailable(String),

    /// No players were found and the daemon is configured to fail
    #[error("Unable to connect to any music players")]
    NoPlayers,

    /// The aggregator bus name is owned by someone else
    #[error("Unable to claim {0}")]
    NameNotClaimed(String),

    /// The change signal subscription could not be set up
    #[error("Failed to subscribe to player changes: {0}")]
    Subscription(String),

    /// Player discovery failed
    #[error(transparent)]
    Discovery(MediaError),
}

impl From<MediaError> for DaemonError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::TransportUnavailable(reason) => Self::TransportUnavailable(reason),
            MediaError::Subscription(reason) => Self::Subscription(reason),
            other => Self::Discovery(other),
        }
    }
}
