use thiserror::Error;

use crate::services::mpris::MediaError;

/// Errors that can occur during CLI command execution.
///
/// Each variant maps to one user-facing failure message; the binary prints
/// it and exits with status 1.
#[derive(Error, Debug)]
pub enum CliError {
    /// The session bus could not be reached.
    #[error("Could not connect to the D-Bus session: {0}")]
    TransportUnavailable(String),

    /// The aggregator is not running and could not be started.
    ///
    /// Carries the bus name that never appeared.
    #[error("Could not find musicwand service {0}, is the daemon running?")]
    DaemonUnavailable(String),

    /// No player matched the requested name or suffix.
    #[error("Could not find player {0}")]
    PlayerNotFound(String),

    /// A call to a player or to the daemon failed.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// An error occurred while rendering command output.
    #[error("Output error: {0}")]
    Output(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<MediaError> for CliError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::TransportUnavailable(reason) => Self::TransportUnavailable(reason),
            MediaError::ServiceNotFound(name) => Self::PlayerNotFound(name),
            other => Self::ServiceError(other.to_string()),
        }
    }
}

/// Type alias for command execution results.
///
/// Commands return the text to print on stdout; an empty string prints
/// nothing.
pub type CommandResult = Result<String, CliError>;
