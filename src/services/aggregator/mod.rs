/// Daemon entry point
pub mod daemon;
/// Routing of inbound calls to the selected player
pub mod dispatcher;
/// Aggregator error types
pub mod error;
/// Administrative extension interface
pub mod extension;
/// Introspection document assembly
pub mod introspection;
/// Current-player selection policy
pub mod selection;
/// Bus-facing message loop
pub mod server;
/// Shared selection state
pub mod state;

pub use daemon::run;
pub use dispatcher::{ProxyDispatcher, Request, Response};
pub use error::{DaemonError, DispatchError};
pub use extension::{EXTENSION_INTERFACE, MUSICWAND_INTERFACE, MusicwandProxy};
pub use selection::{OnEmpty, Selector};
pub use server::AggregatorServer;
pub use state::AggregatorState;
