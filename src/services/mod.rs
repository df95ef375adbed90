/// Aggregating daemon republishing one player under a stable name
pub mod aggregator;
/// MPRIS media player client
pub mod mpris;

pub use mpris::{MediaError, MprisClient, Player, PlayerIdentity, SessionTransport};
