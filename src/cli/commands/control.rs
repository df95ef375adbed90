use tracing::instrument;

use crate::{
    cli::CommandResult,
    services::mpris::{ControlCall, Player},
};

/// Forward a transport control call to `player`.
///
/// Prints nothing on success.
///
/// # Errors
/// Returns error if the player rejects the call or has left the bus
#[instrument(skip(player), fields(player = player.bus_name()))]
pub async fn execute(player: &Player, call: ControlCall) -> CommandResult {
    player.control(&call).await?;
    Ok(String::new())
}
