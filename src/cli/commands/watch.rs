use futures::StreamExt;

use crate::{
    cli::{CommandResult, formatting::format_change},
    services::mpris::MprisClient,
};

/// Print one line per property change on any player until the bus
/// connection drops.
///
/// Changes from senders that no longer own a player name are labelled with
/// the raw connection id.
///
/// # Errors
/// Returns error if the change subscription cannot be registered
pub async fn execute(client: &MprisClient) -> CommandResult {
    let mut events = client.subscribe_player_changes().await?;

    while let Some(event) = events.next().await {
        let label = match client.player_for_owner(&event.owner_id).await {
            Ok(Some(player)) => player.bus_name().to_string(),
            _ => event.owner_id.clone(),
        };
        println!("{}", format_change(&label, &event));
    }

    Ok(String::new())
}
