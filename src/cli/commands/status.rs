use futures::StreamExt;
use tracing::debug;

use crate::{
    cli::CommandResult,
    services::mpris::{MprisClient, Player},
    status::{IconTable, format_status},
};

/// How `mw status --watch` picks the player to render after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    /// Render whichever player emitted the change
    Sender,
    /// Keep rendering the target, ignoring changes from other players
    Target,
}

/// Render the status line once, or keep re-rendering it on every change.
///
/// In watch mode the first line is printed immediately and a new line is
/// printed whenever the rendered text differs from the previous one.
///
/// # Errors
/// Returns error if the change subscription cannot be registered
pub async fn execute(
    client: &MprisClient,
    target: &Player,
    template: &str,
    icons: &IconTable,
    watch: Option<Follow>,
) -> CommandResult {
    let first = format_status(template, target, icons).await;

    let Some(follow) = watch else {
        return Ok(first);
    };

    let mut events = client.subscribe_player_changes().await?;
    println!("{first}");
    let mut last = first;

    while let Some(event) = events.next().await {
        let player = match follow {
            Follow::Target if event.owner_id != target.owner_id() => continue,
            Follow::Target => target.clone(),
            Follow::Sender => match client.player_for_owner(&event.owner_id).await {
                Ok(Some(player)) => player,
                Ok(None) => target.clone(),
                Err(e) => {
                    debug!("Falling back to {}: {e}", target.bus_name());
                    target.clone()
                }
            },
        };

        let line = format_status(template, &player, icons).await;
        if line != last {
            println!("{line}");
            last = line;
        }
    }

    Ok(String::new())
}
