use zbus::{Connection, proxy::CacheProperties};

use crate::{
    cli::{CliError, CommandResult, formatting::format_player_entry},
    services::{aggregator::MusicwandProxy, mpris::MediaError},
};

async fn daemon_proxy(
    connection: &Connection,
    service_name: &str,
) -> Result<MusicwandProxy<'static>, CliError> {
    MusicwandProxy::builder(connection)
        .destination(service_name.to_string())
        .map_err(|e| CliError::ServiceError(e.to_string()))?
        .cache_properties(CacheProperties::No)
        .build()
        .await
        .map_err(|e| CliError::from(MediaError::from_zbus(service_name, "Connect", e)))
}

/// Make the daemon forward to the player named `name`.
///
/// # Errors
/// Returns `PlayerNotFound` if the daemon knows no such player
pub async fn select(connection: &Connection, service_name: &str, name: &str) -> CommandResult {
    let proxy = daemon_proxy(connection, service_name).await?;

    proxy
        .set_current_player(name)
        .await
        .map_err(|e| CliError::from(MediaError::from_zbus(name, "SetCurrentPlayer", e)))?;

    Ok(String::new())
}

/// List the players the daemon can forward to, starring the current one.
///
/// # Errors
/// Returns error if the daemon cannot be queried
pub async fn list(connection: &Connection, service_name: &str) -> CommandResult {
    let proxy = daemon_proxy(connection, service_name).await?;

    let names = proxy
        .list_players()
        .await
        .map_err(|e| CliError::from(MediaError::from_zbus(service_name, "ListPlayers", e)))?;
    let current = proxy
        .current_player()
        .await
        .map_err(|e| CliError::from(MediaError::from_zbus(service_name, "CurrentPlayer", e)))?;

    Ok(names
        .iter()
        .map(|name| format_player_entry(name, *name == current))
        .collect::<Vec<_>>()
        .join("\n"))
}
