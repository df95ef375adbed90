//! Resolution of the player a client command talks to.
//!
//! Without `--player` every command goes through the aggregator daemon,
//! which is started on demand when it is not on the bus yet.

use std::{
    path::Path,
    process::{Command, Stdio},
    time::Duration,
};

use tracing::{debug, info, instrument};

use crate::{
    config::DaemonConfig,
    services::mpris::{MediaError, MprisClient, Player},
};

use super::CliError;

/// Player handle for the daemon's bus name, if it is registered.
///
/// # Errors
/// Returns error if the bus names cannot be listed
pub async fn find_daemon(
    client: &MprisClient,
    service_name: &str,
) -> Result<Option<Player>, MediaError> {
    let players = client.list_players().await?;
    Ok(players
        .into_iter()
        .find(|player| player.bus_name() == service_name))
}

/// Poll for the daemon up to `attempts` times, sleeping `interval` between
/// two polls.
///
/// # Errors
/// Returns error if the bus names cannot be listed
pub async fn wait_for_daemon(
    client: &MprisClient,
    service_name: &str,
    attempts: u32,
    interval: Duration,
) -> Result<Option<Player>, MediaError> {
    for attempt in 1..=attempts {
        if let Some(daemon) = find_daemon(client, service_name).await? {
            return Ok(Some(daemon));
        }

        debug!(attempt, attempts, "Daemon not on the bus yet");
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Ok(None)
}

/// Launch `mw daemon` detached from the current process.
///
/// # Errors
/// Returns error if the current executable cannot be located or spawned
pub fn spawn_daemon(config_path: Option<&Path>) -> Result<(), CliError> {
    let exe = std::env::current_exe()?;
    let mut command = Command::new(exe);
    command
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }

    let child = command.spawn()?;
    info!(pid = child.id(), "Started musicwand daemon");
    Ok(())
}

/// The aggregator daemon, started first when it is not running.
///
/// # Errors
/// Returns `DaemonUnavailable` if the daemon is still missing after every
/// poll
#[instrument(skip(client, config))]
pub async fn connect_daemon(
    client: &MprisClient,
    config: &DaemonConfig,
    config_path: Option<&Path>,
) -> Result<Player, CliError> {
    let service_name = config.service_name();

    if let Some(daemon) = find_daemon(client, &service_name).await? {
        return Ok(daemon);
    }

    spawn_daemon(config_path)?;

    wait_for_daemon(
        client,
        &service_name,
        config.autostart_attempts,
        config.autostart_interval(),
    )
    .await?
    .ok_or(CliError::DaemonUnavailable(service_name))
}

/// Player a command acts on: the one matching `player_suffix` when given,
/// otherwise the daemon.
///
/// # Errors
/// Returns `PlayerNotFound` if no player ends with the suffix, or any
/// error from [`connect_daemon`]
pub async fn resolve_target(
    client: &MprisClient,
    config: &DaemonConfig,
    config_path: Option<&Path>,
    player_suffix: Option<&str>,
) -> Result<Player, CliError> {
    match player_suffix {
        Some(suffix) => client
            .find_player(suffix)
            .await?
            .ok_or_else(|| CliError::PlayerNotFound(suffix.to_string())),
        None => connect_daemon(client, config, config_path).await,
    }
}
