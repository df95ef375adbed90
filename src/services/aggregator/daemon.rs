use std::sync::Arc;

use tracing::{info, instrument};
use zbus::Connection;

use crate::{
    config::DaemonConfig,
    services::mpris::{MprisClient, SessionTransport},
};

use super::{
    AggregatorServer, AggregatorState, DaemonError, ProxyDispatcher, Selector,
    extension::MUSICWAND_INTERFACE,
};

/// Run the aggregator daemon until the bus connection closes.
///
/// Startup order: discover and select a player, subscribe to changes,
/// claim the service name, then serve calls while a background task keeps
/// the selection current.
///
/// # Errors
/// Returns error if the bus is unreachable, no players exist and
/// `on_empty` is `fail`, the change subscription fails, or the service name
/// cannot be claimed
#[instrument(skip(config), fields(service = %config.service_name()))]
pub async fn run(config: &DaemonConfig) -> Result<(), DaemonError> {
    let connection = Connection::session()
        .await
        .map_err(|e| DaemonError::TransportUnavailable(e.to_string()))?;

    let transport = SessionTransport::new(connection.clone()).await?;
    let client = MprisClient::new(Arc::new(transport))
        .ignoring(config.ignored_players.iter().cloned())
        .excluding([config.service_name()]);
    let selector = Selector::new(client.clone(), AggregatorState::new());

    selector.select_initial(config.on_empty).await?;
    let events = client.subscribe_player_changes().await?;

    let dispatcher =
        ProxyDispatcher::new(selector.clone()).with_extension(&MUSICWAND_INTERFACE);
    let server = AggregatorServer::new(connection, dispatcher);
    server.claim_name(&config.service_name()).await?;

    tokio::spawn(selector.run(events));

    server.serve().await;
    info!("Daemon stopped");
    Ok(())
}
