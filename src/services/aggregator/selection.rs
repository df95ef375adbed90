use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::services::mpris::{
    ChangeEvent, ChangeStream, MediaError, MprisClient, PlaybackState, Player,
};

use super::{AggregatorState, DaemonError};

/// What the daemon does when no player exists at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnEmpty {
    /// Refuse to start
    #[default]
    Fail,
    /// Start unselected and wait for the first player to change
    Idle,
}

/// Decides which player is current and keeps [`AggregatorState`] up to date.
///
/// At startup the first playing player wins, falling back to the first one
/// found. Afterwards any change signal makes its sender current, whether or
/// not it is playing.
#[derive(Clone)]
pub struct Selector {
    client: MprisClient,
    state: AggregatorState,
}

impl Selector {
    /// Create a selector writing into `state`
    pub fn new(client: MprisClient, state: AggregatorState) -> Self {
        Self { client, state }
    }

    /// The state this selector writes to
    pub fn state(&self) -> &AggregatorState {
        &self.state
    }

    /// The client used for lookups
    pub fn client(&self) -> &MprisClient {
        &self.client
    }

    /// Pick the first playing player, else the first player.
    pub async fn choose_initial(players: Vec<Player>) -> Option<Player> {
        for player in &players {
            if player.playback_status().await == PlaybackState::Playing {
                return Some(player.clone());
            }
        }
        players.into_iter().next()
    }

    /// Run the startup selection pass.
    ///
    /// Returns the selected player, or `None` when nothing was found and
    /// `on_empty` allows idling.
    ///
    /// # Errors
    /// Returns `NoPlayers` when nothing was found and `on_empty` is `Fail`,
    /// or a discovery error if the bus cannot be queried
    #[instrument(skip(self))]
    pub async fn select_initial(&self, on_empty: OnEmpty) -> Result<Option<Player>, DaemonError> {
        let players = self.client.list_players().await?;
        debug!(count = players.len(), "Discovered players");

        let Some(player) = Self::choose_initial(players).await else {
            return match on_empty {
                OnEmpty::Fail => Err(DaemonError::NoPlayers),
                OnEmpty::Idle => {
                    warn!("No players found, waiting for one to appear");
                    Ok(None)
                }
            };
        };

        info!(player = %player.identity_info(), "Selected initial player");
        self.state.replace(player.clone()).await;
        Ok(Some(player))
    }

    /// React to a change signal by making its sender current.
    ///
    /// Returns the player now selected because of the event, or `None` when
    /// the sender could not be resolved and the selection is unchanged.
    pub async fn on_change(&self, event: &ChangeEvent) -> Option<Player> {
        let player = match self.client.player_for_owner(&event.owner_id).await {
            Ok(Some(player)) => player,
            Ok(None) => {
                debug!(owner = %event.owner_id, "Change from unknown owner, keeping selection");
                return None;
            }
            Err(e) => {
                warn!(owner = %event.owner_id, "Owner lookup failed: {e}");
                return None;
            }
        };

        let previous = self.state.replace(player.clone()).await;
        if previous.as_ref().map(Player::bus_name) != Some(player.bus_name()) {
            info!(
                player = %player.identity_info(),
                properties = ?event.property_names(),
                "Switched current player"
            );
        }

        Some(player)
    }

    /// Make the first player whose bus name ends with `name` current.
    ///
    /// Returns `None` and leaves the selection alone if no player matches.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    #[instrument(skip(self))]
    pub async fn select_by_name(&self, name: &str) -> Result<Option<Player>, MediaError> {
        let Some(player) = self.client.find_player(name).await? else {
            return Ok(None);
        };

        info!(player = %player.identity_info(), "Player selected by request");
        self.state.replace(player.clone()).await;
        Ok(Some(player))
    }

    /// Bus names of every discoverable player.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    pub async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let players = self.client.list_players().await?;
        Ok(players
            .iter()
            .map(|player| player.bus_name().to_string())
            .collect())
    }

    /// Drain `events`, re-selecting on each one, until the stream ends
    pub async fn run(self, mut events: ChangeStream) {
        while let Some(event) = events.next().await {
            self.on_change(&event).await;
        }
        warn!("Player change stream ended");
    }
}
