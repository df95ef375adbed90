use std::sync::Arc;

use tracing::{debug, instrument};

use super::{BUS_NAME_PREFIX, BusTransport, ChangeStream, MediaError, Player, PlayerIdentity};

/// Discovers media players on the bus and hands out [`Player`] handles.
///
/// Nothing is cached: every lookup reflects the bus at call time.
#[derive(Clone)]
pub struct MprisClient {
    transport: Arc<dyn BusTransport>,
    ignored: Arc<Vec<String>>,
    excluded: Arc<Vec<String>>,
}

impl MprisClient {
    /// Create a client over `transport`
    pub fn new(transport: Arc<dyn BusTransport>) -> Self {
        Self {
            transport,
            ignored: Arc::new(Vec::new()),
            excluded: Arc::new(Vec::new()),
        }
    }

    /// Skip every player whose bus name contains one of `patterns`
    #[must_use]
    pub fn ignoring<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored = Arc::new(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Skip the players whose bus name is exactly one of `names`
    #[must_use]
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = Arc::new(names.into_iter().map(Into::into).collect());
        self
    }

    /// Shared transport the handles are bound to
    pub fn transport(&self) -> Arc<dyn BusTransport> {
        Arc::clone(&self.transport)
    }

    fn is_ignored(&self, bus_name: &str) -> bool {
        self.excluded.iter().any(|name| name == bus_name)
            || self
                .ignored
                .iter()
                .any(|pattern| bus_name.contains(pattern.as_str()))
    }

    /// Every player currently on the bus, in enumeration order.
    ///
    /// Players that vanish between listing and owner lookup are skipped.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<Vec<Player>, MediaError> {
        let names = self.transport.list_names().await?;
        let mut players = Vec::new();

        for name in names {
            if !name.starts_with(BUS_NAME_PREFIX) || self.is_ignored(&name) {
                continue;
            }

            match self.transport.name_owner(&name).await {
                Ok(owner) => players.push(Player::new(
                    Arc::clone(&self.transport),
                    PlayerIdentity::new(name, owner),
                )),
                Err(e) => debug!("Skipping {name}: {e}"),
            }
        }

        Ok(players)
    }

    /// First player whose bus name ends with `suffix`.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    pub async fn find_player(&self, suffix: &str) -> Result<Option<Player>, MediaError> {
        let players = self.list_players().await?;
        Ok(players
            .into_iter()
            .find(|player| player.bus_name().ends_with(suffix)))
    }

    /// Player whose bus name is currently owned by `owner_id`.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    pub async fn player_for_owner(&self, owner_id: &str) -> Result<Option<Player>, MediaError> {
        let players = self.list_players().await?;
        Ok(players
            .into_iter()
            .find(|player| player.owner_id() == owner_id))
    }

    /// Stream of property change notifications from every player.
    ///
    /// # Errors
    /// Returns `Subscription` if the signal filter cannot be registered
    pub async fn subscribe_player_changes(&self) -> Result<ChangeStream, MediaError> {
        self.transport.subscribe_player_changes().await
    }
}
