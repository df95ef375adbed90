use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::mpris::Player;

/// Holds the player every forwarded call is routed to.
///
/// Clones share the same slot. Readers take a snapshot with
/// [`current`](Self::current) once per call and use it throughout, so a
/// concurrent re-selection never splits one call across two players.
#[derive(Debug, Clone, Default)]
pub struct AggregatorState {
    current: Arc<RwLock<Option<Player>>>,
}

impl AggregatorState {
    /// Create an empty state with no player selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the selected player
    pub async fn current(&self) -> Option<Player> {
        self.current.read().await.clone()
    }

    /// Bus name of the selected player, or an empty string
    pub async fn current_name(&self) -> String {
        self.current
            .read()
            .await
            .as_ref()
            .map(|player| player.bus_name().to_string())
            .unwrap_or_default()
    }

    /// Swap in a new selection, returning the previous one
    pub(crate) async fn replace(&self, player: Player) -> Option<Player> {
        self.current.write().await.replace(player)
    }
}
