use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{ControlCall, MediaError, PropertyMap, Variant};

/// "Some property changed on some player" notification.
///
/// Signals only identify their sender by unique connection id, so this is
/// all the bus tells us about who changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Unique connection id of the player that emitted the signal
    pub owner_id: String,

    /// Interface whose properties changed
    pub interface: String,

    /// Changed properties with their new values
    pub changed: PropertyMap,

    /// Properties invalidated without a new value
    pub invalidated: Vec<String>,
}

impl ChangeEvent {
    /// Event carrying only the originating owner id
    pub fn from_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            interface: String::new(),
            changed: PropertyMap::new(),
            invalidated: Vec::new(),
        }
    }

    /// Names of every property mentioned by the event
    pub fn property_names(&self) -> Vec<&str> {
        self.changed
            .keys()
            .map(String::as_str)
            .chain(self.invalidated.iter().map(String::as_str))
            .collect()
    }
}

/// Long-lived stream of change events; ends only when the bus connection drops
pub type ChangeStream = BoxStream<'static, ChangeEvent>;

/// The slice of the message bus the player client relies on.
///
/// Every call is one round trip against the bus; implementations keep no
/// state about players between calls.
#[async_trait]
pub trait BusTransport: Send + Sync {
    /// List every name currently registered on the bus.
    ///
    /// # Errors
    /// Returns error if the bus daemon cannot be queried
    async fn list_names(&self) -> Result<Vec<String>, MediaError>;

    /// Resolve a well-known name to its unique connection id.
    ///
    /// # Errors
    /// Returns `ServiceNotFound` if the name has no owner
    async fn name_owner(&self, name: &str) -> Result<String, MediaError>;

    /// Invoke a control method on `destination`.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    async fn call(&self, destination: &str, call: &ControlCall) -> Result<(), MediaError>;

    /// Read one property of `destination`.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the value cannot be decoded
    async fn get_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
    ) -> Result<Variant, MediaError>;

    /// Read every property `destination` exposes on `interface`.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    async fn get_all_properties(
        &self,
        destination: &str,
        interface: &str,
    ) -> Result<PropertyMap, MediaError>;

    /// Write one property of `destination`.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the value cannot be encoded
    async fn set_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
        value: Variant,
    ) -> Result<(), MediaError>;

    /// Register a filter for property changes on the MPRIS object path.
    ///
    /// # Errors
    /// Returns `Subscription` if the filter cannot be registered
    async fn subscribe_player_changes(&self) -> Result<ChangeStream, MediaError>;
}
