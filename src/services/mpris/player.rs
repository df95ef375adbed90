use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use super::{
    APP_INTERFACE, BusTransport, ControlCall, LoopMode, MediaError, MetadataMap, PLAYER_INTERFACE,
    PlaybackState, PlayerIdentity, PropertyMap, TrackMetadata, Variant, VariantError,
};

/// Handle to one media player on the bus.
///
/// Holds nothing but the player's identity and a shared transport, so it is
/// cheap to clone and safe to share between tasks. Every method is one live
/// round trip; nothing is cached.
#[derive(Clone)]
pub struct Player {
    transport: Arc<dyn BusTransport>,
    identity: PlayerIdentity,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Create a handle bound to `identity`
    pub fn new(transport: Arc<dyn BusTransport>, identity: PlayerIdentity) -> Self {
        Self {
            transport,
            identity,
        }
    }

    /// Bus identity of the player
    pub fn identity_info(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Well-known bus name of the player
    pub fn bus_name(&self) -> &str {
        self.identity.bus_name()
    }

    /// Unique connection id owning the bus name
    pub fn owner_id(&self) -> &str {
        self.identity.owner_id()
    }

    /// Invoke a control method on the player.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn control(&self, call: &ControlCall) -> Result<(), MediaError> {
        self.transport.call(self.bus_name(), call).await
    }

    /// Start playback.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn play(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Play).await
    }

    /// Pause playback.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn pause(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Pause).await
    }

    /// Toggle between playing and paused.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn play_pause(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::PlayPause).await
    }

    /// Skip to the next track.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn next(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Next).await
    }

    /// Go back to the previous track.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn previous(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Previous).await
    }

    /// Stop playback.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn stop(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Stop).await
    }

    /// Open and play `uri`.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn open_uri(&self, uri: &str) -> Result<(), MediaError> {
        self.control(&ControlCall::OpenUri(uri.to_string())).await
    }

    /// Seek by `offset` microseconds; negative values seek backwards.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn seek(&self, offset: i64) -> Result<(), MediaError> {
        self.control(&ControlCall::Seek(offset)).await
    }

    /// Jump to `position` microseconds within the track `track_id`.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn set_position(&self, track_id: &str, position: i64) -> Result<(), MediaError> {
        self.control(&ControlCall::SetPosition {
            track_id: track_id.to_string(),
            position,
        })
        .await
    }

    /// Bring the player's window to the front.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn raise(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Raise).await
    }

    /// Ask the player to exit.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn quit(&self) -> Result<(), MediaError> {
        self.control(&ControlCall::Quit).await
    }

    /// Read one property.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the value cannot be decoded
    pub async fn get(&self, interface: &str, property: &str) -> Result<Variant, MediaError> {
        self.transport
            .get_property(self.bus_name(), interface, property)
            .await
    }

    /// Read every property of `interface`.
    ///
    /// # Errors
    /// Returns error if the remote call fails
    pub async fn get_all(&self, interface: &str) -> Result<PropertyMap, MediaError> {
        self.transport
            .get_all_properties(self.bus_name(), interface)
            .await
    }

    /// Write one property.
    ///
    /// # Errors
    /// Returns error if the remote call fails or the value cannot be encoded
    pub async fn set(
        &self,
        interface: &str,
        property: &str,
        value: Variant,
    ) -> Result<(), MediaError> {
        self.transport
            .set_property(self.bus_name(), interface, property, value)
            .await
    }

    async fn read_or_default<T, F>(&self, interface: &str, property: &str, decode: F) -> T
    where
        T: Default,
        F: FnOnce(&Variant) -> Result<T, VariantError>,
    {
        let value = match self.get(interface, property).await {
            Ok(value) => value,
            Err(e) => {
                debug!(player = %self.identity, property, "Read failed: {e}");
                return T::default();
            }
        };

        decode(&value).unwrap_or_else(|e| {
            debug!(player = %self.identity, property, "Unexpected value: {e}");
            T::default()
        })
    }

    async fn flag(&self, interface: &str, property: &str) -> bool {
        self.read_or_default(interface, property, Variant::as_bool)
            .await
    }

    async fn text(&self, interface: &str, property: &str) -> String {
        self.read_or_default(interface, property, |value| {
            value.as_str().map(str::to_string)
        })
        .await
    }

    async fn write<T>(&self, interface: &str, property: &str, value: T) -> T
    where
        T: Clone + Into<Variant>,
    {
        if let Err(e) = self.set(interface, property, value.clone().into()).await {
            warn!(player = %self.identity, property, "Write failed: {e}");
        }
        value
    }

    /// Current playback state; `Unsupported` when unreadable
    pub async fn playback_status(&self) -> PlaybackState {
        let status = self.text(PLAYER_INTERFACE, "PlaybackStatus").await;
        PlaybackState::from(status.as_str())
    }

    /// Current loop mode; `Unsupported` when unreadable
    pub async fn loop_status(&self) -> LoopMode {
        let status = self.text(PLAYER_INTERFACE, "LoopStatus").await;
        LoopMode::from(status.as_str())
    }

    /// Whether shuffle is enabled
    pub async fn shuffle(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "Shuffle").await
    }

    /// Playback rate
    pub async fn rate(&self) -> f64 {
        self.read_or_default(PLAYER_INTERFACE, "Rate", Variant::as_f64)
            .await
    }

    /// Volume level, 1.0 being full volume
    pub async fn volume(&self) -> f64 {
        self.read_or_default(PLAYER_INTERFACE, "Volume", Variant::as_f64)
            .await
    }

    /// Position within the current track in microseconds
    pub async fn position(&self) -> i64 {
        self.read_or_default(PLAYER_INTERFACE, "Position", Variant::as_i64)
            .await
    }

    /// Lowest supported playback rate
    pub async fn minimum_rate(&self) -> f64 {
        self.read_or_default(PLAYER_INTERFACE, "MinimumRate", Variant::as_f64)
            .await
    }

    /// Highest supported playback rate
    pub async fn maximum_rate(&self) -> f64 {
        self.read_or_default(PLAYER_INTERFACE, "MaximumRate", Variant::as_f64)
            .await
    }

    /// Human readable name of the player application
    pub async fn identity(&self) -> String {
        self.text(APP_INTERFACE, "Identity").await
    }

    /// Basename of the player's desktop entry
    pub async fn desktop_entry(&self) -> String {
        self.text(APP_INTERFACE, "DesktopEntry").await
    }

    /// Whether the player can be raised
    pub async fn can_raise(&self) -> bool {
        self.flag(APP_INTERFACE, "CanRaise").await
    }

    /// Whether the player can be asked to quit
    pub async fn can_quit(&self) -> bool {
        self.flag(APP_INTERFACE, "CanQuit").await
    }

    /// Whether fullscreen can be toggled
    pub async fn can_set_fullscreen(&self) -> bool {
        self.flag(APP_INTERFACE, "CanSetFullscreen").await
    }

    /// Whether the player exposes a track list
    pub async fn has_track_list(&self) -> bool {
        self.flag(APP_INTERFACE, "HasTrackList").await
    }

    /// Whether the player is fullscreen
    pub async fn fullscreen(&self) -> bool {
        self.flag(APP_INTERFACE, "Fullscreen").await
    }

    /// Whether seeking is supported
    pub async fn can_seek(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanSeek").await
    }

    /// Whether the player accepts control at all
    pub async fn can_control(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanControl").await
    }

    /// Whether playback can be started
    pub async fn can_play(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanPlay").await
    }

    /// Whether playback can be paused
    pub async fn can_pause(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanPause").await
    }

    /// Whether there is a next track
    pub async fn can_go_next(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanGoNext").await
    }

    /// Whether there is a previous track
    pub async fn can_go_previous(&self) -> bool {
        self.flag(PLAYER_INTERFACE, "CanGoPrevious").await
    }

    /// URI schemes the player can open
    pub async fn supported_uri_schemes(&self) -> Vec<String> {
        self.read_or_default(APP_INTERFACE, "SupportedUriSchemes", Variant::to_string_list)
            .await
    }

    /// MIME types the player can open
    pub async fn supported_mime_types(&self) -> Vec<String> {
        self.read_or_default(APP_INTERFACE, "SupportedMimeTypes", Variant::to_string_list)
            .await
    }

    /// Metadata of the current track exactly as the player reports it
    pub async fn raw_metadata(&self) -> MetadataMap {
        self.read_or_default(PLAYER_INTERFACE, "Metadata", |value| {
            value.as_dict().cloned()
        })
        .await
    }

    /// Decoded metadata of the current track
    pub async fn track(&self) -> TrackMetadata {
        TrackMetadata::from(&self.raw_metadata().await)
    }

    /// Enable or disable shuffle; returns the requested value
    pub async fn set_shuffle(&self, shuffle: bool) -> bool {
        self.write(PLAYER_INTERFACE, "Shuffle", shuffle).await
    }

    /// Change the playback rate; returns the requested value
    pub async fn set_rate(&self, rate: f64) -> f64 {
        self.write(PLAYER_INTERFACE, "Rate", rate).await
    }

    /// Change the volume; returns the requested value
    pub async fn set_volume(&self, volume: f64) -> f64 {
        self.write(PLAYER_INTERFACE, "Volume", volume).await
    }

    /// Enter or leave fullscreen; returns the requested value
    pub async fn set_fullscreen(&self, fullscreen: bool) -> bool {
        self.write(APP_INTERFACE, "Fullscreen", fullscreen).await
    }
}
