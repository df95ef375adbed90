use std::fmt;

/// Object path every MPRIS player exports its interfaces on
pub const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Application-level MPRIS interface
pub const APP_INTERFACE: &str = "org.mpris.MediaPlayer2";

/// Playback-level MPRIS interface
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Prefix shared by the bus names of all MPRIS players
pub const BUS_NAME_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Standard property interface
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Standard introspection interface
pub const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// Standard peer interface
pub const PEER_INTERFACE: &str = "org.freedesktop.DBus.Peer";

/// Bus identity of one media player.
///
/// `bus_name` is the advertised well-known name and stays stable for one
/// launch of the application. `owner_id` is the unique connection name
/// (`:1.42`) which changes when the application restarts. Change signals
/// only carry the owner id, so both are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerIdentity {
    bus_name: String,
    owner_id: String,
}

impl PlayerIdentity {
    /// Create an identity from a bus name and its current owner
    pub fn new(bus_name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            bus_name: bus_name.into(),
            owner_id: owner_id.into(),
        }
    }

    /// Get the D-Bus bus name
    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    /// Get the unique connection id owning the bus name
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.bus_name, self.owner_id)
    }
}

/// Current playback state of a media player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// Player is stopped
    Stopped,

    /// Player did not report a recognised status
    Unsupported,
}

impl From<&str> for PlaybackState {
    fn from(status: &str) -> Self {
        match status {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            "Stopped" => Self::Stopped,
            _ => Self::Unsupported,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Unsupported => "Unsupported",
        };
        f.write_str(status)
    }
}

/// Loop mode for track or playlist repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// No looping
    None,

    /// Loop current track
    Track,

    /// Loop entire playlist
    Playlist,

    /// Loop mode not supported by player
    Unsupported,
}

impl From<&str> for LoopMode {
    fn from(status: &str) -> Self {
        match status {
            "None" => Self::None,
            "Track" => Self::Track,
            "Playlist" => Self::Playlist,
            _ => Self::Unsupported,
        }
    }
}

/// A control method of the MPRIS protocol together with its arguments.
///
/// All of them return nothing on success.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCall {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    PlayPause,
    /// Skip to next track
    Next,
    /// Skip to previous track
    Previous,
    /// Stop playback
    Stop,
    /// Open and play a URI
    OpenUri(String),
    /// Seek by a relative offset in microseconds
    Seek(i64),
    /// Set the absolute position of a track in microseconds
    SetPosition {
        /// Object path identifying the track
        track_id: String,
        /// Absolute position in microseconds
        position: i64,
    },
    /// Bring the player's window to the front
    Raise,
    /// Ask the player to exit
    Quit,
}

impl ControlCall {
    /// Interface the method belongs to
    pub fn interface(&self) -> &'static str {
        match self {
            Self::Raise | Self::Quit => APP_INTERFACE,
            _ => PLAYER_INTERFACE,
        }
    }

    /// Bus member name of the method
    pub fn member(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::PlayPause => "PlayPause",
            Self::Next => "Next",
            Self::Previous => "Previous",
            Self::Stop => "Stop",
            Self::OpenUri(_) => "OpenUri",
            Self::Seek(_) => "Seek",
            Self::SetPosition { .. } => "SetPosition",
            Self::Raise => "Raise",
            Self::Quit => "Quit",
        }
    }

    /// Looks up an argument-less control method by interface and member.
    ///
    /// Methods carrying arguments are decoded by the caller since their
    /// arguments come from the message body.
    pub fn without_args(interface: &str, member: &str) -> Option<Self> {
        let call = match (interface, member) {
            (PLAYER_INTERFACE, "Play") => Self::Play,
            (PLAYER_INTERFACE, "Pause") => Self::Pause,
            (PLAYER_INTERFACE, "PlayPause") => Self::PlayPause,
            (PLAYER_INTERFACE, "Next") => Self::Next,
            (PLAYER_INTERFACE, "Previous") => Self::Previous,
            (PLAYER_INTERFACE, "Stop") => Self::Stop,
            (APP_INTERFACE, "Raise") => Self::Raise,
            (APP_INTERFACE, "Quit") => Self::Quit,
            _ => return None,
        };
        Some(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_state_parses_known_statuses() {
        assert_eq!(PlaybackState::from("Playing"), PlaybackState::Playing);
        assert_eq!(PlaybackState::from("Paused"), PlaybackState::Paused);
        assert_eq!(PlaybackState::from("Stopped"), PlaybackState::Stopped);
    }

    #[test]
    fn playback_state_falls_back_to_unsupported() {
        assert_eq!(PlaybackState::from(""), PlaybackState::Unsupported);
        assert_eq!(PlaybackState::from("playing"), PlaybackState::Unsupported);
    }

    #[test]
    fn control_calls_route_to_their_interface() {
        assert_eq!(ControlCall::Raise.interface(), APP_INTERFACE);
        assert_eq!(ControlCall::Quit.interface(), APP_INTERFACE);
        assert_eq!(ControlCall::Seek(5).interface(), PLAYER_INTERFACE);
        assert_eq!(
            ControlCall::SetPosition {
                track_id: "/track/1".to_string(),
                position: 0
            }
            .member(),
            "SetPosition"
        );
    }

    #[test]
    fn without_args_rejects_methods_on_the_wrong_interface() {
        assert_eq!(
            ControlCall::without_args(PLAYER_INTERFACE, "PlayPause"),
            Some(ControlCall::PlayPause)
        );
        assert_eq!(ControlCall::without_args(APP_INTERFACE, "Play"), None);
        assert_eq!(ControlCall::without_args(PLAYER_INTERFACE, "Seek"), None);
    }
}
