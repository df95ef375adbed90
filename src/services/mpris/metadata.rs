use std::time::Duration;

use super::variant::MetadataMap;

/// Metadata key of the track identifier
pub const TRACK_ID_KEY: &str = "mpris:trackid";
/// Metadata key of the track length in microseconds
pub const LENGTH_KEY: &str = "mpris:length";
/// Metadata key of the artwork URL
pub const ART_URL_KEY: &str = "mpris:artUrl";
/// Metadata key of the track title
pub const TITLE_KEY: &str = "xesam:title";
/// Metadata key of the track artists
pub const ARTIST_KEY: &str = "xesam:artist";
/// Metadata key of the album name
pub const ALBUM_KEY: &str = "xesam:album";

/// Metadata information for a music track
///
/// Every field is optional in practice; missing or oddly typed entries
/// decode to empty values instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,

    /// Track artists, in the order the player reported them
    pub artists: Vec<String>,

    /// Album name; the first entry when a player reports a list
    pub album: String,

    /// URL to album artwork image
    pub art_url: Option<String>,

    /// Track duration
    pub length: Option<Duration>,

    /// MPRIS track identifier
    pub track_id: Option<String>,
}

impl TrackMetadata {
    /// First reported artist, or an empty string
    pub fn artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or_default()
    }

    /// Track length in microseconds, if the player reported one
    pub fn length_micros(&self) -> Option<i64> {
        self.length.map(super::utils::to_mpris_micros)
    }
}

impl From<&MetadataMap> for TrackMetadata {
    fn from(metadata: &MetadataMap) -> Self {
        let string = |key: &str| {
            metadata
                .get(key)
                .and_then(|value| value.as_str().ok())
                .map(str::to_string)
        };

        let list = |key: &str| {
            metadata
                .get(key)
                .and_then(|value| value.to_string_list().ok())
                .unwrap_or_default()
        };

        let length = metadata
            .get(LENGTH_KEY)
            .and_then(|value| value.as_i64().ok())
            .and_then(|micros| u64::try_from(micros).ok())
            .filter(|micros| *micros > 0)
            .map(Duration::from_micros);

        Self {
            title: string(TITLE_KEY).unwrap_or_default(),
            artists: list(ARTIST_KEY),
            album: list(ALBUM_KEY).into_iter().next().unwrap_or_default(),
            art_url: string(ART_URL_KEY),
            length,
            track_id: string(TRACK_ID_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mpris::Variant;

    fn sample() -> MetadataMap {
        let mut map = MetadataMap::new();
        map.insert(TITLE_KEY.to_string(), Variant::from("Get Lucky"));
        map.insert(
            ARTIST_KEY.to_string(),
            Variant::StrList(vec!["Daft Punk".to_string(), "Pharrell".to_string()]),
        );
        map.insert(ALBUM_KEY.to_string(), Variant::from("Random Access Memories"));
        map.insert(LENGTH_KEY.to_string(), Variant::UInt64(248_000_000));
        map.insert(
            TRACK_ID_KEY.to_string(),
            Variant::ObjectPath("/org/mpris/MediaPlayer2/Track/1".to_string()),
        );
        map
    }

    #[test]
    fn decodes_complete_metadata() {
        let track = TrackMetadata::from(&sample());

        assert_eq!(track.title, "Get Lucky");
        assert_eq!(track.artist(), "Daft Punk");
        assert_eq!(track.album, "Random Access Memories");
        assert_eq!(track.length, Some(Duration::from_secs(248)));
        assert_eq!(
            track.track_id.as_deref(),
            Some("/org/mpris/MediaPlayer2/Track/1")
        );
        assert_eq!(track.art_url, None);
    }

    #[test]
    fn missing_keys_decode_to_empty_values() {
        let track = TrackMetadata::from(&MetadataMap::new());

        assert_eq!(track, TrackMetadata::default());
        assert_eq!(track.artist(), "");
        assert_eq!(track.length_micros(), None);
    }

    #[test]
    fn oddly_typed_entries_are_ignored() {
        let mut map = sample();
        map.insert(TITLE_KEY.to_string(), Variant::Int32(5));
        map.insert(LENGTH_KEY.to_string(), Variant::Int64(-1));

        let track = TrackMetadata::from(&map);

        assert_eq!(track.title, "");
        assert_eq!(track.length, None);
    }

    #[test]
    fn album_lists_use_their_first_entry() {
        let mut map = MetadataMap::new();
        map.insert(
            ALBUM_KEY.to_string(),
            Variant::StrList(vec!["Discovery".to_string(), "Alive".to_string()]),
        );

        assert_eq!(TrackMetadata::from(&map).album, "Discovery");
    }

    #[test]
    fn single_string_artist_is_accepted() {
        let mut map = MetadataMap::new();
        map.insert(ARTIST_KEY.to_string(), Variant::from("Solo Artist"));

        assert_eq!(TrackMetadata::from(&map).artist(), "Solo Artist");
    }
}
