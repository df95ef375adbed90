use std::collections::BTreeMap;

/// Glyph for Spotify
pub const SPOTIFY_ICON: char = '\u{f1bc}';
/// Glyph for Firefox
pub const FIREFOX_ICON: char = '\u{e007}';
/// Glyph for Chrome
pub const CHROME_ICON: char = '\u{f268}';
/// Glyph for every other player
pub const DEFAULT_ICON: char = '\u{f001}';

/// Built-in glyph for a player identity
pub fn builtin_icon(identity: &str) -> char {
    match identity {
        "Spotify" => SPOTIFY_ICON,
        "Mozilla Firefox" => FIREFOX_ICON,
        "Chrome" => CHROME_ICON,
        _ => DEFAULT_ICON,
    }
}

/// Icon lookup with user overrides layered over the built-in glyphs
#[derive(Debug, Clone, Default)]
pub struct IconTable {
    overrides: BTreeMap<String, String>,
}

impl IconTable {
    /// Create a table consulting `overrides` first
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Icon for the player identity
    pub fn lookup(&self, identity: &str) -> String {
        self.overrides
            .get(identity)
            .cloned()
            .unwrap_or_else(|| builtin_icon(identity).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_players_get_their_glyph() {
        assert_eq!(builtin_icon("Spotify"), SPOTIFY_ICON);
        assert_eq!(builtin_icon("Mozilla Firefox"), FIREFOX_ICON);
        assert_eq!(builtin_icon("Chrome"), CHROME_ICON);
        assert_eq!(builtin_icon("VLC media player"), DEFAULT_ICON);
        assert_eq!(builtin_icon(""), DEFAULT_ICON);
    }

    #[test]
    fn overrides_win_over_builtins() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Spotify".to_string(), "S".to_string());
        overrides.insert("mpv".to_string(), "M".to_string());
        let icons = IconTable::new(overrides);

        assert_eq!(icons.lookup("Spotify"), "S");
        assert_eq!(icons.lookup("mpv"), "M");
        assert_eq!(icons.lookup("Chrome"), CHROME_ICON.to_string());
    }
}
