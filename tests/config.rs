//! Integration tests for configuration loading.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::fs;

use musicwand::{
    MusicwandError,
    config::{Config, DEFAULT_STATUS_FORMAT},
    services::aggregator::OnEmpty,
};
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

mod loading {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();

        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_path_is_used() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
            [daemon]
            service_suffix = "wand2"
            on_empty = "idle"
            ignored_players = ["chromium", "kdeconnect"]
            autostart_attempts = 5
            autostart_interval_ms = 200

            [status]
            format = "{track} - {artist}"

            [status.icons]
            mpv = "M"
            "#,
        );

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.daemon.service_name(), "org.mpris.MediaPlayer2.wand2");
        assert_eq!(config.daemon.on_empty, OnEmpty::Idle);
        assert_eq!(config.daemon.autostart_attempts, 5);
        assert_eq!(config.daemon.autostart_interval().as_millis(), 200);
        assert_eq!(
            config.daemon.ignored_players,
            vec!["chromium".to_string(), "kdeconnect".to_string()]
        );
        assert_eq!(config.status.format, "{track} - {artist}");
        assert_eq!(config.status.icons.get("mpv").map(String::as_str), Some("M"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.status.format, DEFAULT_STATUS_FORMAT);
        assert_eq!(config.daemon.on_empty, OnEmpty::Fail);
    }
}

mod errors {
    use super::*;

    #[test]
    fn invalid_toml_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[daemon\nservice_suffix = ");

        let error = Config::load_from(&path).unwrap_err();

        assert!(matches!(error, MusicwandError::TomlParse(_)));
        assert!(error.to_string().contains("config.toml"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "[daemon]\nautostart_attempts = \"three\"\n");

        assert!(matches!(
            Config::load_from(&path),
            Err(MusicwandError::TomlParse(_))
        ));
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("config.toml");
        fs::create_dir(&dir).unwrap();

        assert!(matches!(
            Config::load_from(&dir),
            Err(MusicwandError::Io(_))
        ));
    }
}
