//! Integration tests for resolving the player a client command targets.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod common;

use std::time::Duration;

use common::{MPV, MockBus, client, two_players};
use musicwand::{
    cli::{
        CliError,
        connect::{find_daemon, resolve_target, wait_for_daemon},
    },
    config::DaemonConfig,
};

const DAEMON: &str = "org.mpris.MediaPlayer2.musicwand";

mod daemon_lookup {
    use super::*;

    #[tokio::test]
    async fn daemon_is_found_by_exact_name() {
        let bus = two_players();
        bus.add_player(DAEMON, ":1.99", "Playing", "musicwand");

        let daemon = find_daemon(&client(&bus), DAEMON).await.unwrap();

        assert_eq!(daemon.unwrap().bus_name(), DAEMON);
    }

    #[tokio::test]
    async fn similar_names_are_not_the_daemon() {
        let bus = MockBus::new();
        bus.add_player("org.mpris.MediaPlayer2.notmusicwand", ":1.5", "Playing", "x");

        assert!(find_daemon(&client(&bus), DAEMON).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn polling_gives_up_after_the_configured_attempts() {
        let bus = two_players();

        let daemon = wait_for_daemon(&client(&bus), DAEMON, 3, Duration::ZERO)
            .await
            .unwrap();

        assert!(daemon.is_none());
    }

    #[tokio::test]
    async fn polling_returns_once_the_daemon_appears() {
        let bus = two_players();
        let poller = {
            let client = client(&bus);
            tokio::spawn(async move {
                wait_for_daemon(&client, DAEMON, 50, Duration::from_millis(10)).await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        bus.add_player(DAEMON, ":1.99", "Stopped", "musicwand");

        let daemon = poller.await.unwrap().unwrap();
        assert_eq!(daemon.unwrap().bus_name(), DAEMON);
    }
}

mod explicit_player {
    use super::*;

    #[tokio::test]
    async fn player_flag_bypasses_the_daemon() {
        let bus = two_players();

        let target = resolve_target(&client(&bus), &DaemonConfig::default(), None, Some("mpv"))
            .await
            .unwrap();

        assert_eq!(target.bus_name(), MPV);
    }

    #[tokio::test]
    async fn unknown_player_is_reported() {
        let bus = two_players();

        let error = resolve_target(&client(&bus), &DaemonConfig::default(), None, Some("vlc"))
            .await
            .unwrap_err();

        assert!(matches!(error, CliError::PlayerNotFound(ref name) if name == "vlc"));
    }

    #[tokio::test]
    async fn running_daemon_is_the_default_target() {
        let bus = two_players();
        bus.add_player(DAEMON, ":1.99", "Playing", "musicwand");

        let target = resolve_target(&client(&bus), &DaemonConfig::default(), None, None)
            .await
            .unwrap();

        assert_eq!(target.bus_name(), DAEMON);
    }
}
