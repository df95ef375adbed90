//! Integration tests for current-player selection.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod common;

use std::time::Duration;

use common::{MPV, MPV_OWNER, MockBus, SPOTIFY, SPOTIFY_OWNER, client, two_players};
use musicwand::services::{
    aggregator::{AggregatorState, DaemonError, OnEmpty, Selector},
    mpris::{ChangeEvent, Variant},
};

fn selector(bus: &std::sync::Arc<MockBus>) -> Selector {
    Selector::new(client(bus), AggregatorState::new())
}

mod initial_selection {
    use super::*;

    #[tokio::test]
    async fn prefers_the_playing_player() {
        let bus = two_players();
        let selector = selector(&bus);

        let selected = selector.select_initial(OnEmpty::Fail).await.unwrap();

        assert_eq!(selected.unwrap().bus_name(), MPV);
        assert_eq!(selector.state().current_name().await, MPV);
    }

    #[tokio::test]
    async fn falls_back_to_the_first_player() {
        let bus = MockBus::new();
        bus.add_player(SPOTIFY, SPOTIFY_OWNER, "Paused", "Spotify");
        bus.add_player(MPV, MPV_OWNER, "Stopped", "mpv");
        let selector = selector(&bus);

        selector.select_initial(OnEmpty::Fail).await.unwrap();

        assert_eq!(selector.state().current_name().await, SPOTIFY);
    }

    #[tokio::test]
    async fn non_player_names_are_never_selected() {
        let bus = MockBus::new();
        bus.add_name("org.freedesktop.Notifications");
        bus.add_player(MPV, MPV_OWNER, "Paused", "mpv");
        let selector = selector(&bus);

        selector.select_initial(OnEmpty::Fail).await.unwrap();

        assert_eq!(selector.state().current_name().await, MPV);
    }

    #[tokio::test]
    async fn empty_bus_fails_by_default() {
        let bus = MockBus::new();
        let selector = selector(&bus);

        let result = selector.select_initial(OnEmpty::Fail).await;

        assert!(matches!(result, Err(DaemonError::NoPlayers)));
        assert_eq!(selector.state().current_name().await, "");
    }

    #[tokio::test]
    async fn empty_bus_idles_when_configured() {
        let bus = MockBus::new();
        let selector = selector(&bus);

        let selected = selector.select_initial(OnEmpty::Idle).await.unwrap();

        assert!(selected.is_none());
        assert!(selector.state().current().await.is_none());
    }

    #[tokio::test]
    async fn ignored_players_are_skipped() {
        let bus = two_players();
        let selector = Selector::new(
            client(&bus).ignoring(["mpv"]),
            AggregatorState::new(),
        );

        selector.select_initial(OnEmpty::Fail).await.unwrap();

        assert_eq!(selector.state().current_name().await, SPOTIFY);
    }

    #[tokio::test]
    async fn only_the_exact_excluded_name_is_skipped() {
        let bus = MockBus::new();
        bus.add_player(
            "org.mpris.MediaPlayer2.musicwand",
            ":1.5",
            "Playing",
            "musicwand",
        );
        bus.add_player(
            "org.mpris.MediaPlayer2.musicwand2",
            ":1.6",
            "Paused",
            "musicwand2",
        );
        let client = client(&bus).excluding(["org.mpris.MediaPlayer2.musicwand"]);

        let names: Vec<String> = client
            .list_players()
            .await
            .unwrap()
            .iter()
            .map(|player| player.bus_name().to_string())
            .collect();

        assert_eq!(names, vec!["org.mpris.MediaPlayer2.musicwand2".to_string()]);
    }
}

mod change_events {
    use super::*;

    #[tokio::test]
    async fn any_change_makes_its_sender_current() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        let mut event = ChangeEvent::from_owner(SPOTIFY_OWNER);
        event
            .changed
            .insert("Volume".to_string(), Variant::from(0.3));
        let selected = selector.on_change(&event).await;

        assert_eq!(selected.unwrap().bus_name(), SPOTIFY);
        assert_eq!(selector.state().current_name().await, SPOTIFY);
    }

    #[tokio::test]
    async fn repeated_events_are_idempotent() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        let event = ChangeEvent::from_owner(SPOTIFY_OWNER);
        selector.on_change(&event).await;
        let first = selector.state().current().await.unwrap();
        selector.on_change(&event).await;
        let second = selector.state().current().await.unwrap();

        assert_eq!(first.identity_info(), second.identity_info());
    }

    #[tokio::test]
    async fn unknown_owner_keeps_the_selection() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        let selected = selector.on_change(&ChangeEvent::from_owner(":1.999")).await;

        assert!(selected.is_none());
        assert_eq!(selector.state().current_name().await, MPV);
    }

    #[tokio::test]
    async fn idle_daemon_picks_up_the_first_player_that_changes() {
        let bus = MockBus::new();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Idle).await.unwrap();

        bus.add_player(SPOTIFY, SPOTIFY_OWNER, "Playing", "Spotify");
        selector.on_change(&ChangeEvent::from_owner(SPOTIFY_OWNER)).await;

        assert_eq!(selector.state().current_name().await, SPOTIFY);
    }

    #[tokio::test]
    async fn run_applies_events_from_the_stream() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        let events = client(&bus).subscribe_player_changes().await.unwrap();
        let task = tokio::spawn(selector.clone().run(events));

        bus.emit_change(SPOTIFY_OWNER, "PlaybackStatus", Variant::from("Playing"));

        let mut switched = false;
        for _ in 0..50 {
            if selector.state().current_name().await == SPOTIFY {
                switched = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(switched);

        bus.disconnect();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}

mod select_by_name {
    use super::*;

    #[tokio::test]
    async fn full_name_or_suffix_selects_the_player() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        selector.select_by_name(SPOTIFY).await.unwrap().unwrap();
        assert_eq!(selector.state().current_name().await, SPOTIFY);

        selector.select_by_name("mpv").await.unwrap().unwrap();
        assert_eq!(selector.state().current_name().await, MPV);
    }

    #[tokio::test]
    async fn missing_player_leaves_selection_alone() {
        let bus = two_players();
        let selector = selector(&bus);
        selector.select_initial(OnEmpty::Fail).await.unwrap();

        let selected = selector.select_by_name("vlc").await.unwrap();

        assert!(selected.is_none());
        assert_eq!(selector.state().current_name().await, MPV);
    }

    #[tokio::test]
    async fn list_names_reports_every_player() {
        let bus = two_players();
        let selector = selector(&bus);

        assert_eq!(
            selector.list_names().await.unwrap(),
            vec![SPOTIFY.to_string(), MPV.to_string()]
        );
    }
}
