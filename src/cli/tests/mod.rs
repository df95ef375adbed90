//! Unit tests for CLI module
//!
//! Tests argument parsing and output formatting.
//! No bus connection or actual command execution.

use clap::Parser;

use crate::cli::{
    Cli, CliError, Commands,
    formatting::{format_change, format_metadata, format_player_entry, format_variant},
};
use crate::{
    MusicwandError,
    services::{
        aggregator::DaemonError,
        mpris::{ChangeEvent, MediaError, MetadataMap, Variant},
    },
};

#[test]
fn format_variant_scalars() {
    assert_eq!(format_variant(&Variant::Bool(true)), "true");
    assert_eq!(format_variant(&Variant::Int64(-12)), "-12");
    assert_eq!(format_variant(&Variant::UInt32(7)), "7");
    assert_eq!(format_variant(&Variant::Byte(7)), "7");
    assert_eq!(format_variant(&Variant::Signature("a{sv}".to_string())), "a{sv}");
    assert_eq!(format_variant(&Variant::Double(0.5)), "0.5");
    assert_eq!(
        format_variant(&Variant::ObjectPath("/org/mpris/track/1".to_string())),
        "/org/mpris/track/1"
    );
}

#[test]
fn format_variant_lists_are_comma_separated() {
    let artists = Variant::StrList(vec!["Daft Punk".to_string(), "Pharrell".to_string()]);
    assert_eq!(format_variant(&artists), "Daft Punk, Pharrell");

    let mixed = Variant::List(vec![Variant::Int32(1), Variant::Str("two".to_string())]);
    assert_eq!(format_variant(&mixed), "1, two");
}

#[test]
fn metadata_lines_are_sorted_by_key() {
    let mut metadata = MetadataMap::new();
    metadata.insert("xesam:title".to_string(), Variant::from("Get Lucky"));
    metadata.insert("mpris:length".to_string(), Variant::Int64(248_000_000));
    metadata.insert(
        "xesam:artist".to_string(),
        Variant::StrList(vec!["Daft Punk".to_string()]),
    );

    assert_eq!(
        format_metadata(&metadata),
        "mpris:length\t248000000\nxesam:artist\tDaft Punk\nxesam:title\tGet Lucky"
    );
}

#[test]
fn empty_metadata_prints_nothing() {
    assert_eq!(format_metadata(&MetadataMap::new()), "");
}

#[test]
fn change_lines_carry_bus_name_and_changes() {
    let mut event = ChangeEvent::from_owner(":1.42");
    event
        .changed
        .insert("PlaybackStatus".to_string(), Variant::from("Playing"));

    assert_eq!(
        format_change("org.mpris.MediaPlayer2.spotify", &event),
        r#"CHANGE org.mpris.MediaPlayer2.spotify {"PlaybackStatus":"Playing"}"#
    );
}

#[test]
fn current_player_is_starred() {
    assert_eq!(
        format_player_entry("org.mpris.MediaPlayer2.mpv", true),
        "* org.mpris.MediaPlayer2.mpv"
    );
    assert_eq!(
        format_player_entry("org.mpris.MediaPlayer2.vlc", false),
        "  org.mpris.MediaPlayer2.vlc"
    );
}

#[test]
fn short_aliases_resolve_to_commands() {
    let cases = [
        ("y", "Play"),
        ("u", "Pause"),
        ("p", "PlayPause"),
        ("n", "Next"),
        ("prev", "Previous"),
        ("v", "Previous"),
        ("s", "Stop"),
    ];

    for (alias, expected) in cases {
        let cli = Cli::try_parse_from(["mw", alias]).unwrap();
        assert_eq!(format!("{:?}", cli.command), expected, "alias {alias}");
    }
}

#[test]
fn open_takes_a_uri() {
    let cli = Cli::try_parse_from(["mw", "o", "spotify:track:1"]).unwrap();
    assert!(matches!(cli.command, Commands::Open { uri } if uri == "spotify:track:1"));
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let cli = Cli::try_parse_from(["mw", "status", "-w", "--player", "mpv", "-vv"]).unwrap();

    assert_eq!(cli.player.as_deref(), Some("mpv"));
    assert_eq!(cli.verbose, 2);
    assert!(matches!(
        cli.command,
        Commands::Status {
            format: None,
            watch: true
        }
    ));
}

#[test]
fn status_accepts_a_custom_format() {
    let cli = Cli::try_parse_from(["mw", "status", "-f", "{track} ({position})"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status { format: Some(ref f), watch: false } if f == "{track} ({position})"
    ));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["mw"]).is_err());
}

#[test]
fn media_errors_map_to_cli_errors() {
    let not_found = CliError::from(MediaError::ServiceNotFound("vlc".to_string()));
    assert!(matches!(not_found, CliError::PlayerNotFound(ref name) if name == "vlc"));

    let no_bus = CliError::from(MediaError::TransportUnavailable("no socket".to_string()));
    assert!(matches!(no_bus, CliError::TransportUnavailable(_)));

    let failed = CliError::from(MediaError::remote("Play", "rejected"));
    assert!(matches!(failed, CliError::ServiceError(_)));
}

#[test]
fn top_level_errors_print_the_command_message() {
    let error = MusicwandError::from(CliError::PlayerNotFound("vlc".to_string()));
    assert!(matches!(error, MusicwandError::Cli(_)));
    assert_eq!(error.to_string(), "Could not find player vlc");

    let error = MusicwandError::from(DaemonError::NoPlayers);
    assert_eq!(error.to_string(), "Unable to connect to any music players");
}
