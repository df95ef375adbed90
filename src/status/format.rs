use std::collections::HashMap;

use crate::services::mpris::{Player, format_time};

use super::IconTable;

/// Placeholders recognised in status templates
pub const PLACEHOLDERS: [&str; 6] = [
    "{icon}",
    "{artist}",
    "{album}",
    "{track}",
    "{length}",
    "{position}",
];

const TRACK_PLACEHOLDERS: [&str; 4] = ["{artist}", "{album}", "{track}", "{length}"];

/// Render `template` against the current state of `player`.
///
/// Only placeholders present in the template cause remote reads, and the
/// track metadata is read at most once. Anything the player does not
/// report renders as an empty string.
pub async fn format_status(template: &str, player: &Player, icons: &IconTable) -> String {
    let mut values: HashMap<&'static str, String> = HashMap::new();

    if TRACK_PLACEHOLDERS
        .iter()
        .any(|placeholder| template.contains(placeholder))
    {
        let track = player.track().await;
        values.insert("{artist}", track.artist().to_string());
        values.insert("{album}", track.album.clone());
        values.insert("{track}", track.title.clone());
        values.insert(
            "{length}",
            track.length_micros().map(format_time).unwrap_or_default(),
        );
    }

    if template.contains("{position}") {
        values.insert("{position}", format_time(player.position().await));
    }

    if template.contains("{icon}") {
        values.insert("{icon}", icons.lookup(&player.identity().await));
    }

    substitute(template, &values)
}

/// Replace every known placeholder in one left-to-right pass.
///
/// Substituted text is never rescanned, so a title containing `{artist}`
/// stays literal. Unknown braces are copied through.
pub fn substitute(template: &str, values: &HashMap<&'static str, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];

        match PLACEHOLDERS
            .iter()
            .find(|placeholder| tail.starts_with(*placeholder))
        {
            Some(placeholder) => {
                if let Some(value) = values.get(placeholder) {
                    output.push_str(value);
                }
                rest = &tail[placeholder.len()..];
            }
            None => {
                output.push('{');
                rest = &tail[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
