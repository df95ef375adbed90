use crate::{
    cli::{
        CliError, CommandResult,
        formatting::{format_metadata, format_metadata_json},
    },
    services::mpris::Player,
};

/// Print the current track metadata of `player`.
///
/// Entries are sorted by key, one `key<TAB>value` per line, or a single
/// JSON object when `json` is set.
///
/// # Errors
/// Returns `Output` if the metadata cannot be serialized to JSON
pub async fn execute(player: &Player, json: bool) -> CommandResult {
    let metadata = player.raw_metadata().await;

    if json {
        format_metadata_json(&metadata).map_err(|e| CliError::Output(e.to_string()))
    } else {
        Ok(format_metadata(&metadata))
    }
}
