//! Status line rendering for bars and prompts.

mod format;
mod icon;

pub use format::{PLACEHOLDERS, format_status, substitute};
pub use icon::{CHROME_ICON, DEFAULT_ICON, FIREFOX_ICON, IconTable, SPOTIFY_ICON, builtin_icon};
