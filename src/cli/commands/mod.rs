/// Transport controls
pub mod control;
/// Track metadata dump
pub mod metadata;
/// Daemon-side player listing and selection
pub mod players;
/// Formatted status line
pub mod status;
/// Raw change log
pub mod watch;
