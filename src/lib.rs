/// BO3 Assistant - Best-of-Three Match Recorder (TUI Edition)
///
/// Core library providing the match-entry wizard, the shareable result
/// formatter, and an optional post-match message suggestion for
/// Shadowverse best-of-three matches.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
