//! Terminal UI: Elm-style event loop, step views and overlays.

pub mod app;
pub mod clipboard;
pub mod events;
pub mod layout;
pub mod services;
pub mod theme;
pub mod views;
