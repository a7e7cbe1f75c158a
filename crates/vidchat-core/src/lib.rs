//! Core vidchat library (markup renderer, session, drag, transport, config).

pub mod config;
pub mod drag;
pub mod host;
pub mod logging;
pub mod markup;
pub mod navigation;
pub mod session;
pub mod transport;
