//! # properties-panel
//!
//! View-state core of the properties panel. Frames pushed over the form
//! subscription are classified into actions and reduced into a `PanelState`
//! that the view layer renders from.
//!
//! `state` holds the reducer, `net` the payload types, the classifier and the
//! ordered dispatch queue, `replay` drives recorded traffic through the core.

pub mod config;
pub mod net;
pub mod replay;
pub mod state;
