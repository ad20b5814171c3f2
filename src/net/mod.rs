//! Inbound side of the form subscription.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the typed payload schema, `classify` maps frames to
//! reducer actions, and `panel_client` serializes frames into the reducer.

pub mod classify;
pub mod panel_client;
pub mod types;
