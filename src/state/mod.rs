//! Client-side state models.

pub mod properties;
