//! Request-scoped data models for the shorts helper.
//!
//! Nothing here is persisted. Parts, preferences and generated content live
//! for the duration of a single gateway invocation and serialize naturally
//! as JSON via `serde`.

pub mod content;
pub mod preferences;
pub mod upload;
