//! Gateway services and the pieces they are built from.

pub mod demo;
pub mod generation;
pub mod multipart;
pub mod prompts;
pub mod provider;
pub mod transcription;
