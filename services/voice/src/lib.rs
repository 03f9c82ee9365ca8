//! Rooftops voice assistant: a worker service that answers each dispatched
//! room with a conversational agent wired from hosted speech and language
//! providers.

pub mod assistant;
pub mod bootstrap;
pub mod config;
