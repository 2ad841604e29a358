//! Completion client for hosted chat-completion providers.
//!
//! The single I/O boundary to the external AI provider. Availability is
//! decided once, when the client is built from [`LLMConfig`]; an unconfigured
//! client fails every call with [`CompletionError::ProviderUnavailable`]
//! before touching the network.

pub mod client;
pub mod config;
pub mod providers;
pub mod types;

pub use client::{ChatCompleter, CompletionClient, CompletionError};
pub use config::LLMConfig;
pub use types::*;
