//! chateqt - command-line client for the ChatEQT research-chat backend
//!
//! The core is the incremental answer-stream decoder in [`sse`]; the rest is
//! the client, storage and CLI around it. This library exposes modules for
//! use in integration tests.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod traits;
