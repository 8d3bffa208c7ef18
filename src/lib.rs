//! Sessionlinker - A session-scoped URL shortener
//!
//! Every browser session gets its own private list of short links. Nothing is
//! shared between sessions and nothing outlives the session.
//!
//! # Architecture
//! - `storage`: Session registry, session storage, record store and action log
//! - `services`: Validation, the shortening form, redirect resolution, statistics
//! - `api`: HTTP pages, JSON API and the session middleware
//! - `config`: Configuration management
//! - `runtime`: Execution modes (server, CLI)
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
