//! # wabot-core
//!
//! Core types, traits, configuration, and error handling for wabot.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;
pub mod uptime;
