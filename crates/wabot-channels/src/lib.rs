//! # wabot-channels
//!
//! Messaging platform integrations for wabot.

pub mod whatsapp;
