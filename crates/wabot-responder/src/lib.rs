//! # wabot-responder
//!
//! Picks at most one reply for an incoming message. Three tiers are tried
//! in order and the first hit wins:
//!
//! 1. exact command match (`!hello`, `!help`, ...)
//! 2. keyword substring match, rules in declaration order
//! 3. a random fallback, answered only some of the time
//!
//! Tables are built once and never mutated, so a [`Responder`] can be shared
//! across tasks without locking. The random draw is passed in by the caller.

mod builtin;
mod responder;
mod table;
mod template;


pub use responder::{uniform, Decision, Match, Responder};
pub use table::{normalize, CommandTable, KeywordRule};
pub use template::{format_time, ReplyContext, ReplyTemplate};
