use tracing::debug;
use wabot_core::config::Config;
use wabot_core::message::IncomingMessage;

use crate::builtin;
use crate::table::{normalize, CommandTable, KeywordRule};
use crate::template::{ReplyContext, ReplyTemplate};

/// Outcome of [`Responder::decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Reply(String),
    NoReply,
}

impl Decision {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Reply(text) => Some(text),
            Self::NoReply => None,
        }
    }
}

/// Which tier claimed a normalized message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<'a> {
    Command(&'a ReplyTemplate),
    /// Index of the winning rule and its reply.
    Keyword(usize, &'a ReplyTemplate),
    Unmatched,
}

/// One uniform draw in `[0, 1)` from the thread-local RNG.
pub fn uniform() -> f64 {
    rand::random::<f64>()
}

/// Stateless reply selector over immutable tables.
#[derive(Debug, Clone)]
pub struct Responder {
    commands: CommandTable,
    keywords: Vec<KeywordRule>,
    fallback_rate: f64,
    fallback: ReplyTemplate,
}

impl Responder {
    /// Build from explicit tables. `fallback_rate` is clamped to `[0, 1]`.
    pub fn new(
        commands: CommandTable,
        keywords: Vec<KeywordRule>,
        fallback_rate: f64,
        fallback: impl Into<String>,
    ) -> Self {
        Self {
            commands,
            keywords,
            fallback_rate: fallback_rate.clamp(0.0, 1.0),
            fallback: ReplyTemplate::new(fallback),
        }
    }

    /// Build from configuration: built-in tables (unless disabled) with
    /// configured commands merged on top and configured keyword rules
    /// replacing the built-in ones.
    pub fn from_config(config: &Config) -> Self {
        let rc = &config.responder;

        let mut commands = if rc.builtin_tables {
            builtin::commands(&config.bot)
        } else {
            CommandTable::new()
        };
        for (key, reply) in &rc.commands {
            commands.insert(key, reply.as_str());
        }

        let keywords = if !rc.keywords.is_empty() {
            rc.keywords
                .iter()
                .map(|r| KeywordRule::new(&r.keywords, r.response.as_str()))
                .collect()
        } else if rc.builtin_tables {
            builtin::keywords()
        } else {
            Vec::new()
        };

        Self::new(
            commands,
            keywords,
            rc.fallback_rate,
            rc.fallback_message.as_str(),
        )
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn keywords(&self) -> &[KeywordRule] {
        &self.keywords
    }

    pub fn fallback_rate(&self) -> f64 {
        self.fallback_rate
    }

    /// Find the tier that claims `normalized`, without rendering or drawing.
    pub fn classify(&self, normalized: &str) -> Match<'_> {
        if let Some(reply) = self.commands.get(normalized) {
            return Match::Command(reply);
        }
        self.keywords
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(normalized))
            .map(|(i, rule)| Match::Keyword(i, rule.response()))
            .unwrap_or(Match::Unmatched)
    }

    /// Choose a reply for `message`.
    ///
    /// Callers must filter broadcast messages before calling this.
    pub fn decide<R>(&self, message: &IncomingMessage, ctx: &ReplyContext, roll: R) -> Decision
    where
        R: FnOnce() -> f64,
    {
        self.decide_text(&message.text, ctx, roll)
    }

    /// Choose a reply for a raw body. `roll` is called at most once, and
    /// only when neither commands nor keywords match.
    pub fn decide_text<R>(&self, body: &str, ctx: &ReplyContext, roll: R) -> Decision
    where
        R: FnOnce() -> f64,
    {
        let normalized = normalize(body);
        match self.classify(&normalized) {
            Match::Command(reply) => {
                debug!("command match: {normalized}");
                Decision::Reply(reply.render(ctx))
            }
            Match::Keyword(i, reply) => {
                debug!("keyword rule {i} matched");
                Decision::Reply(reply.render(ctx))
            }
            Match::Unmatched => {
                let draw = roll();
                if draw < self.fallback_rate {
                    debug!("fallback reply (draw {draw:.3})");
                    Decision::Reply(self.fallback.render(ctx))
                } else {
                    Decision::NoReply
                }
            }
        }
    }
}
