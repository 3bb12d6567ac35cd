//! Built-in reply tables.

use wabot_core::config::BotConfig;

use crate::table::{CommandTable, KeywordRule};

/// `!`-prefixed commands. `!info` bakes in version and platform at build
/// time; `{uptime}` and `{time}` are filled in per reply.
pub(crate) fn commands(bot: &BotConfig) -> CommandTable {
    let mut table = CommandTable::new();
    table.insert("!hello", "Hello! 👋 How can I assist you today?");
    table.insert(
        "!help",
        "🤖 *Available Commands:*\n\n\
         • !hello - Greet the bot\n\
         • !info - Bot information\n\
         • !time - Current time\n\
         • !help - Show this help menu\n\
         • !status - Check bot status",
    );
    table.insert(
        "!info",
        format!(
            "*Bot Information:*\n\n\
             • Version: {}\n\
             • Platform: {}\n\
             • Status: Active\n\
             • Uptime: {{uptime}}",
            bot.version, bot.platform
        ),
    );
    table.insert("!time", "🕒 Current time: {time}");
    table.insert("!status", "✅ Bot is online and running!\nUptime: {uptime}");
    table
}

/// Keyword rules, most specific first. Order decides ties.
pub(crate) fn keywords() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            ["price", "cost", "how much"],
            "Our prices start from $10. Would you like to know more about our services?",
        ),
        KeywordRule::new(
            ["thank", "thanks"],
            "You're welcome! 😊 Is there anything else I can help with?",
        ),
        KeywordRule::new(["hi", "hello", "hey"], "Hello! 👋 How can I help you today?"),
        KeywordRule::new(["bye", "goodbye"], "Goodbye! 👋 Have a great day!"),
        KeywordRule::new(
            ["help", "support"],
            "I can help you with basic queries. Type !help to see all commands.",
        ),
    ]
}
