mod api;
mod gateway;
#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wabot_channels::whatsapp::WhatsAppChannel;
use wabot_core::config::{self, BotConfig};
use wabot_responder::{uniform, ReplyContext, Responder};

#[derive(Parser)]
#[command(
    name = "wabot",
    version,
    about = "WhatsApp auto-responder: commands, keywords, and a random fallback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", env = "WABOT_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to WhatsApp and start answering messages.
    Start,
    /// Print the effective configuration.
    Status,
    /// Run one message through the responder and print the reply.
    Ask {
        /// The message text.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

/// Install the global subscriber: stdout always, plus a file when
/// `bot.log_file` is set. `RUST_LOG` wins over `bot.log_level`.
fn init_tracing(bot: &BotConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&bot.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = if bot.log_file.is_empty() {
        (None, None)
    } else {
        let path = config::shellexpand(&bot.log_file);
        let path = Path::new(&path);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let file = path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("bot.log_file has no file name: {}", path.display()))?;
        std::fs::create_dir_all(dir)?;
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_tracing(&cfg.bot)?;

    match cli.command {
        Commands::Start => {
            if !cfg.whatsapp.enabled {
                anyhow::bail!("WhatsApp is disabled. Set [whatsapp] enabled = true in config.toml.");
            }

            let channel = Arc::new(WhatsAppChannel::new(
                cfg.whatsapp.clone(),
                &cfg.bot.data_dir,
            ));
            let responder = Arc::new(Responder::from_config(&cfg));

            println!("🤖 {} v{} starting...", cfg.bot.name, cfg.bot.version);
            let gw = Arc::new(gateway::Gateway::new(channel, responder, &cfg));
            gw.run().await?;
        }
        Commands::Status => {
            let responder = Responder::from_config(&cfg);
            println!("🤖 {} status\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!("Version: {}", cfg.bot.version);
            println!("Platform: {}", cfg.bot.platform);
            println!("Server: {}", cfg.bot.server_name);
            println!();
            println!(
                "  whatsapp: {}",
                if cfg.whatsapp.enabled { "enabled" } else { "disabled" }
            );
            println!(
                "  session: {}",
                config::shellexpand(&format!("{}/whatsapp_session", cfg.bot.data_dir))
            );
            println!(
                "  admin: {}",
                if cfg.whatsapp.admin_number.is_empty() {
                    "not set"
                } else {
                    cfg.whatsapp.admin_number.as_str()
                }
            );
            println!(
                "  api: {}",
                if cfg.api.enabled {
                    format!("{}:{}", cfg.api.host, cfg.api.port)
                } else {
                    "disabled".to_string()
                }
            );
            println!();
            println!("  commands: {}", responder.commands().keys().join(", "));
            println!("  keyword rules: {}", responder.keywords().len());
            println!("  fallback rate: {}", responder.fallback_rate());
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: wabot ask <message>");
            }

            let text = message.join(" ");
            let responder = Responder::from_config(&cfg);
            let ctx = ReplyContext::capture(Instant::now());
            match responder.decide_text(&text, &ctx, uniform).text() {
                Some(reply) => println!("{reply}"),
                None => println!("(no reply)"),
            }
        }
    }

    Ok(())
}
