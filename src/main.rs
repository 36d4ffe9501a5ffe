mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use commands::Command;
use remind_channels::telegram::TelegramChannel;
use remind_core::{
    config::{self, shellexpand},
    task::DISPLAY_FORMAT,
    traits::{Channel, TaskStore},
};
use remind_store::Store;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "remindbot",
    version,
    about = "Telegram reminder bot — schedule a message, get it back on time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show configuration and pending task count.
    Status,
    /// Classify a message offline, without touching the store.
    Parse {
        /// The message text.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    match cli.command {
        Commands::Start => {
            let _log_guard = init_logging(&cfg.bot.log_level, Some(&cfg.bot.data_dir));

            let tg = match cfg.channel.telegram {
                Some(ref tg) if tg.enabled => tg.clone(),
                _ => anyhow::bail!(
                    "Telegram is not enabled. Enable [channel.telegram] in {}.",
                    cli.config
                ),
            };
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in {} or the {} env var.",
                    cli.config,
                    config::TELEGRAM_TOKEN_ENV
                );
            }
            let channel: Arc<dyn Channel> = Arc::new(TelegramChannel::new(tg));

            let store: Arc<dyn TaskStore> = Arc::new(Store::new(&cfg.store).await?);

            tracing::info!("{} starting", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(
                channel,
                store,
                cfg.scheduler.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            init_logging(&cfg.bot.log_level, None);
            println!("{} — Status Check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!("Database: {}", shellexpand(&cfg.store.db_path));
            println!(
                "Scheduler: {}",
                if cfg.scheduler.enabled {
                    format!("every {}s", cfg.scheduler.poll_interval_secs)
                } else {
                    "disabled".to_string()
                }
            );
            println!();

            match cfg.channel.telegram {
                Some(ref tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }

            let store = Store::new(&cfg.store).await?;
            println!("  pending tasks: {}", store.pending_count().await?);
        }
        Commands::Parse { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: remindbot parse <message>");
            }
            let text = message.join(" ");
            match Command::parse(0, &text) {
                Command::Start => println!("start: {}", commands::WELCOME),
                Command::AddHelp => println!("add: {}", commands::FORMAT_HELP),
                Command::Schedule(req) => println!(
                    "schedule: due {} | text '{}'",
                    req.due_at.format(DISPLAY_FORMAT),
                    req.text
                ),
                Command::Unsupported => println!("unsupported: {}", commands::UNSUPPORTED),
            }
        }
    }

    Ok(())
}

/// Install the tracing subscriber: stdout always, plus `{data_dir}/logs/remindbot.log`
/// when a data dir is given. `RUST_LOG` wins over the configured level.
///
/// The returned guard flushes the file writer on drop; keep it alive.
fn init_logging(level: &str, data_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = data_dir.and_then(|dir| {
        let log_dir = PathBuf::from(shellexpand(dir)).join("logs");
        std::fs::create_dir_all(&log_dir).ok()?;
        let appender = RollingBuilder::new()
            .rotation(Rotation::NEVER)
            .filename_prefix("remindbot.log")
            .build(&log_dir)
            .ok()?;
        Some(tracing_appender::non_blocking(appender))
    });
    let (file_layer, guard) = match file {
        Some((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
