use clap::{Parser, Subcommand};
use std::sync::Arc;

use dice_bot::application::services::{CommandService, Poller};
use dice_bot::infrastructure::adapters::TelegramAdapter;
use dice_bot::infrastructure::config::Config;
use dice_bot::infrastructure::server;
use dice_bot::{BotError, BotState};

#[derive(Parser)]
#[command(name = "dice-bot")]
#[command(about = "Telegram bot that flips coins and rolls dice", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling and serve the health endpoint
    Run,
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(&cli.config, cli.token) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("dice-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = Config::resolve(config_path, token_override)?;
    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(serve_and_poll(config))
}

async fn serve_and_poll(config: Config) -> Result<(), BotError> {
    let token = config.token().unwrap_or_default();
    let settings = config.poll_settings()?;
    let addr = config.socket_addr()?;

    let state = Arc::new(BotState::new());
    let bot = Arc::new(TelegramAdapter::new(
        token,
        config.telegram.api_base.as_str(),
        settings.timeout_secs,
    )?);

    let poller = Poller::new(bot, CommandService::from_entropy(), state.clone(), settings);
    let handle = poller
        .start()
        .ok_or_else(|| BotError::Internal("Poller already started".to_string()))?;

    server::serve_with_poller(addr, state, handle, server::shutdown_signal()).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Internal(format!("Failed to render config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
