//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use vidchat_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "vidchat")]
#[command(version)]
#[command(about = "Video assistant chat widget, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides VIDCHAT_BACKEND_URL and config)
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Chat with the assistant line by line
    Chat {
        /// Page location the conversation starts on
        #[arg(long, value_name = "URL")]
        location: Option<String>,
    },
    /// Sends one message and prints the rendered reply
    Exec {
        /// The message to send
        #[arg(short, long)]
        prompt: String,

        /// Page location the message is about
        #[arg(long, value_name = "URL")]
        location: Option<String>,
    },
    /// Renders assistant markup from stdin
    Render,
    /// Checks whether the backend is reachable
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&config::paths::logs_dir()).context("init logging")?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, url } = cli;
    let url = url.as_deref();

    match command {
        Commands::Chat { location } => {
            commands::chat::run(&load_config()?, url, location.as_deref()).await
        }
        Commands::Exec { prompt, location } => {
            commands::exec::run(commands::exec::ExecRunOptions {
                prompt: &prompt,
                config: &load_config()?,
                url,
                location: location.as_deref(),
            })
            .await
        }
        Commands::Render => commands::render::run(),
        Commands::Status => commands::status::run(&load_config()?, url).await,
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

fn load_config() -> Result<config::Config> {
    config::Config::load().context("load config")
}
