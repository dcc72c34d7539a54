pub mod commands;
pub mod console;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sierra_core::config::{ConfigOverrides, LlmProvider};

#[derive(Debug, Parser)]
#[command(
    name = "sierra",
    about = "Sierra Outfitters conversational assistant",
    long_about = "Chat with Sierra about orders, gear recommendations and the Early Riser promotion, or inspect the assistant's configuration.",
    after_help = "Examples:\n  sierra\n  sierra chat --model gpt-4o-mini\n  sierra config --config config/sierra.toml\n  sierra doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start the interactive chat loop (default)")]
    Chat(ChatArgs),
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config {
        #[arg(long, help = "Path to a sierra.toml config file")]
        config: Option<PathBuf>,
    },
    #[command(about = "Validate config, data files and model credentials")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Path to a sierra.toml config file")]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Default, clap::Args)]
struct ChatArgs {
    #[arg(long, help = "Path to a sierra.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Model provider (openai|ollama)")]
    provider: Option<String>,
    #[arg(long, help = "Model identifier, e.g. gpt-4o")]
    model: Option<String>,
    #[arg(long, help = "Override the chat-completions base URL")]
    base_url: Option<String>,
    #[arg(long, help = "Path to the product catalog JSON")]
    products: Option<PathBuf>,
    #[arg(long, help = "Path to the customer orders JSON")]
    orders: Option<PathBuf>,
    #[arg(long, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
}

impl ChatArgs {
    fn into_options(self) -> Result<commands::chat::ChatOptions, String> {
        let llm_provider = self
            .provider
            .map(|value| value.parse::<LlmProvider>())
            .transpose()
            .map_err(|error| error.to_string())?;

        Ok(commands::chat::ChatOptions {
            config_path: self.config,
            overrides: ConfigOverrides {
                log_level: self.log_level,
                llm_provider,
                llm_model: self.model,
                llm_base_url: self.base_url,
                products_path: self.products,
                orders_path: self.orders,
            },
        })
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Chat(ChatArgs::default())) {
        Command::Chat(args) => match args.into_options() {
            Ok(options) => commands::chat::run(options),
            Err(message) => {
                commands::CommandResult::failure("chat", "config_validation", message, 2)
            }
        },
        Command::Config { config } => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(config) }
        }
        Command::Doctor { json, config } => commands::doctor::run(json, config),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
