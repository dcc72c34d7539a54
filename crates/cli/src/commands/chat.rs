use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use sierra_agent::dispatch::DispatchPolicy;
use sierra_agent::handlers::CredentialPrompt;
use sierra_agent::llm::{LanguageModelGateway, OpenAiCompatibleClient};
use sierra_agent::runtime::AgentRuntime;
use sierra_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
use sierra_core::{ApplicationError, Clock, StoreSnapshot, SystemClock};
use tracing::{info, warn};

use super::CommandResult;
use crate::console::{ConsolePrompt, LineSource, StdinLines};
use crate::logging::init_logging;

pub const BANNER: &str = "🌲 Welcome to the Sierra Assistant! Ask me anything. (Type 'exit' to quit)";
pub const USER_PROMPT: &str = "🧗 You: ";
pub const REPLY_PREFIX: &str = "🏔️ Sierra Agent:";
pub const FAREWELL: &str = "🏕️ Sierra Agent: Until next time — stay wild out there!";
pub const ENV_FILE: &str = ".env";

#[derive(Clone, Debug, Default)]
pub struct ChatOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

pub fn run(options: ChatOptions) -> CommandResult {
    let mut runtime = match bootstrap(options, Arc::new(ConsolePrompt), Arc::new(SystemClock)) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error("chat", &error),
    };

    let executor = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(executor) => executor,
        Err(error) => {
            return CommandResult::from_error("chat", &ApplicationError::Console(error));
        }
    };

    let mut stdout = io::stdout();
    match executor.block_on(run_repl(&mut runtime, &mut StdinLines, &mut stdout)) {
        Ok(()) => CommandResult::silent(),
        Err(error) => CommandResult::from_error("chat", &ApplicationError::Console(error)),
    }
}

/// Loads config and data and wires the agent. Any failure here is fatal.
pub fn bootstrap(
    options: ChatOptions,
    prompt: Arc<dyn CredentialPrompt>,
    clock: Arc<dyn Clock>,
) -> Result<AgentRuntime, ApplicationError> {
    let env_file_loaded = load_env_file(Path::new(ENV_FILE))?;
    let config = AppConfig::load(LoadOptions {
        overrides: options.overrides,
        ..LoadOptions::strict(options.config_path)
    })?;
    init_logging(&config);
    if env_file_loaded {
        info!(event_name = "system.bootstrap.env_file", path = ENV_FILE, "environment file loaded");
    }

    if !config.llm.has_api_key() {
        warn!(
            event_name = "system.bootstrap.missing_api_key",
            "no llm api key configured; replies will fall back to apology messages"
        );
    }

    let snapshot = StoreSnapshot::load(&config.data)?;
    let gateway = build_gateway(&config)
        .map_err(|error| ApplicationError::Integration(format!("{error:#}")))?;

    info!(event_name = "system.bootstrap.ready", model = %config.llm.model, "assistant ready");
    Ok(AgentRuntime::for_store(
        gateway,
        snapshot,
        prompt,
        clock,
        DispatchPolicy::from(&config.dispatch),
    ))
}

/// Exports `KEY=value` pairs from `path` into the process environment.
/// Variables that are already set keep their value. A missing file is not an
/// error; a malformed one is.
pub fn load_env_file(path: &Path) -> Result<bool, ApplicationError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(error) if error.not_found() => Ok(false),
        Err(error) => Err(ApplicationError::Configuration(ConfigError::Validation(format!(
            "could not load environment file `{}`: {error}",
            path.display()
        )))),
    }
}

fn build_gateway(config: &AppConfig) -> Result<LanguageModelGateway> {
    let client = OpenAiCompatibleClient::from_config(&config.llm)?;
    Ok(LanguageModelGateway::new(Arc::new(client)))
}

pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "exit" | "quit")
}

/// Read-eval-print loop. Ends on `exit`/`quit` or end of input.
pub async fn run_repl<L, W>(
    runtime: &mut AgentRuntime,
    input: &mut L,
    output: &mut W,
) -> io::Result<()>
where
    L: LineSource,
    W: Write,
{
    writeln!(output, "{BANNER}\n")?;

    loop {
        write!(output, "{USER_PROMPT}")?;
        output.flush()?;

        let line = match input.next_line()? {
            Some(line) if !is_exit_command(&line) => line,
            _ => {
                writeln!(output, "{FAREWELL}")?;
                return Ok(());
            }
        };

        let reply = runtime.handle_message(&line).await;
        writeln!(output, "{REPLY_PREFIX} {reply}")?;
    }
}

#[cfg(test)]
mod tests {
    use super::is_exit_command;

    #[test]
    fn exit_words_are_trimmed_and_case_insensitive() {
        for line in ["exit", "QUIT", "  Exit  ", "quit\t"] {
            assert!(is_exit_command(line), "{line:?} should exit");
        }
        for line in ["exit now", "q", "", "quitting"] {
            assert!(!is_exit_command(line), "{line:?} should not exit");
        }
    }
}
