use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sierra_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run(config_path: Option<PathBuf>) -> String {
    let config_file_path = resolve_config_path(config_path.as_deref());
    let config = match AppConfig::load(LoadOptions::strict(config_path)) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.provider",
        &format!("{:?}", config.llm.provider),
        source("llm.provider", &["SIERRA_LLM_PROVIDER"]),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", &["SIERRA_LLM_MODEL"]),
    ));
    lines.push(render_line(
        "llm.base_url",
        config.llm.effective_base_url(),
        source("llm.base_url", &["SIERRA_LLM_BASE_URL"]),
    ));

    let llm_api_key = if config.llm.has_api_key() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", &["SIERRA_LLM_API_KEY", "OPENAI_API_KEY"]),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", &["SIERRA_LLM_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "data.products_path",
        &config.data.products_path.display().to_string(),
        source("data.products_path", &["SIERRA_DATA_PRODUCTS_PATH"]),
    ));
    lines.push(render_line(
        "data.orders_path",
        &config.data.orders_path.display().to_string(),
        source("data.orders_path", &["SIERRA_DATA_ORDERS_PATH"]),
    ));

    lines.push(render_line(
        "dispatch.general_suppresses_fragments",
        &config.dispatch.general_suppresses_fragments.to_string(),
        source(
            "dispatch.general_suppresses_fragments",
            &["SIERRA_DISPATCH_GENERAL_SUPPRESSES_FRAGMENTS"],
        ),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["SIERRA_LOGGING_LEVEL", "SIERRA_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["SIERRA_LOGGING_FORMAT", "SIERRA_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
