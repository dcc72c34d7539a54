use std::path::PathBuf;

use serde::Serialize;
use sierra_core::config::{AppConfig, LlmProvider, LoadOptions};
use sierra_core::StoreSnapshot;

use super::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Exit code is non-zero only when a check fails; a missing api key is a
/// warning because the assistant still starts without one.
pub fn run(json_output: bool, config_path: Option<PathBuf>) -> CommandResult {
    let report = build_report(config_path);
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(config_path: Option<PathBuf>) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::strict(config_path)) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_data_files(&config));
            checks.push(check_llm_credentials(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["data_files", "llm_credentials"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let any_warn = checks.iter().any(|check| check.status == CheckStatus::Warn);
    let (overall_status, summary) = if any_fail {
        (CheckStatus::Fail, "doctor: one or more readiness checks failed".to_string())
    } else if any_warn {
        (CheckStatus::Warn, "doctor: ready, with warnings".to_string())
    } else {
        (CheckStatus::Pass, "doctor: all readiness checks passed".to_string())
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_data_files(config: &AppConfig) -> DoctorCheck {
    match StoreSnapshot::load(&config.data) {
        Ok(snapshot) => DoctorCheck {
            name: "data_files",
            status: CheckStatus::Pass,
            details: format!(
                "{} products ({} tags), {} orders",
                snapshot.catalog.products().len(),
                snapshot.catalog.tag_count(),
                snapshot.orders.len()
            ),
        },
        Err(error) => {
            DoctorCheck { name: "data_files", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn check_llm_credentials(config: &AppConfig) -> DoctorCheck {
    let endpoint = config.llm.effective_base_url();
    match (config.llm.provider, config.llm.has_api_key()) {
        (_, true) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: format!("api key present for `{}` at {endpoint}", config.llm.model),
        },
        (LlmProvider::Ollama, false) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: format!("no api key needed for ollama at {endpoint}"),
        },
        (LlmProvider::OpenAi, false) => DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Warn,
            details: "no api key set (SIERRA_LLM_API_KEY or OPENAI_API_KEY); replies will fall back to apology messages".to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
