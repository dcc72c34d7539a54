use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;

/// Startup failures. Anything that goes wrong after the chat loop starts is
/// turned into a reply string instead.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    DataLoad(#[from] LoadError),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("console i/o failure: {0}")]
    Console(#[source] std::io::Error),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::DataLoad(_) => "data_load",
            Self::Integration(_) => "integration",
            Self::Console(_) => "console_io",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::DataLoad(_) => 3,
            Self::Integration(_) => 4,
            Self::Console(_) => 5,
        }
    }
}
