pub mod app_config;
pub mod config;
pub mod format;
pub mod types;

pub use app_config::{AirtableConfig, AppConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::{format_count, format_number};
pub use types::{
    ChannelRef, ChannelStats, Comment, RefKind, ResolvedRef, VideoDetails, VideoRef,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
