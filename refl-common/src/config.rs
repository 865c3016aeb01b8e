//! Startup configuration for the Reflections services
//!
//! Values come from the environment (with CLI flag overrides parsed by
//! each binary). Required values that are absent abort startup with a
//! diagnostic; nothing runs half-configured.

use std::path::PathBuf;

/// Default HTTP port for the Reflections web service
pub const DEFAULT_WEB_PORT: u16 = 8000;

/// Default HTTP port for the user-entry demo service
pub const DEFAULT_ENTRY_PORT: u16 = 5001;

/// Default model used by the topic classifier
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4o-mini";

/// Startup configuration for the Reflections web service
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// SQLite database path (`REFL_DATABASE`)
    pub database_path: PathBuf,
    /// Classifier API credential (`OPENAI_API_KEY`)
    pub classifier_api_key: String,
    /// Classifier model name (`REFL_MODEL`)
    pub classifier_model: String,
    /// HTTP port (`REFL_WEB_PORT`)
    pub port: u16,
}
