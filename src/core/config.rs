use std::env;
use std::path::PathBuf;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Runtime configuration, read from the environment. The API key doubles as
/// a feature flag: absent means every agent runs its deterministic template
/// path.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("STARTLABX_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let db_path = env::var("STARTLABX_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("startlabx.db"));
        Self {
            gemini_api_key,
            model,
            db_path,
        }
    }
}
