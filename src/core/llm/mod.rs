mod gemini;

pub use gemini::GeminiProvider;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::core::config::Config;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String>;
}

/// Facade over the generative-text provider. Constructed without a provider
/// when no credential is configured; in that state every call errors, which
/// is the designed trigger for the agents' deterministic fallbacks.
pub struct GenAi {
    provider: Option<Box<dyn TextGenerator>>,
}

impl GenAi {
    pub fn new(provider: Box<dyn TextGenerator>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.gemini_api_key {
            Some(key) => {
                info!("Generative text enabled (model: {})", config.model);
                Self::new(Box::new(GeminiProvider::new(
                    key.clone(),
                    config.model.clone(),
                )))
            }
            None => {
                info!("No generative-text credential configured; agents will use templates");
                Self::disabled()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow!("no generative-text credential configured"))?;
        provider.generate(system, prompt).await
    }

    /// Ask for a single JSON object matching `schema_hint` and parse it into
    /// `T`. Models routinely wrap JSON in markdown fences; those are stripped
    /// before parsing. A parse failure is an `Err` like any other provider
    /// failure, so callers handle both through the same fallback branch.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema_hint: &str,
    ) -> Result<T> {
        let full = format!(
            "{prompt}\n\nRespond with a single JSON object matching this shape, no prose:\n{schema_hint}"
        );
        let raw = self.generate(&full, None).await?;
        let body = strip_code_fences(&raw);
        serde_json::from_str(body).map_err(|e| anyhow!("model returned unparseable JSON: {e}"))
    }
}

pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider {
        reply: String,
    }

    #[async_trait]
    impl TextGenerator for CannedProvider {
        fn model_id(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _system: Option<&str>, _prompt: &str) -> Result<String> {
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn strip_code_fences_handles_plain_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn strip_code_fences_removes_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_code_fences_removes_bare_fence() {
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[tokio::test]
    async fn disabled_facade_reports_missing_credential() {
        let genai = GenAi::disabled();
        assert!(!genai.is_configured());
        let err = genai.generate("hello", None).await.unwrap_err();
        assert!(err.to_string().contains("credential"));
    }

    #[tokio::test]
    async fn generate_json_parses_fenced_reply() {
        #[derive(serde::Deserialize)]
        struct Reply {
            score: u8,
        }
        let genai = GenAi::new(Box::new(CannedProvider {
            reply: "```json\n{\"score\": 42}\n```".to_string(),
        }));
        let parsed: Reply = genai
            .generate_json("rate this", "{\"score\": 0}")
            .await
            .unwrap();
        assert_eq!(parsed.score, 42);
    }

    #[tokio::test]
    async fn generate_json_maps_parse_failure_to_error() {
        let genai = GenAi::new(Box::new(CannedProvider {
            reply: "Sure! Here is my analysis in prose.".to_string(),
        }));
        let err = genai
            .generate_json::<serde_json::Value>("rate this", "{}")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unparseable"));
    }
}
