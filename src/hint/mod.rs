use std::{sync::Arc, time::Duration};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;

mod completion;
mod prompt;
mod templates;

pub use completion::{
    CompletionError, CompletionRequest, OpenAiCompletion, StaticCompletion, TextCompletion,
};
pub use prompt::build_prompt;
pub use templates::{mentions_word, template_hint};

pub const INVALID_LEVEL_GUIDANCE: &str =
    "I'm not sure what kind of hint you're looking for. Try 'beginner', 'intermediate', or 'advanced'.";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl HintLevel {
    pub const ALL: [HintLevel; 3] = [
        HintLevel::Beginner,
        HintLevel::Intermediate,
        HintLevel::Advanced,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub level: HintLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HintStrategy {
    /// Phrase hints from the built-in template banks.
    Templates,
    /// Ask a text completion service, falling back to templates on failure.
    Completion,
}

#[derive(Clone, Debug)]
pub struct HintConfig {
    pub strategy: HintStrategy,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            strategy: HintStrategy::Templates,
            api_base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(10),
            max_tokens: 150,
        }
    }
}

/// Produces hints for a puzzle. Holds no per-request state, so one instance
/// serves every request.
#[derive(Clone)]
pub struct HintGenerator {
    completion: Option<Arc<dyn TextCompletion>>,
    timeout: Duration,
    max_tokens: u32,
}

impl HintGenerator {
    pub fn new(config: &HintConfig) -> Self {
        let completion = match config.strategy {
            HintStrategy::Templates => None,
            HintStrategy::Completion => match OpenAiCompletion::new(config) {
                Ok(backend) => {
                    tracing::info!(model = %backend.id(), "Hint completion backend ready");
                    Some(Arc::new(backend) as Arc<dyn TextCompletion>)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Hint completion unavailable, using templates");
                    None
                }
            },
        };

        Self {
            completion,
            timeout: config.timeout,
            max_tokens: config.max_tokens,
        }
    }

    pub fn templates_only() -> Self {
        Self::new(&HintConfig::default())
    }

    pub fn with_completion(
        completion: Arc<dyn TextCompletion>,
        timeout: Duration,
        max_tokens: u32,
    ) -> Self {
        Self {
            completion: Some(completion),
            timeout,
            max_tokens,
        }
    }

    pub fn uses_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Hint for a raw level string as sent by a client. Unknown levels get
    /// [`INVALID_LEVEL_GUIDANCE`] back; nothing here fails.
    pub async fn generate(&self, puzzle: &Puzzle, level: &str) -> String {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(puzzle, level, &mut rng).await
    }

    pub async fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        puzzle: &Puzzle,
        level: &str,
        rng: &mut R,
    ) -> String {
        match level.trim().parse::<HintLevel>() {
            Ok(level) => self.hint(puzzle, level, rng).await.text,
            Err(_) => {
                tracing::debug!(%level, "Unknown hint level requested");
                INVALID_LEVEL_GUIDANCE.to_string()
            }
        }
    }

    pub async fn hint<R: Rng + ?Sized>(&self, puzzle: &Puzzle, level: HintLevel, rng: &mut R) -> Hint {
        if let Some(completion) = &self.completion {
            match self.complete(completion.as_ref(), puzzle, level).await {
                Ok(text) => return Hint { level, text },
                Err(err) => {
                    tracing::warn!(
                        backend = %completion.id(),
                        %level,
                        error = %err,
                        "Hint completion failed, falling back to templates"
                    );
                }
            }
        }

        Hint {
            level,
            text: template_hint(puzzle, level, rng),
        }
    }

    async fn complete(
        &self,
        completion: &dyn TextCompletion,
        puzzle: &Puzzle,
        level: HintLevel,
    ) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            prompt: build_prompt(puzzle, level),
            max_tokens: self.max_tokens,
            timeout: self.timeout,
        };

        let text = tokio::time::timeout(self.timeout, completion.complete(request))
            .await
            .map_err(|_| CompletionError::Timeout(self.timeout))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(text.to_string())
    }
}
