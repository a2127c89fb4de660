use serde::Serialize;

/// A chat model the word-count endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Reasoning models take `max_completion_tokens`, only the default
    /// temperature, and no system role.
    #[serde(skip)]
    pub reasoning: bool,
}

impl ModelInfo {
    const fn chat(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            reasoning: false,
        }
    }

    const fn reasoning(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            reasoning: true,
        }
    }
}

pub const CHAT_MODELS: &[ModelInfo] = &[
    ModelInfo::chat("gpt-3.5-turbo", "GPT 3.5 Turbo"),
    ModelInfo::chat("gpt-4", "GPT 4"),
    ModelInfo::chat("gpt-4o", "GPT 4o"),
    ModelInfo::chat("gpt-4o-mini", "GPT 4o Mini"),
    ModelInfo::reasoning("o1-preview", "o1-preview"),
];

/// Model used for article generation unless configured otherwise.
pub const DEFAULT_ARTICLE_MODEL: &str = "gpt-4o";

/// Pages the crawl endpoint picks from unless configured otherwise.
pub const DEFAULT_SEED_URLS: &[&str] = &[
    "https://en.wikipedia.org/wiki/Special:Random",
    "https://www.bbc.com/news",
    "https://www.nytimes.com/",
];

pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    CHAT_MODELS.iter().find(|model| model.id == id)
}

/// Whether `id` is a catalog model that needs the reasoning request shape.
pub fn is_reasoning_model(id: &str) -> bool {
    find_model(id).is_some_and(|model| model.reasoning)
}
