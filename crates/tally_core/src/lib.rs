//! Tally core: pure text statistics, prompt construction and model-reply parsing.
mod catalog;
mod frequency;
mod prompt;
mod reply;
mod stopwords;
mod tokenize;
mod truncate;

pub use catalog::{
    find_model, is_reasoning_model, ModelInfo, CHAT_MODELS, DEFAULT_ARTICLE_MODEL,
    DEFAULT_SEED_URLS,
};
pub use frequency::{content_words, top_words, WordFrequency, TOP_WORDS_LIMIT};
pub use prompt::{
    count_prompt, GenerationParams, ARTICLE_PARAMS, ARTICLE_PROMPT, ARTICLE_SYSTEM_PROMPT,
    COUNT_PARAMS, COUNT_SYSTEM_PROMPT,
};
pub use reply::{parse_counts, CountReplyError};
pub use stopwords::is_stopword;
pub use tokenize::tokenize;
pub use truncate::truncate_chars;
