/// Sampling parameters for a single completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

pub const ARTICLE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates short articles.";

pub const ARTICLE_PROMPT: &str = "Generate a random article with a title, body, and conclusion.";

pub const ARTICLE_PARAMS: GenerationParams = GenerationParams {
    max_tokens: 1000,
    temperature: 0.5,
};

pub const COUNT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that counts word occurrences.";

// Temperature 0 asks for the most likely reply; providers do not promise
// identical output across calls.
pub const COUNT_PARAMS: GenerationParams = GenerationParams {
    max_tokens: 100,
    temperature: 0.0,
};

/// Builds the user message asking the model to count each of `words` in `text`.
pub fn count_prompt(words: &[String], text: &str) -> String {
    format!(
        "Count the occurrences of the following words in the given text. \
         Only return the counts as a comma-separated list of numbers, one per word, \
         in the same order as the words are listed.\n\n\
         Words: {}\n\n\
         Text: {}",
        words.join(", "),
        text
    )
}
