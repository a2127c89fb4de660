use std::sync::Arc;

use rand::seq::SliceRandom;
use tally_core::{
    count_prompt, find_model, parse_counts, top_words, truncate_chars, WordFrequency,
    ARTICLE_PARAMS, ARTICLE_PROMPT, ARTICLE_SYSTEM_PROMPT, COUNT_PARAMS, COUNT_SYSTEM_PROMPT,
    DEFAULT_ARTICLE_MODEL, DEFAULT_SEED_URLS, TOP_WORDS_LIMIT,
};
use tally_logging::{tally_debug, tally_info};

use crate::{
    CompletionClient, CompletionRequest, DecodedHtml, Extractor, FailureKind, FetchError,
    Fetcher, GenerationError, ParagraphExtractor, TallyError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TallySettings {
    pub seed_urls: Vec<String>,
    /// Crawled articles are cut to this many characters.
    pub crawl_max_chars: usize,
    pub article_model: String,
}

impl Default for TallySettings {
    fn default() -> Self {
        Self {
            seed_urls: DEFAULT_SEED_URLS.iter().map(|url| url.to_string()).collect(),
            crawl_max_chars: 1000,
            article_model: DEFAULT_ARTICLE_MODEL.to_string(),
        }
    }
}

/// The four operations behind the HTTP endpoints. Holds no mutable state.
pub struct Tally {
    settings: TallySettings,
    fetcher: Arc<dyn Fetcher>,
    extractor: ParagraphExtractor,
    completion: Arc<dyn CompletionClient>,
}

impl Tally {
    pub fn new(
        settings: TallySettings,
        fetcher: Arc<dyn Fetcher>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            extractor: ParagraphExtractor,
            completion,
        }
    }

    /// Ten most frequent content words. Never fails; empty text gives an empty list.
    pub fn count_words(&self, text: &str) -> Vec<WordFrequency> {
        top_words(text, TOP_WORDS_LIMIT)
    }

    /// Paragraph text of a randomly chosen seed page.
    pub async fn crawl_article(&self) -> Result<String, TallyError> {
        let url = self.pick_seed()?;
        self.crawl_url(&url).await
    }

    /// Paragraph text of `url`, cut to the configured character limit.
    pub async fn crawl_url(&self, url: &str) -> Result<String, TallyError> {
        tally_info!("crawling {}", url);
        let output = self.fetcher.fetch(url).await?;
        let decoded = DecodedHtml::from_fetch(&output).map_err(FetchError::from)?;
        tally_debug!(
            "decoded {} bytes from {} as {}",
            output.metadata.byte_len,
            output.metadata.final_url,
            decoded.encoding_label
        );

        let text = self.extractor.article_text(&decoded.html);
        if text.is_empty() {
            return Err(FetchError::new(
                FailureKind::NoParagraphs,
                output.metadata.final_url,
            )
            .into());
        }
        Ok(truncate_chars(&text, self.settings.crawl_max_chars).to_string())
    }

    pub async fn generate_article(&self) -> Result<String, TallyError> {
        let request = CompletionRequest::new(&self.settings.article_model, ARTICLE_PARAMS)
            .system(ARTICLE_SYSTEM_PROMPT)
            .user(ARTICLE_PROMPT);
        let article = self.completion.complete(&request).await?;
        let article = article.trim();
        if article.is_empty() {
            return Err(GenerationError::EmptyCompletion.into());
        }
        Ok(article.to_string())
    }

    /// Asks `model` to count each of `words` in `text`; one count per word, same order.
    pub async fn llm_count(
        &self,
        text: &str,
        words: &[String],
        model: &str,
    ) -> Result<Vec<u32>, TallyError> {
        if words.is_empty() {
            return Err(TallyError::Validation("words must not be empty".into()));
        }
        if let Some(pos) = words.iter().position(|word| word.trim().is_empty()) {
            return Err(TallyError::Validation(format!("words[{pos}] is blank")));
        }
        if find_model(model).is_none() {
            return Err(TallyError::Validation(format!("unknown model {model:?}")));
        }

        let request = CompletionRequest::new(model, COUNT_PARAMS)
            .system(COUNT_SYSTEM_PROMPT)
            .user(count_prompt(words, text));
        let reply = self.completion.complete(&request).await?;
        tally_debug!("model {} replied {:?}", model, reply);

        parse_counts(&reply, words.len()).map_err(|err| TallyError::from_reply(&reply, err))
    }

    fn pick_seed(&self) -> Result<String, TallyError> {
        self.settings
            .seed_urls
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| TallyError::Validation("no seed urls configured".into()))
    }
}
