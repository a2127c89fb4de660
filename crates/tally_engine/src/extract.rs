use scraper::{Html, Selector};

pub trait Extractor: Send + Sync {
    /// Text of each paragraph in document order, trimmed, empty ones skipped.
    fn paragraphs(&self, html: &str) -> Vec<String>;

    /// All paragraph texts joined by a single space.
    fn article_text(&self, html: &str) -> String {
        self.paragraphs(html).join(" ")
    }
}

/// Collects the text of every `<p>` element, including text of nested inline markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParagraphExtractor;

impl Extractor for ParagraphExtractor {
    fn paragraphs(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let Ok(selector) = Selector::parse("p") else {
            return Vec::new();
        };

        doc.select(&selector)
            .map(|p| p.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}
