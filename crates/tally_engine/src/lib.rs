//! Tally engine: IO collaborators and the service behind each endpoint.
mod backoff;
mod completion;
mod decode;
mod error;
mod extract;
mod fetch;
mod tally;
mod types;

pub use backoff::{backoff_delay, parse_retry_after, RetryPolicy};
pub use completion::openai::{OpenAiClient, OpenAiSettings, DEFAULT_BASE_URL};
pub use completion::scripted::ScriptedCompletion;
pub use completion::{ChatMessage, CompletionClient, CompletionRequest, GenerationError, Role};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use error::TallyError;
pub use extract::{Extractor, ParagraphExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use tally::{Tally, TallySettings};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
