use tally_core::CountReplyError;
use thiserror::Error;

use crate::{FetchError, GenerationError};

/// Every way an endpoint can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("could not retrieve article source: {0}")]
    UpstreamFetch(#[from] FetchError),
    #[error("language model call failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("model reply {reply:?} is not a list of counts (bad segment {segment:?})")]
    MalformedModelResponse { reply: String, segment: String },
    #[error("model returned {actual} counts for {expected} requested words")]
    CountMismatch { expected: usize, actual: usize },
}

impl TallyError {
    pub(crate) fn from_reply(reply: &str, err: CountReplyError) -> Self {
        match err {
            CountReplyError::Malformed { segment } => TallyError::MalformedModelResponse {
                reply: reply.to_string(),
                segment,
            },
            CountReplyError::Mismatch { expected, actual } => {
                TallyError::CountMismatch { expected, actual }
            }
        }
    }
}
