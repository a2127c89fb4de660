use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountReplyError {
    #[error("model reply segment {segment:?} is not a count")]
    Malformed { segment: String },
    #[error("model returned {actual} counts for {expected} words")]
    Mismatch { expected: usize, actual: usize },
}

/// Parses a comma-separated list of counts returned by the model.
///
/// Every segment must be a non-negative integer, and there must be exactly
/// `expected` of them. Malformed segments are reported before a length mismatch.
pub fn parse_counts(reply: &str, expected: usize) -> Result<Vec<u32>, CountReplyError> {
    let counts = reply
        .trim()
        .split(',')
        .map(|segment| {
            let segment = segment.trim();
            segment
                .parse::<u32>()
                .map_err(|_| CountReplyError::Malformed {
                    segment: segment.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if counts.len() != expected {
        return Err(CountReplyError::Mismatch {
            expected,
            actual: counts.len(),
        });
    }
    Ok(counts)
}
