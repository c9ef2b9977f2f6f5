//! Error type shared by the sampler, seed parsing and selection helpers.
//!
//! # Design Note
//! Messages carry a short `SAMPLER` prefix so they stay recognisable when a
//! query handler forwards them verbatim into its own error response.

use thiserror::Error;

/// Errors surfaced by sampling operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// Selection was attempted over a zero-length candidate list.
    ///
    /// Context: `kind` names what the caller was choosing from ("styles",
    /// "tones", "examples") so the message reads like the handler's own
    /// "no styles available" response.
    #[error("SAMPLER empty collection: no {kind} available")]
    EmptyCandidates { kind: &'static str },

    /// Seed text could not be interpreted as a number.
    ///
    /// Callers resolving a query parameter never see this; `Seed::resolve`
    /// falls back to a random seed instead.
    #[error("SAMPLER seed error: {0:?} is not a numeric seed")]
    InvalidSeed(String),

    /// An environment override held a value of the wrong shape.
    #[error("SAMPLER config error: {key}={value:?} is not valid")]
    InvalidConfig { key: &'static str, value: String },
}

/// Convenience alias used throughout the crate.
pub type SamplerResult<T> = Result<T, SamplerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates_message_names_kind() {
        let err = SamplerError::EmptyCandidates { kind: "styles" };
        assert_eq!(err.to_string(), "SAMPLER empty collection: no styles available");
    }

    #[test]
    fn test_invalid_seed_message_quotes_input() {
        let err = SamplerError::InvalidSeed("abc".to_string());
        assert!(err.to_string().contains("\"abc\""), "got: {}", err);
    }
}
