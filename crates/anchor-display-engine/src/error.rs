use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The trigger pattern guarantees at least one `#`; reaching the composer
    /// without a heading means a caller skipped it.
    #[error("heading path for note `{note}` has no heading to compose")]
    MissingHeading { note: String },

    #[error("no suggestion list is open")]
    NoActiveSuggestions,

    #[error("candidate {index} out of range, {len} candidates listed")]
    CandidateOutOfRange { index: usize, len: usize },
}
