pub type Result<T> = std::result::Result<T, IrError>;

/// Validation and method failures surfaced to the caller as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    #[error("the corpus is empty: provide at least one document")]
    EmptyCorpus,

    #[error("the query is empty")]
    EmptyQuery,

    #[error("invalid regular expression: {0}")]
    InvalidPattern(String),

    #[error("malformed boolean query: {0}")]
    MalformedQuery(String),

    #[error("invalid number of clusters: {0}")]
    InvalidK(String),

    #[error("mark at least one document as relevant")]
    NoRelevantDocuments,

    #[error("relevant documents contain no terms that are not already in the query")]
    NoNewTerms,
}
