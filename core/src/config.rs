//! Compile-time defaults for the retrieval engine.
//!
//! Runtime overrides go through [`crate::engine::EngineConfig`], which the binaries fill from
//! CLI arguments.

/// Tokens with fewer characters than this are dropped by the tokenizer.
pub const MIN_TOKEN_CHARS: usize = 4;

/// BM25 term frequency saturation.
pub const BM25_K1: f64 = 1.5;

/// BM25 document length normalization. 0.0 disables it, 1.0 is full normalization.
pub const BM25_B: f64 = 0.75;

/// Seed of the k-means++ initialization when the caller does not pick one.
pub const KMEANS_DEFAULT_SEED: u64 = 42;

/// Upper bound on assign/update rounds.
pub const KMEANS_MAX_ITERATIONS: usize = 50;

/// Seeded k-means runs per request; the one with the lowest inertia is kept.
pub const KMEANS_RESTARTS: usize = 10;

/// Number of terms relevance feedback appends to a query.
pub const FEEDBACK_EXPANSION_TERMS: usize = 3;

/// Deepest nesting of parentheses and `NOT` a boolean query may use.
pub const BOOLEAN_MAX_DEPTH: usize = 256;

/// Compiled regex size limit for user patterns (bytes).
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;
