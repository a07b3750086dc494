//! BM25 Okapi ranking.

use crate::config::{BM25_B, BM25_K1};
use crate::index::InvertedIndex;
use crate::methods::vsm::{rank, to_ranked};
use crate::output::RankedResult;
use crate::segment::Document;
use crate::DocId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self { Self { k1: BM25_K1, b: BM25_B } }
}

/// Contribution of one query term: `idf * f * (k1 + 1) / (f + k1 * (1 - b + b * dl / avgdl))`.
pub fn term_score(idf: f64, tf: f64, doc_len: f64, avgdl: f64, params: Bm25Params) -> f64 {
    let Bm25Params { k1, b } = params;
    let len_ratio = if avgdl > 0.0 { doc_len / avgdl } else { 0.0 };
    idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * len_ratio))
}

/// Scores every document against the query tokens. Each query token counts once per occurrence.
pub fn bm25_scores(query_tokens: &[String], index: &InvertedIndex, params: Bm25Params) -> Vec<(DocId, f64)> {
    if query_tokens.is_empty() || index.num_docs == 0 {
        return Vec::new();
    }
    let avgdl = index.average_doc_length();
    let mut scores = vec![0.0f64; index.num_docs];
    for token in query_tokens {
        let Some(idf) = index.idf(token) else { continue };
        for posting in index.postings(token) {
            let dl = index.doc_length(posting.doc_id) as f64;
            scores[posting.doc_id] += term_score(idf, posting.tf as f64, dl, avgdl, params);
        }
    }
    rank(scores.into_iter().enumerate().collect())
}

pub fn bm25_search(query_tokens: &[String], docs: &[Document], index: &InvertedIndex, params: Bm25Params) -> RankedResult {
    let scored = bm25_scores(query_tokens, index, params);
    tracing::debug!(hits = scored.len(), k1 = params.k1, b = params.b, "bm25 search");
    RankedResult { ranked_documents: to_ranked(&scored, docs) }
}
