use crate::index::InvertedIndex;
use crate::output::{RankedResult, ScoredDoc};
use crate::segment::Document;
use crate::vector::{cosine_similarity, tfidf_vector, SparseVector};
use crate::DocId;
use std::cmp::Ordering;

/// Cosine similarity between the TF-IDF query vector and every document vector.
pub fn vsm_scores(query_tokens: &[String], docs: &[Document], index: &InvertedIndex) -> Vec<(DocId, f64)> {
    let q = tfidf_vector(query_tokens, index);
    if q.is_empty() {
        return Vec::new();
    }
    let doc_vectors: Vec<SparseVector> = docs.iter().map(|d| tfidf_vector(&d.tokens, index)).collect();
    let scored = doc_vectors
        .iter()
        .enumerate()
        .map(|(id, d)| (id, cosine_similarity(&q, d)))
        .collect();
    rank(scored)
}

/// Drops non-positive scores, sorts by descending score then ascending id.
pub fn rank(mut scored: Vec<(DocId, f64)>) -> Vec<(DocId, f64)> {
    scored.retain(|&(_, s)| s > 0.0);
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
    scored
}

pub fn to_ranked(scored: &[(DocId, f64)], docs: &[Document]) -> Vec<ScoredDoc> {
    scored
        .iter()
        .map(|&(id, score)| {
            let doc = &docs[id];
            ScoredDoc { doc_id: doc.display_id(), name: doc.name.clone(), score, content: doc.content.clone() }
        })
        .collect()
}

pub fn vsm_search(query_tokens: &[String], docs: &[Document], index: &InvertedIndex) -> RankedResult {
    let scored = vsm_scores(query_tokens, docs, index);
    tracing::debug!(hits = scored.len(), "vsm search");
    RankedResult { ranked_documents: to_ranked(&scored, docs) }
}
