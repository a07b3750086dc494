//! Simplified Rocchio feedback: grow the query with the most frequent terms of the documents the
//! caller marked relevant, then rank again with the vector space model.

use crate::error::{IrError, Result};
use crate::index::InvertedIndex;
use crate::methods::vsm::{to_ranked, vsm_scores};
use crate::output::FeedbackResult;
use crate::segment::Document;
use crate::tokenizer::Tokenizer;
use std::collections::{BTreeSet, HashMap, HashSet};

pub const FIRST_ROUND_MESSAGE: &str =
    "Initial ranking. Mark the relevant documents and send their docIds as relevantDocIds to expand the query.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub expanded_query: String,
    pub added_terms: Vec<String>,
}

struct Candidate {
    surface: String,
    count: usize,
    first_seen: usize,
}

/// Picks up to `max_terms` new terms from the relevant documents, most frequent first, ties in
/// order of first appearance. Words are counted and compared with the query by their stem; each
/// stem is reported as the first word seen for it.
pub fn expand_query(query: &str, relevant: &[&Document], tokenizer: &Tokenizer, max_terms: usize) -> Result<Expansion> {
    if relevant.is_empty() {
        return Err(IrError::NoRelevantDocuments);
    }
    let present: HashSet<String> = tokenizer.tokenize(query).into_iter().collect();

    let mut by_stem: HashMap<String, Candidate> = HashMap::new();
    let mut seen = 0usize;
    for doc in relevant {
        for surface in tokenizer.surface_terms(&doc.content) {
            let stem = tokenizer.stem(&surface);
            by_stem.entry(stem).or_insert_with(|| Candidate { surface, count: 0, first_seen: seen }).count += 1;
            seen += 1;
        }
    }
    let mut candidates: Vec<Candidate> =
        by_stem.into_iter().filter(|(stem, _)| !present.contains(stem)).map(|(_, c)| c).collect();
    candidates.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));

    let added_terms: Vec<String> = candidates.into_iter().take(max_terms).map(|c| c.surface).collect();
    if added_terms.is_empty() {
        return Err(IrError::NoNewTerms);
    }
    let expanded_query = format!("{} {}", query.trim(), added_terms.join(" "));
    Ok(Expansion { expanded_query, added_terms })
}

/// First round: plain VSM ranking with guidance. Feedback round: expand and rank again.
pub fn relevance_feedback(
    query: &str,
    relevant_doc_ids: Option<&[usize]>,
    docs: &[Document],
    index: &InvertedIndex,
    tokenizer: &Tokenizer,
    max_terms: usize,
) -> Result<FeedbackResult> {
    let Some(judged) = relevant_doc_ids else {
        let scored = vsm_scores(&tokenizer.tokenize(query), docs, index);
        return Ok(FeedbackResult {
            ranked_documents: to_ranked(&scored, docs),
            message: Some(FIRST_ROUND_MESSAGE.to_string()),
            expanded_query: None,
            added_terms: Vec::new(),
        });
    };

    let judged: BTreeSet<usize> = judged.iter().copied().collect();
    let relevant: Vec<&Document> = docs.iter().filter(|d| judged.contains(&d.display_id())).collect();
    let expansion = expand_query(query, &relevant, tokenizer, max_terms)?;
    tracing::debug!(relevant = relevant.len(), added = ?expansion.added_terms, "expanded query");

    let scored = vsm_scores(&tokenizer.tokenize(&expansion.expanded_query), docs, index);
    Ok(FeedbackResult {
        ranked_documents: to_ranked(&scored, docs),
        message: None,
        expanded_query: Some(expansion.expanded_query),
        added_terms: expansion.added_terms,
    })
}
