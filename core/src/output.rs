//! Per-method result types and their wire shapes.

use crate::segment::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRef {
    pub doc_id: usize,
    pub name: String,
    pub content: String,
}

impl From<&Document> for DocRef {
    fn from(doc: &Document) -> Self {
        Self { doc_id: doc.display_id(), name: doc.name.clone(), content: doc.content.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexMatch {
    pub doc_id: usize,
    pub name: String,
    pub content: String,
    /// `[start, end)` character offsets into `content`.
    pub highlights: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegexResult {
    Matches { matches: Vec<RegexMatch> },
    NoMatches { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanResult {
    pub matched_documents: Vec<DocRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDoc {
    pub doc_id: usize,
    pub name: String,
    pub score: f64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub ranked_documents: Vec<ScoredDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub ranked_documents: Vec<ScoredDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_query: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub added_terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    /// Cluster index (as a string key on the wire) → members. Every index below `num_clusters`
    /// is present; empty clusters map to an empty list.
    pub clusters: BTreeMap<String, Vec<DocRef>>,
    pub num_clusters: usize,
    pub inertia: f64,
    pub iterations: usize,
}

/// One result type per method, serialized into the method's own shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MethodOutput {
    Regex(RegexResult),
    Boolean(BooleanResult),
    Ranked(RankedResult),
    Feedback(FeedbackResult),
    Clusters(ClusterResult),
}

/// Wire body for any failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
