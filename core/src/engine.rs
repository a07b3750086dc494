use crate::config::{FEEDBACK_EXPANSION_TERMS, KMEANS_DEFAULT_SEED, KMEANS_MAX_ITERATIONS, KMEANS_RESTARTS};
use crate::error::{IrError, Result};
use crate::index::InvertedIndex;
use crate::methods::bm25::{bm25_search, Bm25Params};
use crate::methods::{boolean, feedback, kmeans, regex, vsm};
use crate::output::MethodOutput;
use crate::segment::segment;
use crate::tokenizer::{StemmerKind, Tokenizer};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodId {
    Regex,
    Vsm,
    Boolean,
    Bm25,
    Clustering,
    Relevance,
}

impl MethodId {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodId::Regex => "regex",
            MethodId::Vsm => "vsm",
            MethodId::Boolean => "boolean",
            MethodId::Bm25 => "bm25",
            MethodId::Clustering => "clustering",
            MethodId::Relevance => "relevance",
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl std::str::FromStr for MethodId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regex" => Ok(MethodId::Regex),
            "vsm" => Ok(MethodId::Vsm),
            "boolean" => Ok(MethodId::Boolean),
            "bm25" => Ok(MethodId::Bm25),
            "clustering" => Ok(MethodId::Clustering),
            "relevance" => Ok(MethodId::Relevance),
            other => Err(format!("unknown method `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub method_id: MethodId,
    /// Search query, regex pattern, boolean expression, or K for clustering.
    #[serde(default)]
    pub query: String,
    /// Raw corpus text.
    #[serde(default)]
    pub documents: String,
    /// Wire `docId`s judged relevant. Only read by `relevance`; absent means a first round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_doc_ids: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub stemmer: StemmerKind,
    pub bm25: Bm25Params,
    pub kmeans_seed: u64,
    pub kmeans_max_iterations: usize,
    pub kmeans_restarts: usize,
    pub feedback_terms: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stemmer: StemmerKind::default(),
            bm25: Bm25Params::default(),
            kmeans_seed: KMEANS_DEFAULT_SEED,
            kmeans_max_iterations: KMEANS_MAX_ITERATIONS,
            kmeans_restarts: KMEANS_RESTARTS,
            feedback_terms: FEEDBACK_EXPANSION_TERMS,
        }
    }
}

/// Stateless dispatcher. Cloning is cheap; every call works on its own request only.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    tokenizer: Tokenizer,
}

impl Default for Engine {
    fn default() -> Self { Self::new(EngineConfig::default()) }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self { Self { tokenizer: Tokenizer::new(config.stemmer), config } }

    /// Validates the request, segments the corpus and runs the requested method.
    pub fn run(&self, req: &SimulateRequest) -> Result<MethodOutput> {
        let span = tracing::debug_span!("simulate", method = %req.method_id);
        let _enter = span.enter();

        if req.documents.trim().is_empty() {
            return Err(IrError::EmptyCorpus);
        }
        if req.method_id != MethodId::Clustering && req.query.trim().is_empty() {
            return Err(IrError::EmptyQuery);
        }

        let tok = &self.tokenizer;
        let out = match req.method_id {
            MethodId::Regex => {
                let re = regex::compile(&req.query)?;
                let docs = segment(&req.documents, tok)?;
                MethodOutput::Regex(regex::regex_search(&re, &docs))
            }
            MethodId::Boolean => {
                let expr = boolean::parse(&req.query, tok)?;
                let docs = segment(&req.documents, tok)?;
                MethodOutput::Boolean(boolean::boolean_search(&expr, &docs))
            }
            MethodId::Vsm => {
                let docs = segment(&req.documents, tok)?;
                let index = InvertedIndex::build(&docs);
                MethodOutput::Ranked(vsm::vsm_search(&tok.tokenize(&req.query), &docs, &index))
            }
            MethodId::Bm25 => {
                let docs = segment(&req.documents, tok)?;
                let index = InvertedIndex::build(&docs);
                MethodOutput::Ranked(bm25_search(&tok.tokenize(&req.query), &docs, &index, self.config.bm25))
            }
            MethodId::Clustering => {
                let k = kmeans::parse_k(&req.query)?;
                let docs = segment(&req.documents, tok)?;
                let k = kmeans::check_k(k, docs.len())?;
                let index = InvertedIndex::build(&docs);
                let params = kmeans::KMeansParams {
                    seed: self.config.kmeans_seed,
                    max_iterations: self.config.kmeans_max_iterations,
                    restarts: self.config.kmeans_restarts,
                };
                MethodOutput::Clusters(kmeans::cluster_documents(&docs, &index, k, params))
            }
            MethodId::Relevance => {
                let docs = segment(&req.documents, tok)?;
                let index = InvertedIndex::build(&docs);
                MethodOutput::Feedback(feedback::relevance_feedback(
                    &req.query,
                    req.relevant_doc_ids.as_deref(),
                    &docs,
                    &index,
                    tok,
                    self.config.feedback_terms,
                )?)
            }
        };
        Ok(out)
    }
}
