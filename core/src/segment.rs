use crate::error::{IrError, Result};
use crate::tokenizer::Tokenizer;
use crate::DocId;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKER: Regex = Regex::new(r"^\s*---\s+Document:\s*(\S.*?)\s+---\s*$").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    pub content: String,
    pub tokens: Vec<String>,
}

impl Document {
    /// 1-based identifier used on the wire.
    pub fn display_id(&self) -> usize { self.id + 1 }
}

/// Splits raw corpus text into (name, content) pairs.
///
/// Text with `--- Document: <name> ---` marker lines yields one document per marker. Text without
/// markers yields one document per non-blank line, named `Document <n>`.
pub fn split_documents(raw: &str) -> Vec<(String, String)> {
    if raw.lines().any(|l| MARKER.is_match(l)) {
        split_on_markers(raw)
    } else {
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, l)| (format!("Document {}", i + 1), l.to_string()))
            .collect()
    }
}

fn split_on_markers(raw: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut preamble = false;
    for line in raw.lines() {
        if let Some(caps) = MARKER.captures(line) {
            if let Some((name, body)) = current.take() {
                push_block(&mut out, name, &body);
            }
            current = Some((caps[1].to_string(), Vec::new()));
            continue;
        }
        match current.as_mut() {
            Some((_, body)) => body.push(line),
            None => preamble |= !line.trim().is_empty(),
        }
    }
    if let Some((name, body)) = current.take() {
        push_block(&mut out, name, &body);
    }
    if preamble {
        tracing::warn!("dropping text before the first document marker");
    }
    out
}

fn push_block(out: &mut Vec<(String, String)>, name: String, body: &[&str]) {
    let content = body.join("\n").trim().to_string();
    if content.is_empty() {
        tracing::debug!(%name, "skipping empty document");
        return;
    }
    out.push((name, content));
}

/// Segments and tokenizes a corpus. Ids are contiguous from 0 in segmentation order.
pub fn segment(raw: &str, tokenizer: &Tokenizer) -> Result<Vec<Document>> {
    let docs: Vec<Document> = split_documents(raw)
        .into_iter()
        .enumerate()
        .map(|(id, (name, content))| {
            let tokens = tokenizer.tokenize(&content);
            Document { id, name, content, tokens }
        })
        .collect();
    if docs.is_empty() {
        return Err(IrError::EmptyCorpus);
    }
    tracing::debug!(num_docs = docs.len(), "segmented corpus");
    Ok(docs)
}
