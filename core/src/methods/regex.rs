use crate::config::REGEX_SIZE_LIMIT;
use crate::error::{IrError, Result};
use crate::output::{RegexMatch, RegexResult};
use crate::segment::Document;
use regex::{Regex, RegexBuilder};

pub const NO_MATCHES_MESSAGE: &str = "No matches were found for the given regular expression.";

/// Compiles a user pattern, case-insensitive.
pub fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| IrError::InvalidPattern(e.to_string()))
}

pub fn regex_search(re: &Regex, docs: &[Document]) -> RegexResult {
    let mut matches = Vec::new();
    for doc in docs {
        let highlights = char_spans(re, &doc.content);
        if highlights.is_empty() {
            continue;
        }
        matches.push(RegexMatch {
            doc_id: doc.display_id(),
            name: doc.name.clone(),
            content: doc.content.clone(),
            highlights,
        });
    }
    tracing::debug!(matched_docs = matches.len(), "regex search");
    if matches.is_empty() {
        RegexResult::NoMatches { message: NO_MATCHES_MESSAGE.to_string() }
    } else {
        RegexResult::Matches { matches }
    }
}

/// Non-overlapping, non-empty match spans as `[start, end)` character offsets.
fn char_spans(re: &Regex, text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    // byte offset -> char offset, advanced monotonically since matches arrive in order
    let mut byte_pos = 0usize;
    let mut char_pos = 0usize;
    let mut to_char = |byte: usize| {
        char_pos += text[byte_pos..byte].chars().count();
        byte_pos = byte;
        char_pos
    };
    for m in re.find_iter(text) {
        if m.start() == m.end() {
            continue;
        }
        let start = to_char(m.start());
        let end = to_char(m.end());
        spans.push((start, end));
    }
    spans
}
