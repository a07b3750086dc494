use crate::segment::Document;
use crate::DocId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32,
}

/// Per-request inverted index. Built once and shared by every method that needs term statistics.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub postings: BTreeMap<String, Vec<Posting>>, // postings sorted by doc_id
    pub df: BTreeMap<String, u32>,
    pub idf: BTreeMap<String, f64>,
    pub doc_lengths: Vec<usize>,
    pub num_docs: usize,
}

impl InvertedIndex {
    pub fn build(docs: &[Document]) -> Self {
        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut doc_lengths = Vec::with_capacity(docs.len());
        for doc in docs {
            doc_lengths.push(doc.tokens.len());
            let mut tf: BTreeMap<&str, u32> = BTreeMap::new();
            for token in &doc.tokens {
                *tf.entry(token.as_str()).or_insert(0) += 1;
            }
            for (term, count) in tf {
                postings.entry(term.to_string()).or_default().push(Posting { doc_id: doc.id, tf: count });
            }
        }

        let num_docs = docs.len();
        let df: BTreeMap<String, u32> = postings.iter().map(|(t, p)| (t.clone(), p.len() as u32)).collect();
        let idf = df.iter().map(|(t, &d)| (t.clone(), smoothed_idf(num_docs, d))).collect();
        tracing::debug!(num_docs, num_terms = postings.len(), "built inverted index");
        Self { postings, df, idf, doc_lengths, num_docs }
    }

    pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }

    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn doc_length(&self, doc_id: DocId) -> usize { self.doc_lengths.get(doc_id).copied().unwrap_or(0) }

    pub fn average_doc_length(&self) -> f64 {
        if self.num_docs == 0 {
            return 0.0;
        }
        self.doc_lengths.iter().sum::<usize>() as f64 / self.num_docs as f64
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}

/// `ln((1 + N) / (1 + df)) + 1`, always positive.
pub fn smoothed_idf(num_docs: usize, df: u32) -> f64 {
    ((1.0 + num_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}
