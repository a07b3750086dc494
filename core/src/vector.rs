//! Sparse TF-IDF vectors and the similarity functions built on them.

use crate::index::InvertedIndex;
use std::collections::BTreeMap;

/// Term → weight. Only finite, strictly positive weights are stored; the ordered map keeps every
/// reduction over a vector in the same order from one run to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: BTreeMap<String, f64>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, term: impl Into<String>, weight: f64) {
        let term = term.into();
        if weight.is_finite() && weight > 0.0 {
            self.weights.insert(term, weight);
        } else {
            self.weights.remove(&term);
        }
    }

    pub fn get(&self, term: &str) -> f64 { self.weights.get(term).copied().unwrap_or(0.0) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> { self.weights.iter().map(|(t, &w)| (t.as_str(), w)) }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn norm(&self) -> f64 { self.weights.values().map(|w| w * w).sum::<f64>().sqrt() }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small.iter().map(|(t, w)| w * large.get(t)).sum()
    }

    pub fn normalized(&self) -> SparseVector {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        let mut out = SparseVector::new();
        for (t, w) in self.iter() {
            out.insert(t, w / norm);
        }
        out
    }

    /// Squared Euclidean distance over the union of both supports.
    pub fn squared_distance(&self, other: &SparseVector) -> f64 {
        let mut sum = 0.0;
        for (t, w) in self.iter() {
            let d = w - other.get(t);
            sum += d * d;
        }
        for (t, w) in other.iter() {
            if !self.weights.contains_key(t) {
                sum += w * w;
            }
        }
        sum
    }

    /// Component-wise mean; an empty slice yields the empty vector.
    pub fn mean<'a>(vectors: impl IntoIterator<Item = &'a SparseVector>) -> SparseVector {
        let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
        let mut count = 0usize;
        for v in vectors {
            count += 1;
            for (t, w) in v.iter() {
                *sums.entry(t).or_insert(0.0) += w;
            }
        }
        let mut out = SparseVector::new();
        if count == 0 {
            return out;
        }
        for (t, s) in sums {
            out.insert(t, s / count as f64);
        }
        out
    }
}

/// `dot(a, b) / (|a| |b|)`, 0 when either norm is 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f64 { 1.0 - cosine_similarity(a, b) }

/// `ln(1 + tf) * idf` per term. Terms the index has never seen are dropped.
pub fn tfidf_vector<S: AsRef<str>>(tokens: &[S], index: &InvertedIndex) -> SparseVector {
    let mut tf: BTreeMap<&str, u32> = BTreeMap::new();
    for t in tokens {
        *tf.entry(t.as_ref()).or_insert(0) += 1;
    }
    let mut v = SparseVector::new();
    for (term, count) in tf {
        if let Some(idf) = index.idf(term) {
            v.insert(term, (count as f64).ln_1p() * idf);
        }
    }
    v
}
