//! K-means over L2-normalized TF-IDF document vectors with cosine distance.
//!
//! Initialization is k-means++ driven by a seeded xorshift64 generator, so a fixed seed always
//! produces the same clustering. The full run is repeated from several derived seeds and the
//! lowest-inertia result wins.

use crate::config::{KMEANS_DEFAULT_SEED, KMEANS_MAX_ITERATIONS, KMEANS_RESTARTS};
use crate::error::{IrError, Result};
use crate::index::InvertedIndex;
use crate::output::{ClusterResult, DocRef};
use crate::segment::Document;
use crate::vector::{cosine_distance, tfidf_vector, SparseVector};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Golden-ratio increment between restart seeds.
const RESTART_SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KMeansParams {
    pub seed: u64,
    pub max_iterations: usize,
    pub restarts: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self { seed: KMEANS_DEFAULT_SEED, max_iterations: KMEANS_MAX_ITERATIONS, restarts: KMEANS_RESTARTS }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<DocId>,
    pub centroid: SparseVector,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub clusters: Vec<Cluster>,
    pub assignments: Vec<usize>,
    pub inertia: f64,
    pub iterations: usize,
}

/// Parses the `query` field of a clustering request into K. Rejects anything below 2; the upper
/// bound needs the corpus and is left to [`check_k`].
pub fn parse_k(raw: &str) -> Result<usize> {
    let k: i64 = raw
        .trim()
        .parse()
        .map_err(|_| IrError::InvalidK(format!("`{}` is not an integer", raw.trim())))?;
    if k < 2 {
        return Err(IrError::InvalidK(format!("need at least 2 clusters, got {k}")));
    }
    usize::try_from(k).map_err(|_| IrError::InvalidK(format!("{k} clusters is too many")))
}

/// Rejects K larger than the number of documents.
pub fn check_k(k: usize, num_docs: usize) -> Result<usize> {
    if k > num_docs {
        return Err(IrError::InvalidK(format!("{k} clusters requested but the corpus has only {num_docs} documents")));
    }
    Ok(k)
}

/// One seeded k-means run. At least one assignment pass always happens.
pub fn kmeans(vectors: &[SparseVector], k: usize, seed: u64, max_iterations: usize) -> Clustering {
    let n = vectors.len();
    let max_iterations = max_iterations.max(1);
    let mut centroids = init_plus_plus(vectors, k, seed);
    let mut assignments = vec![usize::MAX; n];
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let mut changed = false;
        for (i, v) in vectors.iter().enumerate() {
            let best = nearest(v, &centroids);
            if assignments[i] != best {
                assignments[i] = best;
                changed = true;
            }
        }
        if !changed {
            break;
        }
        for (ci, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&SparseVector> = (0..n).filter(|&i| assignments[i] == ci).map(|i| &vectors[i]).collect();
            // empty clusters keep their previous centroid
            if !members.is_empty() {
                *centroid = SparseVector::mean(members);
            }
        }
    }

    let inertia = vectors.iter().zip(&assignments).map(|(v, &c)| v.squared_distance(&centroids[c])).sum();
    let clusters = centroids
        .into_iter()
        .enumerate()
        .map(|(id, centroid)| Cluster { id, members: (0..n).filter(|&i| assignments[i] == id).collect(), centroid })
        .collect();
    Clustering { clusters, assignments, inertia, iterations }
}

/// Runs `restarts` seeded k-means (at least one) and keeps the lowest inertia, earliest on ties.
pub fn kmeans_best_of(vectors: &[SparseVector], k: usize, params: KMeansParams) -> Clustering {
    let mut best = kmeans(vectors, k, params.seed, params.max_iterations);
    for restart in 1..params.restarts {
        let seed = params.seed.wrapping_add((restart as u64).wrapping_mul(RESTART_SEED_STEP));
        let run = kmeans(vectors, k, seed, params.max_iterations);
        if run.inertia < best.inertia {
            tracing::trace!(restart, inertia = run.inertia, "better restart");
            best = run;
        }
    }
    best
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest(v: &SparseVector, centroids: &[SparseVector]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (ci, c) in centroids.iter().enumerate() {
        let d = cosine_distance(v, c);
        if d < best_dist {
            best_dist = d;
            best = ci;
        }
    }
    best
}

fn init_plus_plus(vectors: &[SparseVector], k: usize, seed: u64) -> Vec<SparseVector> {
    let n = vectors.len();
    let mut rng = XorShift64::new(seed);
    let mut centroids = Vec::with_capacity(k);
    centroids.push(vectors[rng.next_usize() % n].clone());
    let mut min_dists = vec![f64::INFINITY; n];

    while centroids.len() < k {
        let last = centroids.last().cloned().unwrap_or_default();
        let mut total = 0.0;
        for (i, v) in vectors.iter().enumerate() {
            let d = cosine_distance(v, &last);
            let d2 = d * d;
            if d2 < min_dists[i] {
                min_dists[i] = d2;
            }
            total += min_dists[i];
        }
        if total < 1e-30 {
            // every document coincides with a chosen centroid
            centroids.push(vectors[rng.next_usize() % n].clone());
            continue;
        }
        let threshold = rng.next_f64() * total;
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (i, &d) in min_dists.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumulative += d;
            chosen = Some(i);
            if cumulative >= threshold {
                break;
            }
        }
        let chosen = chosen.unwrap_or(n - 1);
        centroids.push(vectors[chosen].clone());
    }
    centroids
}

/// xorshift64, seeded explicitly.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        Self { state: seed ^ 0x517c_c1b7_2722_0a95 }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_usize(&mut self) -> usize { self.next_u64() as usize }

    fn next_f64(&mut self) -> f64 { (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64 }
}

pub fn cluster_documents(docs: &[Document], index: &InvertedIndex, k: usize, params: KMeansParams) -> ClusterResult {
    let vectors: Vec<SparseVector> = docs.iter().map(|d| tfidf_vector(&d.tokens, index).normalized()).collect();
    let clustering = kmeans_best_of(&vectors, k, params);
    tracing::debug!(k, iterations = clustering.iterations, inertia = clustering.inertia, "k-means finished");

    let clusters: BTreeMap<String, Vec<DocRef>> = clustering
        .clusters
        .iter()
        .map(|c| (c.id.to_string(), c.members.iter().map(|&id| DocRef::from(&docs[id])).collect()))
        .collect();
    ClusterResult { clusters, num_clusters: k, inertia: clustering.inertia, iterations: clustering.iterations }
}
