//! The six retrieval methods. Each takes already segmented documents and, where it needs term
//! statistics, the request's shared [`crate::index::InvertedIndex`].

pub mod bm25;
pub mod boolean;
pub mod feedback;
pub mod kmeans;
pub mod regex;
pub mod vsm;
