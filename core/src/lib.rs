//! Retrieval methods engine: corpus segmentation, normalization, an inverted index and six
//! retrieval, ranking and clustering methods over it.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod methods;
pub mod output;
pub mod segment;
pub mod tokenizer;
pub mod vector;

pub type DocId = usize;

pub use engine::{Engine, EngineConfig, MethodId, SimulateRequest};
pub use error::{IrError, Result};
pub use index::InvertedIndex;
pub use output::MethodOutput;
pub use segment::Document;
