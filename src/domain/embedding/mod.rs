//! Query embedding and similarity scoring
//!
//! Embeddings are a cheap proxy for query content, used only to find
//! near-duplicate queries. They never decide cache identity.

mod embedder;
mod similarity;

pub use embedder::{CharSumEmbedder, Embedder};
pub use similarity::{is_match, normalize, similarity};

#[cfg(test)]
pub use embedder::mock::MockEmbedder;
