//! In-memory retrieval core: tokenization, term-frequency vectors and cosine ranking
//! over a small, fully scanned document collection.

pub mod config;
pub mod generate;
pub mod index;
pub mod pipeline;
pub mod seed;
pub mod tokenizer;

pub use config::RetrievalConfig;
pub use index::{cosine_similarity, Document, DocumentId, DocumentVector, Index, IndexStats, ScoredDocument, TermId, Vocabulary};
pub use tokenizer::{Script, Tokenizer};
