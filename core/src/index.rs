use crate::config::RetrievalConfig;
use crate::tokenizer::Tokenizer;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type TermId = u32;
pub type DocumentId = String;
/// Dense normalized term-frequency weights, one entry per vocabulary slot.
pub type DocumentVector = Vec<f32>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Point-in-time counts taken under a single read lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub document_count: usize,
    pub vocabulary_size: usize,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} docs, {} words", self.document_count, self.vocabulary_size)
    }
}

/// Term -> slot mapping. Slots are dense, assigned in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    slots: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Scan documents in insertion order and assign each unseen term the next slot.
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut vocab = Self::default();
        for doc in documents {
            for term in &doc.tokens {
                vocab.intern(term);
            }
        }
        vocab
    }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&slot) = self.slots.get(term) {
            return slot;
        }
        let slot = self.terms.len() as TermId;
        self.slots.insert(term.to_string(), slot);
        self.terms.push(term.to_string());
        slot
    }

    pub fn slot(&self, term: &str) -> Option<TermId> {
        self.slots.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in slot order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Weight of each known term is its count divided by the largest count among
    /// known terms. Terms outside the vocabulary are ignored.
    pub fn vectorize(&self, tokens: &[String]) -> DocumentVector {
        let mut vector = vec![0.0f32; self.len()];
        if vector.is_empty() {
            return vector;
        }
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for token in tokens {
            if let Some(slot) = self.slot(token) {
                *counts.entry(slot).or_insert(0) += 1;
            }
        }
        let max = counts.values().copied().max().unwrap_or(0);
        if max == 0 {
            return vector;
        }
        for (slot, count) in counts {
            vector[slot as usize] = count as f32 / max as f32;
        }
        vector
    }
}

/// Cosine similarity over the shared prefix of `a` and `b`; 0 when either side has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a[..len].iter().zip(&b[..len]) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

#[derive(Default)]
struct IndexState {
    documents: Vec<Document>,
    // vectors[i] belongs to documents[i]
    vectors: Vec<DocumentVector>,
    vocabulary: Vocabulary,
    next_id: u64,
}

impl IndexState {
    /// Full vocabulary rebuild followed by re-vectorizing every document.
    fn rebuild(&mut self) {
        let vocabulary = Vocabulary::from_documents(&self.documents);
        let vectors = self.documents.iter().map(|doc| vocabulary.vectorize(&doc.tokens)).collect();
        self.vocabulary = vocabulary;
        self.vectors = vectors;
    }
}

/// In-memory document index with term-frequency vectors and cosine ranking.
///
/// Searches and stats take a shared lock; `add_document` holds the exclusive lock
/// for the whole rebuild so readers never see a vocabulary that disagrees with
/// the stored vectors.
pub struct Index {
    tokenizer: Tokenizer,
    relevance_floor: f32,
    state: RwLock<IndexState>,
}

impl Default for Index {
    fn default() -> Self {
        Self::new(&RetrievalConfig::default())
    }
}

impl Index {
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config.script),
            relevance_floor: config.relevance_floor,
            state: RwLock::new(IndexState::default()),
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn relevance_floor(&self) -> f32 {
        self.relevance_floor
    }

    /// Store `content` and return its id. Every stored vector may change as a result.
    pub fn add_document(&self, content: &str) -> DocumentId {
        let tokens = self.tokenizer.tokenize(content);
        let token_count = tokens.len();

        let mut state = self.state.write();
        let id = format!("doc_{}", state.next_id);
        state.next_id += 1;
        state.documents.push(Document { id: id.clone(), content: content.to_string(), tokens });
        state.rebuild();

        tracing::debug!(
            doc_id = %id,
            token_count,
            num_docs = state.documents.len(),
            vocabulary_size = state.vocabulary.len(),
            "added document"
        );
        id
    }

    /// Top `top_k` documents scoring above the configured relevance floor.
    pub fn search_similar(&self, query: &str, top_k: usize) -> Vec<Document> {
        self.search_scored(query, top_k).into_iter().map(|hit| hit.document).collect()
    }

    pub fn search_scored(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        self.search_scored_with_floor(query, top_k, self.relevance_floor)
    }

    /// Ranked by score descending; equal scores keep insertion order. Documents
    /// sharing no term with the query never match, whatever `floor` is.
    pub fn search_scored_with_floor(&self, query: &str, top_k: usize, floor: f32) -> Vec<ScoredDocument> {
        if top_k == 0 {
            return Vec::new();
        }
        let query_tokens = self.tokenizer.tokenize(query);

        let state = self.state.read();
        if state.documents.is_empty() {
            return Vec::new();
        }
        let query_vector = state.vocabulary.vectorize(&query_tokens);

        let mut scored: Vec<(usize, f32)> = state
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (i, cosine_similarity(&query_vector, vector)))
            .filter(|&(_, score)| score > 0.0 && score > floor)
            .collect();
        let total_hits = scored.len();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);

        tracing::debug!(query_terms = query_tokens.len(), total_hits, returned = scored.len(), "search");
        scored
            .into_iter()
            .map(|(i, score)| ScoredDocument { document: state.documents[i].clone(), score })
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats { document_count: state.documents.len(), vocabulary_size: state.vocabulary.len() }
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.state.read().documents.iter().find(|doc| doc.id == id).cloned()
    }

    /// Vocabulary slot currently assigned to `term`.
    pub fn term_slot(&self, term: &str) -> Option<TermId> {
        self.state.read().vocabulary.slot(term)
    }

    /// All stored documents in insertion order.
    pub fn documents(&self) -> Vec<Document> {
        self.state.read().documents.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
