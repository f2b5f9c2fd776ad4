use crate::generate::Generator;
use crate::index::{Document, DocumentId, Index, IndexStats};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::sync::Arc;

pub const NO_CONTEXT_MESSAGE: &str = "No relevant information found in the knowledge base.";
const CONTEXT_HEADER: &str = "Relevant information from the knowledge base:";
const CONTEXT_FOOTER: &str = "Use this information to answer the question.";

/// Retrieved documents plus the context block built from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub context: String,
    pub documents: Vec<Document>,
}

/// Generator output plus the documents that grounded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub documents: Vec<Document>,
}

/// Glue between the index and a generator: retrieve, assemble context, ask.
#[derive(Clone)]
pub struct RagPipeline {
    index: Arc<Index>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(index: Arc<Index>, top_k: usize) -> Self {
        Self { index, top_k }
    }

    pub fn index(&self) -> &Arc<Index> {
        &self.index
    }

    pub fn process_query(&self, question: &str) -> QueryContext {
        let documents = self.index.search_similar(question, self.top_k);
        let context = if documents.is_empty() {
            NO_CONTEXT_MESSAGE.to_string()
        } else {
            build_context(&documents)
        };
        QueryContext { context, documents }
    }

    /// Retrieve context for `question` and ask `generator`. Without matching
    /// documents the generator sees the bare question.
    pub fn answer(&self, question: &str, generator: &dyn Generator) -> Result<Answer> {
        let retrieved = self.process_query(question);
        let prompt = if retrieved.documents.is_empty() {
            question.to_string()
        } else {
            format!("{}\n\nQuestion: {}", retrieved.context, question)
        };
        tracing::debug!(documents = retrieved.documents.len(), prompt_len = prompt.len(), "asking generator");
        let answer = generator.ask(&prompt).context("generator failed")?;
        Ok(Answer { answer, documents: retrieved.documents })
    }

    pub fn add_document(&self, content: &str) -> DocumentId {
        self.index.add_document(content)
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// Header, one numbered line per document, closing instruction.
pub fn build_context(documents: &[Document]) -> String {
    if documents.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(CONTEXT_HEADER);
    out.push_str("\n\n");
    for (i, doc) in documents.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, doc.content);
    }
    out.push('\n');
    out.push_str(CONTEXT_FOOTER);
    out
}
