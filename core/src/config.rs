use crate::tokenizer::Script;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Similarity a document must exceed to count as a match.
pub const DEFAULT_RELEVANCE_FLOOR: f32 = 0.05;
/// Number of documents handed to the generator per question.
pub const DEFAULT_TOP_K: usize = 3;

pub const ENV_SCRIPT: &str = "RAG_SCRIPT";
pub const ENV_RELEVANCE_FLOOR: &str = "RAG_RELEVANCE_FLOOR";
pub const ENV_TOP_K: &str = "RAG_TOP_K";

/// Tunables for tokenization and ranking. Neither the floor nor `top_k` has a
/// canonical value; deployments pick them per corpus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub script: Script,
    pub relevance_floor: f32,
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { script: Script::default(), relevance_floor: DEFAULT_RELEVANCE_FLOOR, top_k: DEFAULT_TOP_K }
    }
}

impl RetrievalConfig {
    /// Defaults overridden by `RAG_SCRIPT`, `RAG_RELEVANCE_FLOOR` and `RAG_TOP_K`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RetrievalConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = non_empty(lookup(ENV_SCRIPT)) {
            cfg.script = v.parse().with_context(|| format!("invalid {ENV_SCRIPT}"))?;
        }
        if let Some(v) = non_empty(lookup(ENV_RELEVANCE_FLOOR)) {
            cfg.relevance_floor = v
                .trim()
                .parse()
                .with_context(|| format!("invalid {ENV_RELEVANCE_FLOOR}: {v:?}"))?;
        }
        if let Some(v) = non_empty(lookup(ENV_TOP_K)) {
            cfg.top_k = v.trim().parse().with_context(|| format!("invalid {ENV_TOP_K}: {v:?}"))?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// The floor must be a finite similarity in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.relevance_floor.is_finite() || !(0.0..=1.0).contains(&self.relevance_floor) {
            bail!("relevance floor must be within [0, 1], got {}", self.relevance_floor);
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
