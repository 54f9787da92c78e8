//! Token counting for LLM budgeting
//!
//! BPE encodings come from tiktoken (cl100k_base by default). When an
//! encoding cannot be loaded, counting degrades to a character-class
//! heuristic instead of failing the read.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

use crate::host::TokenCounter;

/// Supported token encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base (GPT-4, GPT-3.5-turbo; approximates Claude)
    #[default]
    Cl100k,
    /// o200k_base (GPT-4o)
    O200k,
    /// Character-class estimate, no BPE
    Heuristic,
}

static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

impl TokenModel {
    fn bpe(&self) -> Option<&'static CoreBPE> {
        let loaded = match self {
            TokenModel::Cl100k => &*CL100K_BPE,
            TokenModel::O200k => &*O200K_BPE,
            TokenModel::Heuristic => return None,
        };
        match loaded {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                tracing::warn!(
                    model = %self,
                    error = %e,
                    "falling back to heuristic token estimate"
                );
                None
            }
        }
    }

    pub fn available_models() -> &'static [&'static str] {
        &["cl100k", "o200k", "gpt4", "gpt4o", "claude3", "heuristic"]
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Heuristic => "heuristic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "default" | "gpt4" | "gpt-4" | "gpt-3.5-turbo"
            | "claude" | "claude3" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" | "gpt4o" | "gpt-4o" => Ok(TokenModel::O200k),
            "heuristic" | "fast" | "estimate" => Ok(TokenModel::Heuristic),
            _ => Err(format!(
                "Unknown model: {}. Available: {}",
                s,
                TokenModel::available_models().join(", ")
            )),
        }
    }
}

/// Count tokens in text using the specified model
pub fn count_tokens(text: &str, model: TokenModel) -> usize {
    if text.is_empty() {
        return 0;
    }

    match model.bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens_heuristic(text),
    }
}

/// Estimate tokens without BPE encoding
///
/// Roughly 4 ASCII chars per token, 2 per code symbol, 1.5 per CJK
/// character and 2 per other non-ASCII character.
pub fn estimate_tokens_heuristic(text: &str) -> usize {
    let (mut ascii, mut symbols, mut cjk, mut other) = (0usize, 0usize, 0usize, 0usize);

    for c in text.chars() {
        if c.is_ascii() {
            if c.is_ascii_punctuation() {
                symbols += 1;
            } else {
                ascii += 1;
            }
        } else if is_cjk_char(c) {
            cjk += 1;
        } else {
            other += 1;
        }
    }

    ascii.div_ceil(4) + symbols.div_ceil(2) + (cjk * 2).div_ceil(3) + other.div_ceil(2)
}

#[inline]
fn is_cjk_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF     // CJK Unified Ideographs
        | 0x3400..=0x4DBF   // Extension A
        | 0x3000..=0x30FF   // Symbols, Hiragana, Katakana
        | 0xAC00..=0xD7AF   // Hangul
        | 0xFF00..=0xFFEF) // Fullwidth
}

/// Local BPE counter behind the async `TokenCounter` seam
#[derive(Debug, Clone, Copy, Default)]
pub struct BpeCounter {
    model: TokenModel,
}

impl BpeCounter {
    pub fn new(model: TokenModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> TokenModel {
        self.model
    }
}

#[async_trait]
impl TokenCounter for BpeCounter {
    async fn count(&self, encoded: &str) -> Result<usize> {
        Ok(count_tokens(encoded, self.model))
    }
}
