//! Answer types.

use crate::types::DocumentId;
use serde::{Deserialize, Serialize};

/// Where an answer came from: a passage and the quoted span of its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document: DocumentId,

    /// Passage index within the document
    pub passage: usize,

    /// Page number of the passage
    pub page: u32,

    /// Quoted range within the page, in characters
    pub start_char: usize,
    pub end_char: usize,

    /// The page text between the offsets, line breaks included
    pub quote: String,
}

/// A ranked passage handed back as supporting context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPassage {
    pub passage: usize,
    pub page: u32,
    pub score: f64,

    /// Short snippet of the passage (truncated if needed)
    pub snippet: String,
}

/// Answer to a question about one document.
///
/// When `found` is false nothing in the document matched the question and
/// `answer` is a fixed "no relevant content" message without citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub answer: String,
    pub found: bool,
    pub citations: Vec<Citation>,
    pub context: Vec<ContextPassage>,
}

impl Answer {
    /// The answer given when ranking returned nothing.
    pub fn no_context(query: &str) -> Self {
        Self {
            query: query.to_string(),
            answer: format!(
                "No relevant content found for \"{}\" in this document.",
                query.trim()
            ),
            found: false,
            citations: Vec::new(),
            context: Vec::new(),
        }
    }
}

/// One step of a streamed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum AnswerEvent {
    /// A word of the answer text
    Token(String),

    Citation(Citation),

    /// End of the stream
    Done,
}
