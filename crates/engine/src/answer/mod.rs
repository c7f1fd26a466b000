//! Question answering over ranked passages.
//!
//! Ranking happens first and completely; [`assemble`] then picks the quoted
//! sentence and citations, and [`answer_stream`] can replay the finished
//! answer as paced events.

mod assemble;
mod stream;
pub mod types;

pub use assemble::assemble;
pub use stream::answer_stream;
pub use types::{Answer, AnswerEvent, Citation, ContextPassage};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Answer presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Delay between streamed words, in milliseconds
    #[serde(default = "default_stream_pacing_ms")]
    pub stream_pacing_ms: u64,

    /// Maximum characters per context snippet
    #[serde(default = "default_max_snippet_chars")]
    pub max_snippet_chars: usize,
}

fn default_stream_pacing_ms() -> u64 {
    50
}

fn default_max_snippet_chars() -> usize {
    150
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            stream_pacing_ms: default_stream_pacing_ms(),
            max_snippet_chars: default_max_snippet_chars(),
        }
    }
}

impl AnswerConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.stream_pacing_ms)
    }
}
