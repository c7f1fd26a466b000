//! Ask command handler.
//!
//! Answers a question from the best-ranked passages of one document,
//! optionally streaming the answer word by word.

use super::{open_engine, print_json};
use clap::Args;
use clauseiq_core::{config::AppConfig, AppResult};
use clauseiq_engine::{answer_stream, Answer, AnswerEvent, DocumentId};
use futures::StreamExt;
use std::io::Write;

/// Ask a question about a document
#[derive(Args, Debug)]
pub struct AskCommand {
    /// Document id
    pub id: String,

    /// The question to ask
    pub question: String,

    /// Number of passages to retrieve (default from engine config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Stream the answer word by word
    #[arg(long)]
    pub stream: bool,

    /// Output as JSON (one event per line when streaming)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command for document '{}'", self.id);

        let engine = open_engine(config)?;
        let answer = engine.ask(&DocumentId::new(self.id.as_str()), &self.question, self.top_k)?;

        tracing::debug!(
            "Answer found: {}, citations: {}, context: {}",
            answer.found,
            answer.citations.len(),
            answer.context.len()
        );

        if self.stream {
            let pacing = engine.config().answer.pacing();
            self.handle_streaming(answer, pacing).await
        } else if self.json {
            print_json(&answer)
        } else {
            print_answer(&answer);
            Ok(())
        }
    }

    /// Print events as they arrive.
    async fn handle_streaming(&self, answer: Answer, pacing: std::time::Duration) -> AppResult<()> {
        let mut stream = Box::pin(answer_stream(answer, pacing));
        let mut stdout = std::io::stdout();
        let mut first_citation = true;

        while let Some(event) = stream.next().await {
            if self.json {
                writeln!(stdout, "{}", serde_json::to_string(&event)?)?;
                continue;
            }

            match event {
                AnswerEvent::Token(token) => write!(stdout, "{} ", token)?,
                AnswerEvent::Citation(citation) => {
                    if first_citation {
                        writeln!(stdout, "\n\nSources:")?;
                        first_citation = false;
                    }
                    writeln!(
                        stdout,
                        "- passage {} (page {}, chars {}-{})",
                        citation.passage, citation.page, citation.start_char, citation.end_char
                    )?;
                }
                AnswerEvent::Done => writeln!(stdout)?,
            }
            stdout.flush()?;
        }

        Ok(())
    }
}

fn print_answer(answer: &Answer) {
    println!("Answer:");
    println!("{}", answer.answer);
    println!();

    if answer.citations.is_empty() {
        println!("Sources: (no matching passages)");
        return;
    }

    println!("Sources:");
    for citation in &answer.citations {
        let quote = citation.quote.split_whitespace().collect::<Vec<_>>().join(" ");
        println!(
            "- passage {} (page {}, chars {}-{}): \"{}\"",
            citation.passage, citation.page, citation.start_char, citation.end_char, quote
        );
    }

    if answer.context.len() > 1 {
        println!();
        println!("Related passages:");
        for context in answer.context.iter().skip(1) {
            println!(
                "- passage {} (page {}, score {:.3}): {}",
                context.passage, context.page, context.score, context.snippet
            );
        }
    }
}
