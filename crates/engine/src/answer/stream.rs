//! Paced delivery of a finished answer.

use super::types::{Answer, AnswerEvent};
use futures::stream::{self, Stream, StreamExt};
use std::time::Duration;

/// Stream an answer word by word, then its citations, then `Done`.
///
/// The answer is complete before the first event; `pacing` only spaces the
/// word tokens out (no delay before the first one).
pub fn answer_stream(answer: Answer, pacing: Duration) -> impl Stream<Item = AnswerEvent> {
    let mut events: Vec<AnswerEvent> = answer
        .answer
        .split_whitespace()
        .map(|word| AnswerEvent::Token(word.to_string()))
        .collect();
    events.extend(answer.citations.into_iter().map(AnswerEvent::Citation));
    events.push(AnswerEvent::Done);

    stream::iter(events.into_iter().enumerate()).then(move |(i, event)| async move {
        if i > 0 && !pacing.is_zero() && matches!(event, AnswerEvent::Token(_)) {
            tokio::time::sleep(pacing).await;
        }
        event
    })
}
