//! Streamed generator output
//!
//! A [`TextStream`] is a finite, non-restartable sequence of text fragments.
//! It ends exactly once, either completed or failed; asking for more after the
//! end repeats the terminal event.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    Fragment(String),
    Completed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Termination {
    Completed,
    Failed(String),
}

/// Everything a stream produced before it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedText {
    pub text: String,
    pub termination: Termination,
}

pub struct TextStream {
    inner: BoxStream<'static, anyhow::Result<String>>,
    ended: Option<Termination>,
}

impl TextStream {
    pub fn new(fragments: impl Stream<Item = anyhow::Result<String>> + Send + 'static) -> Self {
        Self {
            inner: fragments.boxed(),
            ended: None,
        }
    }

    /// A stream over already-known fragments
    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(fragments.into_iter().map(Ok)))
    }

    pub fn is_finished(&self) -> bool {
        self.ended.is_some()
    }

    /// Pull the next fragment; empty fragments are skipped
    pub async fn next_event(&mut self) -> StreamEvent {
        if let Some(end) = &self.ended {
            return end.clone().into();
        }

        loop {
            match self.inner.next().await {
                Some(Ok(text)) if text.is_empty() => continue,
                Some(Ok(text)) => return StreamEvent::Fragment(text),
                Some(Err(e)) => {
                    let end = Termination::Failed(e.to_string());
                    self.ended = Some(end.clone());
                    return end.into();
                }
                None => {
                    self.ended = Some(Termination::Completed);
                    return StreamEvent::Completed;
                }
            }
        }
    }

    /// Drain the stream, calling `on_progress` with the text so far after each fragment
    pub async fn collect_with(mut self, mut on_progress: impl FnMut(&str)) -> CollectedText {
        let mut text = String::new();
        loop {
            match self.next_event().await {
                StreamEvent::Fragment(fragment) => {
                    text.push_str(&fragment);
                    on_progress(&text);
                }
                StreamEvent::Completed => {
                    return CollectedText {
                        text,
                        termination: Termination::Completed,
                    };
                }
                StreamEvent::Failed(error) => {
                    return CollectedText {
                        text,
                        termination: Termination::Failed(error),
                    };
                }
            }
        }
    }
}

impl From<Termination> for StreamEvent {
    fn from(end: Termination) -> Self {
        match end {
            Termination::Completed => StreamEvent::Completed,
            Termination::Failed(error) => StreamEvent::Failed(error),
        }
    }
}

impl std::fmt::Debug for TextStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStream")
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}
