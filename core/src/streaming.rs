//! Streaming consumer
//!
//! Turns a provider chunk stream into a sequence of running totals. Each
//! update carries the whole reply so far, so the receiver only ever replaces
//! text.

use crate::error::ProviderError;
use crate::gemini::{AiProvider, ChatHandle, ChunkStream};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

/// Reply text shown when a chat stream fails
pub const CHAT_ERROR_MESSAGE: &str = "Error: Could not get response from AI.";

/// Buffered updates per stream before the producer waits
const UPDATE_BUFFER: usize = 100;

/// Progress of a streamed reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Accumulated text after another chunk arrived
    Partial(String),
    /// The stream ended; final text
    Finished(String),
    /// The stream failed; text to keep instead of the partial reply
    Failed(String),
}

impl StreamUpdate {
    /// Text carried by the update
    pub fn text(&self) -> &str {
        match self {
            StreamUpdate::Partial(t) | StreamUpdate::Finished(t) | StreamUpdate::Failed(t) => t,
        }
    }

    /// Whether no further updates follow
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamUpdate::Partial(_))
    }
}

/// How draining a stream ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Every chunk was consumed
    Completed {
        /// Final reply text
        text: String,
        /// Number of chunks received
        chunk_count: usize,
    },
    /// The provider reported an error
    Failed(ProviderError),
    /// The receiver went away before the stream ended
    Cancelled,
}

/// Pull every chunk from `stream`, publishing the running total after each
///
/// Stops pulling as soon as the receiver is dropped.
pub async fn drain_stream(
    mut stream: ChunkStream,
    updates: &mpsc::Sender<StreamUpdate>,
) -> StreamOutcome {
    let mut text = String::new();
    let mut chunk_count = 0usize;

    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => {
                chunk_count += 1;
                text.push_str(&chunk);
                if updates.send(StreamUpdate::Partial(text.clone())).await.is_err() {
                    // Receiver dropped, stop reading
                    debug!(chunk_count = chunk_count, "Stream receiver dropped");
                    return StreamOutcome::Cancelled;
                }
            }
            Err(e) => {
                error!(error = %e, chunk_count = chunk_count, "Chat stream failed");
                let _ = updates
                    .send(StreamUpdate::Failed(CHAT_ERROR_MESSAGE.to_string()))
                    .await;
                return StreamOutcome::Failed(e);
            }
        }
    }

    if updates.send(StreamUpdate::Finished(text.clone())).await.is_err() {
        return StreamOutcome::Cancelled;
    }
    info!(
        chunk_count = chunk_count,
        response_len = text.len(),
        "Chat stream finished"
    );
    StreamOutcome::Completed { text, chunk_count }
}

/// Start streaming a reply on a background task
///
/// Must be called from within a tokio runtime. A stream that cannot be opened
/// produces a single [`StreamUpdate::Failed`].
pub fn spawn_reply_stream<P>(
    provider: Arc<P>,
    handle: ChatHandle,
    message: String,
) -> mpsc::Receiver<StreamUpdate>
where
    P: AiProvider + ?Sized + 'static,
{
    let (tx, rx) = mpsc::channel(UPDATE_BUFFER);

    tokio::spawn(async move {
        match provider.stream_reply(&handle, &message).await {
            Ok(stream) => {
                drain_stream(stream, &tx).await;
            }
            Err(e) => {
                error!(error = %e, model = %handle.model, "Failed to open chat stream");
                let _ = tx
                    .send(StreamUpdate::Failed(CHAT_ERROR_MESSAGE.to_string()))
                    .await;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn chunks(items: Vec<Result<&str, ProviderError>>) -> ChunkStream {
        let owned: Vec<Result<String, ProviderError>> = items
            .into_iter()
            .map(|r| r.map(str::to_string))
            .collect();
        Box::pin(tokio_stream::iter(owned))
    }

    async fn drain_all(rx: &mut mpsc::Receiver<StreamUpdate>) -> Vec<StreamUpdate> {
        let mut out = Vec::new();
        while let Some(update) = rx.recv().await {
            out.push(update);
        }
        out
    }

    #[tokio::test]
    async fn test_running_totals() {
        let (tx, mut rx) = mpsc::channel(16);
        let outcome = drain_stream(chunks(vec![Ok("Hel"), Ok("lo")]), &tx).await;
        drop(tx);

        assert_eq!(
            outcome,
            StreamOutcome::Completed {
                text: "Hello".to_string(),
                chunk_count: 2
            }
        );
        assert_eq!(
            drain_all(&mut rx).await,
            vec![
                StreamUpdate::Partial("Hel".to_string()),
                StreamUpdate::Partial("Hello".to_string()),
                StreamUpdate::Finished("Hello".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_stream_finishes_empty() {
        let (tx, mut rx) = mpsc::channel(16);
        drain_stream(chunks(vec![]), &tx).await;
        drop(tx);
        assert_eq!(
            drain_all(&mut rx).await,
            vec![StreamUpdate::Finished(String::new())]
        );
    }

    #[tokio::test]
    async fn test_failure_replaces_text() {
        let (tx, mut rx) = mpsc::channel(16);
        let outcome = drain_stream(
            chunks(vec![
                Ok("partial"),
                Err(ProviderError::Transport("reset".to_string())),
                Ok("ignored"),
            ]),
            &tx,
        )
        .await;
        drop(tx);

        assert_eq!(
            outcome,
            StreamOutcome::Failed(ProviderError::Transport("reset".to_string()))
        );
        let updates = drain_all(&mut rx).await;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1], StreamUpdate::Failed(CHAT_ERROR_MESSAGE.to_string()));
        assert!(updates[1].is_terminal());
        assert!(!updates[0].is_terminal());
    }

    #[tokio::test]
    async fn test_dropped_receiver_cancels() {
        let (tx, rx) = mpsc::channel(16);
        drop(rx);
        let outcome = drain_stream(chunks(vec![Ok("a"), Ok("b")]), &tx).await;
        assert_eq!(outcome, StreamOutcome::Cancelled);
    }

    struct FailingOpen;

    #[async_trait]
    impl AiProvider for FailingOpen {
        async fn generate_once(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::MissingApiKey)
        }

        async fn stream_reply(
            &self,
            _handle: &ChatHandle,
            _message: &str,
        ) -> Result<ChunkStream, ProviderError> {
            Err(ProviderError::MissingApiKey)
        }
    }

    #[tokio::test]
    async fn test_spawn_reply_stream_open_failure() {
        let provider = Arc::new(FailingOpen);
        let handle = provider.create_session("m", "", &[]);
        let mut rx = spawn_reply_stream(provider, handle, "hi".to_string());

        assert_eq!(
            drain_all(&mut rx).await,
            vec![StreamUpdate::Failed(CHAT_ERROR_MESSAGE.to_string())]
        );
    }
}
