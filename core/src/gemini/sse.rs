//! Server-sent event decoding for streamed replies

use super::types::GenerateContentResponse;
use super::ChunkStream;
use crate::error::ProviderError;
use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};

/// Turn a `streamGenerateContent?alt=sse` body into reply text chunks
///
/// The stream ends after the first error.
pub(crate) fn reply_chunks<S, B, E>(byte_stream: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ProviderError> + Send + 'static,
{
    let events = byte_stream
        .map(|result| result.map_err(Into::<ProviderError>::into))
        .eventsource();

    let stream = async_stream::stream! {
        let mut events = Box::pin(events);
        while let Some(next) = events.next().await {
            let parsed = match next {
                Ok(event) => text_from_event(&event.data),
                Err(e) => Err(transport_error(e)),
            };
            match parsed {
                Ok(Some(text)) => {
                    yield Ok(text);
                }
                Ok(None) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
    };

    Box::pin(stream)
}

/// Text carried by one event; `None` for keep-alives and empty deltas
fn text_from_event(data: &str) -> Result<Option<String>, ProviderError> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let event: GenerateContentResponse = serde_json::from_str(data)
        .map_err(|e| ProviderError::InvalidResponse(format!("{} - event: {}", e, data)))?;

    if let Some(reason) = event.block_reason() {
        return Err(ProviderError::Blocked(reason.to_string()));
    }

    let text = event.text();
    Ok((!text.is_empty()).then_some(text))
}

fn transport_error(err: EventStreamError<ProviderError>) -> ProviderError {
    match err {
        EventStreamError::Transport(inner) => inner,
        other => ProviderError::Transport(other.to_string()),
    }
}
