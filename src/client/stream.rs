use std::io::{BufRead, BufReader, Read};
use tracing::{debug, warn};

use super::types::Answer;
use crate::{RagError, Result};

/// Drain a newline-delimited JSON stream of `Answer` events
///
/// Reads the body line by line, decodes each line as one event, hands it
/// to `on_chunk`, and accumulates the assembled answer: content fragments
/// are appended in arrival order and the last non-empty role wins (the
/// server sends the role on the final event).
///
/// A line that fails to decode does not terminate the stream: the
/// callback receives an empty placeholder event and reading continues.
/// An `Err` from the callback stops reading immediately and is returned
/// verbatim; this is the caller's cancellation mechanism. A read error
/// other than clean end-of-stream is a transport fault. In every case the
/// reader (and with it the underlying connection) is released when this
/// function returns.
pub(crate) fn collect_stream<R, F>(body: R, on_chunk: &mut F) -> Result<Answer>
where
    R: Read,
    F: FnMut(Answer) -> Result<()>,
{
    let mut reader = BufReader::new(body);
    let mut aggregate = Answer::default();
    let mut line = String::new();
    let mut malformed_lines = 0u32;

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .map_err(|e| RagError::Transport(format!("Stream read failed: {e}")))?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        let event: Answer = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed stream line: {}", e);
                malformed_lines += 1;
                on_chunk(Answer::default())?;
                continue;
            }
        };

        aggregate.message.content.push_str(&event.message.content);
        if !event.message.role.is_empty() {
            aggregate.message.role = event.message.role.clone();
        }
        if !event.model.is_empty() {
            aggregate.model = event.model.clone();
        }
        aggregate.done = event.done;

        on_chunk(event)?;
    }

    if malformed_lines > 0 {
        debug!(
            "Stream ended with {} malformed lines dropped",
            malformed_lines
        );
    }

    Ok(aggregate)
}
