//! Pulls rows from a cursor, converts them and pushes them to a sink.

use std::future::Future;
use std::path::Path;

use sluice_common::{Error, Result, RowRecord, SchemaDescriptor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::sink::{FileSummary, OutputSink, RowWriter};
use crate::source::{RawRow, ResultCursor};

/// Lifecycle of one conversion.
///
/// `Closed` and `Failed` are terminal. There is no resume: a failed
/// conversion has to be started again from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Init,
    Open,
    Streaming,
    Finalizing,
    Closed,
    Failed,
}

impl StreamState {
    pub fn can_transition_to(self, next: StreamState) -> bool {
        use StreamState::*;
        matches!(
            (self, next),
            (Init, Open)
                | (Init, Failed)
                | (Open, Streaming)
                | (Open, Failed)
                | (Streaming, Finalizing)
                | (Streaming, Failed)
                | (Finalizing, Closed)
                | (Finalizing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Closed | StreamState::Failed)
    }
}

/// Drives the fetch/convert/emit loop for one result cursor.
///
/// The streamer owns the cursor; it is dropped when [`RowStreamer::run`]
/// returns, whichever way it returns.
pub struct RowStreamer<C: ResultCursor> {
    cursor: C,
    schema: SchemaDescriptor,
    state: StreamState,
    rows_read: u64,
    cancel: Option<CancellationToken>,
}

impl<C: ResultCursor> RowStreamer<C> {
    pub fn new(cursor: C, schema: SchemaDescriptor) -> Self {
        Self { cursor, schema, state: StreamState::Init, rows_read: 0, cancel: None }
    }

    /// Stop as soon as `token` is cancelled, including while a pull is
    /// still waiting on the cursor.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    /// Open `path` on `sink`, stream every row into it and finalize it.
    ///
    /// On failure the writer is aborted and finalize is never called. The
    /// destination may still be left behind in a partial state if the sink
    /// cannot remove it.
    pub async fn run<S: OutputSink>(mut self, sink: &S, path: &Path) -> Result<FileSummary> {
        debug!(schema = %self.schema.to_message_type(), "Opening output");
        let mut writer = match sink.open(&self.schema, path) {
            Ok(writer) => writer,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(StreamState::Open);

        if let Err(e) = self.stream_rows(&mut writer).await {
            writer.abort();
            return Err(self.fail(e));
        }

        self.transition(StreamState::Finalizing);
        match writer.finalize() {
            Ok(summary) => {
                self.transition(StreamState::Closed);
                info!(
                    path = %summary.path.display(),
                    rows = summary.rows,
                    row_groups = summary.row_groups,
                    "Output finalized"
                );
                Ok(summary)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn stream_rows<W: RowWriter>(&mut self, writer: &mut W) -> Result<()> {
        self.transition(StreamState::Streaming);
        loop {
            let pull = self.cursor.next_row();
            let Some(raw) = until_cancelled(self.cancel.as_ref(), self.rows_read, pull).await? else {
                break;
            };
            let record = self.to_record(raw)?;
            writer.write(&record)?;
            self.rows_read += 1;
        }
        // A fault that surfaced after the last row still voids the output.
        until_cancelled(self.cancel.as_ref(), self.rows_read, self.cursor.finish()).await?;
        debug!(rows = self.rows_read, "Cursor exhausted");
        Ok(())
    }

    fn to_record(&self, raw: RawRow) -> Result<RowRecord> {
        if raw.len() != self.schema.len() {
            return Err(Error::write(
                self.rows_read,
                "*",
                format!("expected {} cells, cursor returned {}", self.schema.len(), raw.len()),
            ));
        }
        let mut record = RowRecord::with_capacity(raw.len());
        for (field, cell) in self.schema.fields.iter().zip(raw) {
            record.push(&field.name, cell.map(into_text));
        }
        Ok(record)
    }

    fn transition(&mut self, next: StreamState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "Stream state");
        self.state = next;
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(kind = error.kind(), rows = self.rows_read, state = ?self.state, "Conversion failed: {}", error);
        self.transition(StreamState::Failed);
        error
    }
}

/// Awaits `fut` unless `token` is cancelled first, in which case `fut` is
/// dropped and [`Error::Cancelled`] is returned.
pub async fn until_cancelled<T, F>(token: Option<&CancellationToken>, rows_read: u64, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(token) = token else {
        return fut.await;
    };
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Cancelled { rows_read }),
        result = fut => result,
    }
}

fn into_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        use StreamState::*;
        let path = [Init, Open, Streaming, Finalizing, Closed];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failed_is_absorbing() {
        use StreamState::*;
        for state in [Open, Streaming, Finalizing] {
            assert!(state.can_transition_to(Failed));
        }
        for next in [Init, Open, Streaming, Finalizing, Closed, Failed] {
            assert!(!Failed.can_transition_to(next));
            assert!(!Closed.can_transition_to(next));
        }
        assert!(Failed.is_terminal() && Closed.is_terminal());
    }

    #[test]
    fn test_no_skipping_or_retry() {
        use StreamState::*;
        assert!(!Init.can_transition_to(Streaming));
        assert!(!Open.can_transition_to(Finalizing));
        assert!(!Streaming.can_transition_to(Open));
        assert!(!Finalizing.can_transition_to(Streaming));
    }

    #[tokio::test]
    async fn test_until_cancelled_drops_pending_future() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<()> = until_cancelled(Some(&token), 4, std::future::pending()).await;
        assert!(matches!(result, Err(Error::Cancelled { rows_read: 4 })));
    }

    #[tokio::test]
    async fn test_until_cancelled_passes_result_through() {
        let token = CancellationToken::new();
        assert_eq!(until_cancelled(Some(&token), 0, async { Ok(7) }).await.unwrap(), 7);
        assert_eq!(until_cancelled(None, 0, async { Ok(8) }).await.unwrap(), 8);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(into_text(b"caf\xe9".to_vec()), "caf\u{fffd}");
        assert_eq!(into_text(b"plain".to_vec()), "plain");
    }
}
