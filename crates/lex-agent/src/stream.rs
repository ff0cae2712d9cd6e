//! Drives an [`AgentRunner`] over an event stream as a lazy stream of snapshots.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use lex_lake::CitationLookup;

use crate::error::RunError;
use crate::events::AgentEvent;
use crate::runner::{AgentRunner, OngoingResult};

/// Logs when the consumer drops the progress stream, finished or not.
struct RunDropGuard {
    query: String,
}

impl Drop for RunDropGuard {
    fn drop(&mut self) {
        tracing::debug!(query = %self.query, "research progress stream closed");
    }
}

/// Run `runner` over `events`, yielding each snapshot as soon as it exists.
///
/// Nothing happens until the stream is polled. The first error ends the
/// stream. Dropping the stream early drops `events` and the store handle with
/// it, releasing whatever the event source holds open.
pub fn run_events<S>(
    mut runner: AgentRunner,
    events: S,
    store: Arc<dyn CitationLookup>,
) -> impl Stream<Item = Result<OngoingResult, RunError>>
where
    S: Stream<Item = Result<AgentEvent, RunError>>,
{
    let guard = RunDropGuard {
        query: runner.query().to_string(),
    };

    async_stream::try_stream! {
        let _guard = guard;
        let mut events = std::pin::pin!(events);
        while let Some(event) = events.next().await {
            let snapshots = runner.handle(event?, store.as_ref()).await?;
            for snapshot in snapshots {
                yield snapshot;
            }
        }
    }
}
