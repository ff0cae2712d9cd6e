//! A recorded research transcript replayed through the progress stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use lex_agent::{AgentEvent, AgentRunner, RunError, run_events};
use lex_lake::{LegalLake, PhraseRow};
use lex_verify::MarkdownStyle;
use pretty_assertions::assert_eq;
use serde_json::json;

const CRIMES_160: &str = "# Crimes Act 1961\n## 160 Culpable homicide\nHomicide may be culpable.";
const SENTENCING_8: &str = "# Sentencing Act 2002\n## 8 Principles\nThe court must take into account.";

fn lake() -> Arc<LegalLake> {
    let lake = LegalLake::open_in_memory().unwrap();
    let row = |id: &str, text: &str| PhraseRow {
        id: id.to_string(),
        text: text.to_string(),
        phrase: String::new(),
        embedding: Vec::new(),
    };
    lake.store_phrases(&[row("CA1961-160-1", CRIMES_160), row("SA2002-8-1", SENTENCING_8)])
        .unwrap();
    Arc::new(lake)
}

fn transcript() -> Vec<AgentEvent> {
    let events = json!([
        {"kind": "user_prompt", "prompt": "Is homicide always culpable?"},
        {"kind": "model_request", "parts": [
            {"part_kind": "system-prompt", "content": "You are a legal researcher."},
            {"part_kind": "user-prompt", "content": "Is homicide always culpable?"}
        ]},
        {"kind": "call_tools", "parts": [
            {"part_kind": "tool-call", "tool_name": "get_legislation", "tool_call_id": "t1",
             "args": "{'query': 'culpable homicide'}"}
        ]},
        {"kind": "model_request", "parts": [
            {"part_kind": "tool-return", "tool_name": "get_legislation", "tool_call_id": "t1",
             "content": [{"reference": "CA1961-160-1", "text": CRIMES_160}]}
        ]},
        {"kind": "call_tools", "parts": [
            {"part_kind": "text", "content": "Checking who cites section 160."},
            {"part_kind": "tool-call", "tool_name": "get_referrers", "tool_call_id": "t2",
             "args": {"reference_id": "CA1961-160-1"}}
        ]},
        {"kind": "model_request", "parts": [
            {"part_kind": "tool-return", "tool_name": "get_referrers", "tool_call_id": "t2",
             "content": [{"reference": "SA2002-8-1", "text": SENTENCING_8}]}
        ]},
        {"kind": "call_tools", "parts": [
            {"part_kind": "text", "content": "I have enough to answer."}
        ]},
        {"kind": "end", "output": "Is homicide always culpable?\n---\nNo: see [CA1961-160-1] and SA2002-8-1."}
    ]);
    serde_json::from_value(events).unwrap()
}

#[tokio::test]
async fn replay_emits_one_snapshot_per_meaningful_event() {
    let runner = AgentRunner::new("Is homicide always culpable?").with_style(MarkdownStyle {
        css_class: None,
        demote_levels: 2,
    });
    let events = futures_util::stream::iter(transcript().into_iter().map(Ok));
    let snapshots: Vec<_> = run_events(runner, events, lake())
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    // prompt, call t1, return t1, call t2, return t2, end
    assert_eq!(snapshots.len(), 6);
    assert!(snapshots[..5].iter().all(|s| !s.complete && s.final_text.is_empty()));

    assert_eq!(
        snapshots[4].logging,
        "### Followed Referrers\nLooking for any passages that reference this text:\n\
         Crimes Act 1961 / 160 Culpable homicide\n\n> Homicide may be culpable.\
         \n\n#### 1 References found\n- Sentencing Act 2002 (1)\n"
    );
    assert_eq!(
        snapshots[4].summary,
        "## Act Fragments processed\n- Crimes Act 1961 (1)\n- Sentencing Act 2002 (1)"
    );

    let last = &snapshots[5];
    assert!(last.complete);
    assert!(last.logging.is_empty() && last.summary.is_empty());
    assert_eq!(
        last.final_text,
        "Is homicide always culpable?\n---\n\n\
         No: see [CA1961-160-1](#ca-1961-160-1) and [SA2002-8-1](#sa-2002-8-1).\n\n\
         ---\n## CA1961-160-1\n### Crimes Act 1961\n#### 160 Culpable homicide\nHomicide may be culpable.\n\
         ---\n## SA2002-8-1\n### Sentencing Act 2002\n#### 8 Principles\nThe court must take into account."
    );
}

#[tokio::test]
async fn stream_stops_at_first_fatal_error() {
    let mut events: Vec<Result<AgentEvent, RunError>> = transcript().into_iter().map(Ok).collect();
    events.insert(2, Err(RunError::Upstream("model connection reset".to_string())));

    let results: Vec<_> = run_events(AgentRunner::new("q"), futures_util::stream::iter(events), lake())
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(&results[1], Err(RunError::Upstream(msg)) if msg == "model connection reset"));
}

/// Sets its flag when the event source holding it is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn stopping_early_releases_store_and_events() {
    let lake = lake();
    let events_dropped = Arc::new(AtomicBool::new(false));
    let flag = DropFlag(Arc::clone(&events_dropped));
    let events = futures_util::stream::iter(transcript().into_iter().map(Ok)).map(move |event| {
        let _held = &flag;
        event
    });

    let progress = run_events(AgentRunner::new("q"), events, lake.clone());
    let first_two: Vec<_> = progress.take(2).collect().await;

    assert_eq!(first_two.len(), 2);
    assert!(first_two.iter().all(Result::is_ok));
    assert!(events_dropped.load(Ordering::SeqCst));
    assert_eq!(Arc::strong_count(&lake), 1);
}
