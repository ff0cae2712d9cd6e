//! # lex-agent
//!
//! The research run loop of the Lexa legal research agent.
//!
//! A model driver (outside this crate) produces [`AgentEvent`]s: the user's
//! prompt, model responses carrying tool calls, requests carrying tool
//! returns, and the terminal output. [`AgentRunner`] turns them into
//! [`OngoingResult`] progress snapshots; the last one carries the verified,
//! link-formatted markdown answer.
//!
//! ```no_run
//! # async fn demo(lake: std::sync::Arc<lex_lake::LegalLake>, events: Vec<lex_agent::AgentEvent>) {
//! use futures_util::StreamExt;
//! use lex_agent::{AgentRunner, run_events};
//!
//! let events = futures_util::stream::iter(events.into_iter().map(Ok));
//! let progress = run_events(AgentRunner::new("Is it murder?"), events, lake);
//! let mut progress = std::pin::pin!(progress);
//! while let Some(snapshot) = progress.next().await {
//!     let snapshot = snapshot.expect("run failed");
//!     println!("{}", snapshot.logging);
//! }
//! # }
//! ```

pub mod args;
pub mod error;
pub mod events;
pub mod literal;
pub mod registry;
pub mod render;
pub mod runner;
pub mod stream;

#[cfg(test)]
mod testing;

pub use error::{ArgsError, RunError};
pub use events::{AgentEvent, RequestPart, ResponsePart, ToolArgs};
pub use registry::ReferenceRegistry;
pub use runner::{AgentRunner, OngoingResult, RunState};
pub use stream::run_events;
