//! # lex-search
//!
//! Retrieval tools for the Lexa research agent.
//!
//! Three tools sit on top of the lake's narrow store traits:
//! - `get_legislation`: ranked phrase search, deduplicated by reference id
//! - `get_linked`: fragments sharing a cited section with a reference id
//! - `get_referrers`: fragments of other acts citing into a reference id's section
//!
//! [`RetrievalTools::dispatch`] executes a model tool call by name and returns
//! the JSON citation list the run loop consumes.

pub mod catalogue;
pub mod error;
pub mod tools;

pub use catalogue::{LegislationArgs, ReferenceArgs, ToolDefinition, ToolName, tool_definitions};
pub use error::SearchError;
pub use tools::{DEFAULT_LIMIT, RetrievalTools};
