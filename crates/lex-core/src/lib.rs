//! # lex-core
//!
//! Core types shared across all Lexa crates:
//! - [`Citation`] and [`CheckedCitation`], the two shapes a piece of legislative
//!   text takes on its way from the retrieval tools to the final document
//! - the reference-id grammar and the anchor rule derived from it
//! - the terminal model output ([`LlmResult`] / [`ModelOutput`])

pub mod citation;
pub mod output;
pub mod reference;

pub use citation::{CheckedCitation, Citation, demote_headings};
pub use output::{LlmResult, ModelOutput};
pub use reference::{ALTERNATE_PREFIX, anchor_for, document_prefix, find_references, is_reference};
