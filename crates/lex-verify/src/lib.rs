//! # lex-verify
//!
//! Post-processing of a research run's final answer:
//! - [`CheckedResult::from_model_output`] extracts the cited reference ids and
//!   replaces each with the authoritative text from the citation store
//! - [`format_links`] rewrites reference ids in the response into anchor links
//! - [`CheckedResult::to_markdown`] assembles the final document
//!
//! Citation text shown to the reader always comes from the store, never from
//! the model.

pub mod checked;
pub mod error;
pub mod links;
pub mod markdown;

pub use checked::{CheckedResult, RESPONSE_DELIMITER, check_references};
pub use error::{CitationIssue, VerifyError};
pub use links::format_links;
pub use markdown::MarkdownStyle;
