//! # Markbind Markup
//!
//! UXML markup parser and node tree.
//!
//! This crate provides:
//! - A parser turning UXML text into an ordered tree of [`MarkupNode`]s
//! - Raw string attribute storage with truth-string helpers
//! - Depth-first traversal of the parsed tree

pub mod error;
pub mod node;
pub mod parser;

pub use error::ParseError;
pub use node::{MarkupNode, NAME_ATTRIBUTE};
pub use parser::{parse_document, parse_file};
