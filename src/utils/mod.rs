//! Shared utilities.

pub mod retry;
pub mod text;

pub use text::{normalize_whitespace, split_numbered, strip_mentions, strip_urls};
