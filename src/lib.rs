//! Collection-scoped content store for retrieval-augmented generation.
//!
//! Raw text is chunked and normalized deterministically, embedded through an
//! OpenAI-compatible API, and stored per collection in PostgreSQL with
//! pgvector. Queries embed free text and rank a collection's items by cosine
//! similarity.

pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use cli::{Cli, Commands};
pub use models::{Config, OutputFormat};
