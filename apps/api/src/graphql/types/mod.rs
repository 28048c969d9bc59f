//! GraphQL type definitions for Bookshelf
//!
//! Each type wraps its stored model and resolves relationships through the
//! per-request loaders.

mod author;
mod book;

pub use author::Author;
pub use book::Book;
