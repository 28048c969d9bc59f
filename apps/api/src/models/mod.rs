//! Domain models for Bookshelf
//!
//! This module contains the records stored by the entity store:
//! - Authors
//! - Books, plus the create and partial-update inputs for them

pub mod author;
pub mod book;

pub use author::{Author, NewAuthor};
pub use book::{parse_publication_date, Book, BookPatch, NewBook, SortOrder, DATE_FORMAT};
