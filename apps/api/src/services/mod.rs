//! Business logic services for Bookshelf
//!
//! This module contains:
//! - Library mutations and their policies
//! - Sample data seeding
//! - Health checks

pub mod health;
pub mod library;
pub mod seed;

pub use health::{HealthCheckResponse, HealthService, ServiceHealth, ServiceStatus};
pub use library::{
    AddBook, AuthorDeletePolicy, LibraryService, MutationPolicy, TitlePolicy, UpdateBook,
};
pub use seed::{seed_library, SeedReport};
