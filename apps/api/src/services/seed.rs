//! Sample library seeding
//!
//! Inserts a small fixed library into an entity store. Seeding is idempotent:
//! authors are matched by name and books by title, so running it against an
//! already seeded store inserts nothing.

use serde::Serialize;
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::models::{parse_publication_date, NewAuthor, NewBook};
use crate::repositories::SharedStore;

/// A seeded book, linked to its author by name
struct SeedBook {
    title: &'static str,
    author: &'static str,
    publication_date: &'static str,
    categories: &'static [&'static str],
}

const SEED_AUTHORS: &[&str] = &[
    "Kate Chopin",
    "Paul Auster",
    "Sylvia Plath",
    "George Orwell",
    "F. Scott Fitzgerald",
    "ROLLIN Clément",
];

const SEED_BOOKS: &[SeedBook] = &[
    SeedBook {
        title: "The Awakening",
        author: "Kate Chopin",
        publication_date: "1899-04-22",
        categories: &["Fiction", "Classics"],
    },
    SeedBook {
        title: "City of Glass",
        author: "Paul Auster",
        publication_date: "1985-03-12",
        categories: &["Fiction", "Mystery"],
    },
    SeedBook {
        title: "The Bell Jar",
        author: "Sylvia Plath",
        publication_date: "1963-01-14",
        categories: &["Fiction", "Autobiographical"],
    },
    SeedBook {
        title: "1984",
        author: "George Orwell",
        publication_date: "1949-06-08",
        categories: &["Dystopian", "Political Fiction"],
    },
    SeedBook {
        title: "The Great Gatsby",
        author: "F. Scott Fitzgerald",
        publication_date: "1925-04-10",
        categories: &["Fiction", "Classics"],
    },
    SeedBook {
        title: "Les aventures de Clément",
        author: "ROLLIN Clément",
        publication_date: "2021-05-27",
        categories: &["Aventure", "Découverte"],
    },
];

/// Counts of what a seeding run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub authors_inserted: usize,
    pub authors_skipped: usize,
    pub books_inserted: usize,
    pub books_skipped: usize,
}

impl SeedReport {
    /// True when the run inserted nothing
    pub fn is_noop(&self) -> bool {
        self.authors_inserted == 0 && self.books_inserted == 0
    }
}

/// Seed the sample library into `store`
#[instrument(skip(store))]
pub async fn seed_library(store: &SharedStore) -> ApiResult<SeedReport> {
    let mut report = SeedReport::default();

    for &name in SEED_AUTHORS {
        if store.find_author_by_name(name).await?.is_some() {
            tracing::info!(name, "Author already present, skipping");
            report.authors_skipped += 1;
            continue;
        }
        let author = store.create_author(NewAuthor::new(name)).await?;
        tracing::info!(author_id = author.id, name, "Seeded author");
        report.authors_inserted += 1;
    }

    for seed in SEED_BOOKS {
        if store.find_book_by_title(seed.title).await?.is_some() {
            tracing::info!(title = seed.title, "Book already present, skipping");
            report.books_skipped += 1;
            continue;
        }

        let Some(author) = store.find_author_by_name(seed.author).await? else {
            tracing::warn!(
                title = seed.title,
                author = seed.author,
                "Author missing for seeded book, skipping"
            );
            report.books_skipped += 1;
            continue;
        };

        let publication_date = parse_publication_date(seed.publication_date)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let book = store
            .create_book(NewBook {
                title: seed.title.to_string(),
                author_id: author.id,
                publication_date,
                categories: seed.categories.iter().map(|c| c.to_string()).collect(),
            })
            .await?;
        tracing::info!(book_id = book.id, title = seed.title, "Seeded book");
        report.books_inserted += 1;
    }

    tracing::info!(?report, "Library seeding complete");
    Ok(report)
}
