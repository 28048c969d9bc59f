//! Library service for book and author mutations
//!
//! This module holds the write-side rules of the library:
//! - Input validation (non-empty names and titles, ISO publication dates)
//! - The "author must exist" precondition of `addBook`
//! - Title uniqueness and author deletion, as configurable policies
//!
//! Reads do not go through this service; resolvers query the store directly
//! or through the request loaders.

use std::str::FromStr;

use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    parse_publication_date, Author, Book, BookPatch, NewAuthor, NewBook, DATE_FORMAT,
};
use crate::repositories::SharedStore;

/// How book titles are constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePolicy {
    /// A title may be held by one book at a time
    #[default]
    Unique,
    /// Titles may repeat; title-keyed mutations act on the lowest-id match
    AllowDuplicates,
}

impl FromStr for TitlePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unique" => Ok(Self::Unique),
            "allow_duplicates" | "allow-duplicates" | "duplicates" => Ok(Self::AllowDuplicates),
            other => Err(format!(
                "expected 'unique' or 'allow_duplicates', got '{}'",
                other
            )),
        }
    }
}

/// What happens to an author's books when the author is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorDeletePolicy {
    /// Refuse to delete an author who still has books
    #[default]
    Restrict,
    /// Delete the author's books along with the author
    Cascade,
}

impl FromStr for AuthorDeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "restrict" => Ok(Self::Restrict),
            "cascade" => Ok(Self::Cascade),
            other => Err(format!("expected 'restrict' or 'cascade', got '{}'", other)),
        }
    }
}

/// Policies applied by mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationPolicy {
    pub titles: TitlePolicy,
    pub author_deletion: AuthorDeletePolicy,
}

/// Input of `addBook`
#[derive(Debug, Clone)]
pub struct AddBook {
    pub title: String,
    pub author_id: i32,
    pub publication_date: String,
    pub categories: Vec<String>,
}

/// Input of `updateBook`; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBook {
    pub title: String,
    pub new_title: Option<String>,
    pub new_publication_date: Option<String>,
    pub new_categories: Option<Vec<String>>,
}

/// Service for library mutations
#[derive(Clone)]
pub struct LibraryService {
    store: SharedStore,
    policy: MutationPolicy,
}

impl LibraryService {
    /// Create a new LibraryService
    pub fn new(store: SharedStore, policy: MutationPolicy) -> Self {
        Self { store, policy }
    }

    /// Create an author
    #[instrument(skip(self))]
    pub async fn add_author(&self, name: String) -> ApiResult<Author> {
        let name = require_non_empty("name", name)?;
        let author = self.store.create_author(NewAuthor { name }).await?;
        tracing::info!(author_id = author.id, name = %author.name, "Author added");
        Ok(author)
    }

    /// Create a book for an existing author
    ///
    /// Fails with `NotFound` before touching the store when the author does
    /// not exist.
    #[instrument(skip(self, input), fields(title = %input.title, author_id = input.author_id))]
    pub async fn add_book(&self, input: AddBook) -> ApiResult<Book> {
        let title = require_non_empty("title", input.title)?;
        let publication_date = parse_date(&input.publication_date)?;

        if self.store.find_author(input.author_id).await?.is_none() {
            return Err(ApiError::not_found("author", input.author_id.to_string()));
        }
        self.ensure_title_available(&title, None).await?;

        let book = self
            .store
            .create_book(NewBook {
                title,
                author_id: input.author_id,
                publication_date,
                categories: input.categories,
            })
            .await?;

        tracing::info!(book_id = book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// Partially update the book holding `input.title`
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn update_book(&self, input: UpdateBook) -> ApiResult<Book> {
        let book = self.find_by_title(&input.title).await?;

        let patch = BookPatch {
            title: input
                .new_title
                .map(|t| require_non_empty("newTitle", t))
                .transpose()?,
            publication_date: input
                .new_publication_date
                .as_deref()
                .map(parse_date)
                .transpose()?,
            categories: input.new_categories,
        };

        if let Some(new_title) = &patch.title {
            self.ensure_title_available(new_title, Some(book.id)).await?;
        }

        if patch.is_empty() {
            return Ok(book);
        }

        let updated = self
            .store
            .update_book(book.id, patch)
            .await?
            .ok_or_else(|| ApiError::not_found("book", input.title.clone()))?;

        tracing::info!(book_id = updated.id, title = %updated.title, "Book updated");
        Ok(updated)
    }

    /// Delete exactly one book holding `title`
    #[instrument(skip(self))]
    pub async fn delete_book(&self, title: &str) -> ApiResult<Book> {
        let book = self.find_by_title(title).await?;
        let deleted = self
            .store
            .delete_book(book.id)
            .await?
            .ok_or_else(|| ApiError::not_found("book", title))?;

        tracing::info!(book_id = deleted.id, title = %deleted.title, "Book deleted");
        Ok(deleted)
    }

    /// Delete an author according to the author deletion policy
    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: i32) -> ApiResult<Author> {
        let author = self
            .store
            .find_author(id)
            .await?
            .ok_or_else(|| ApiError::not_found("author", id.to_string()))?;

        let cascade = match self.policy.author_deletion {
            AuthorDeletePolicy::Cascade => true,
            AuthorDeletePolicy::Restrict => {
                let books = self.store.find_books_by_author_ids(&[id]).await?;
                if !books.is_empty() {
                    return Err(ApiError::conflict(
                        "books for author",
                        format!("{} ({} book(s))", id, books.len()),
                    ));
                }
                false
            }
        };

        if !self.store.delete_author(id, cascade).await? {
            return Err(ApiError::not_found("author", id.to_string()));
        }

        tracing::info!(author_id = id, cascade, "Author deleted");
        Ok(author)
    }

    async fn find_by_title(&self, title: &str) -> ApiResult<Book> {
        self.store
            .find_book_by_title(title)
            .await?
            .ok_or_else(|| ApiError::not_found("book", title))
    }

    async fn ensure_title_available(&self, title: &str, current: Option<i32>) -> ApiResult<()> {
        if self.policy.titles == TitlePolicy::AllowDuplicates {
            return Ok(());
        }
        match self.store.find_book_by_title(title).await? {
            Some(existing) if Some(existing.id) != current => {
                Err(ApiError::conflict("book", title))
            }
            _ => Ok(()),
        }
    }
}

fn require_non_empty(field: &str, value: String) -> ApiResult<String> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value)
}

fn parse_date(value: &str) -> ApiResult<chrono::NaiveDate> {
    parse_publication_date(value).map_err(|e| {
        ApiError::ValidationError(format!(
            "invalid publication date '{}' (expected {}): {}",
            value, DATE_FORMAT, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use crate::repositories::{EntityStore, MemoryStore};

    async fn service(policy: MutationPolicy) -> (LibraryService, SharedStore) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let service = LibraryService::new(store.clone(), policy);
        service.add_author("George Orwell".to_string()).await.unwrap();
        service
            .add_book(AddBook {
                title: "1984".to_string(),
                author_id: 1,
                publication_date: "1949-06-08".to_string(),
                categories: vec!["Dystopian".to_string(), "Political Fiction".to_string()],
            })
            .await
            .unwrap();
        (service, store)
    }

    fn add_book(title: &str, author_id: i32) -> AddBook {
        AddBook {
            title: title.to_string(),
            author_id,
            publication_date: "1945-08-17".to_string(),
            categories: vec!["Satire".to_string()],
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("unique".parse::<TitlePolicy>(), Ok(TitlePolicy::Unique));
        assert_eq!(
            "allow_duplicates".parse::<TitlePolicy>(),
            Ok(TitlePolicy::AllowDuplicates)
        );
        assert_eq!(
            "CASCADE".parse::<AuthorDeletePolicy>(),
            Ok(AuthorDeletePolicy::Cascade)
        );
        assert!("sometimes".parse::<AuthorDeletePolicy>().is_err());
    }

    #[tokio::test]
    async fn test_add_book_missing_author_does_not_mutate() {
        let (service, store) = service(MutationPolicy::default()).await;
        let result = service.add_book(add_book("Animal Farm", 99)).await;

        assert_matches!(result, Err(ApiError::NotFound { resource_type: "author", .. }));
        assert_eq!(store.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_book_rejects_bad_date() {
        let (service, _) = service(MutationPolicy::default()).await;
        let mut input = add_book("Animal Farm", 1);
        input.publication_date = "17 August 1945".to_string();
        assert_matches!(
            service.add_book(input).await,
            Err(ApiError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn test_duplicate_title_policy() {
        let (unique, _) = service(MutationPolicy::default()).await;
        assert_matches!(
            unique.add_book(add_book("1984", 1)).await,
            Err(ApiError::Conflict { .. })
        );

        let (lenient, store) = service(MutationPolicy {
            titles: TitlePolicy::AllowDuplicates,
            ..MutationPolicy::default()
        })
        .await;
        let copy = lenient.add_book(add_book("1984", 1)).await.unwrap();
        assert_eq!(copy.id, 2);

        // Title-keyed deletes hit the lowest id first
        let deleted = lenient.delete_book("1984").await.unwrap();
        assert_eq!(deleted.id, 1);
        assert_eq!(store.list_books().await.unwrap()[0].id, 2);
    }

    #[tokio::test]
    async fn test_update_book_keeps_omitted_fields() {
        let (service, _) = service(MutationPolicy::default()).await;
        let updated = service
            .update_book(UpdateBook {
                title: "1984".to_string(),
                new_title: Some("Nineteen Eighty-Four".to_string()),
                ..UpdateBook::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Nineteen Eighty-Four");
        assert_eq!(updated.publication_date_string(), "1949-06-08");
        assert_eq!(updated.categories, vec!["Dystopian", "Political Fiction"]);
    }

    #[tokio::test]
    async fn test_update_book_empty_values_are_not_ignored() {
        let (service, _) = service(MutationPolicy::default()).await;
        let cleared = service
            .update_book(UpdateBook {
                title: "1984".to_string(),
                new_categories: Some(Vec::new()),
                ..UpdateBook::default()
            })
            .await
            .unwrap();
        assert!(cleared.categories.is_empty());

        let blank = service
            .update_book(UpdateBook {
                title: "1984".to_string(),
                new_title: Some(String::new()),
                ..UpdateBook::default()
            })
            .await;
        assert_matches!(blank, Err(ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_book_to_own_title_is_allowed() {
        let (service, _) = service(MutationPolicy::default()).await;
        let result = service
            .update_book(UpdateBook {
                title: "1984".to_string(),
                new_title: Some("1984".to_string()),
                ..UpdateBook::default()
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_book() {
        let (service, _) = service(MutationPolicy::default()).await;
        assert_matches!(
            service.delete_book("Homage to Catalonia").await,
            Err(ApiError::NotFound { resource_type: "book", .. })
        );
    }

    #[tokio::test]
    async fn test_delete_author_restrict_and_cascade() {
        let (restrict, _) = service(MutationPolicy::default()).await;
        assert_matches!(
            restrict.delete_author(1).await,
            Err(ApiError::Conflict { .. })
        );

        let (cascade, store) = service(MutationPolicy {
            author_deletion: AuthorDeletePolicy::Cascade,
            ..MutationPolicy::default()
        })
        .await;
        let author = cascade.delete_author(1).await.unwrap();
        assert_eq!(author.name, "George Orwell");
        assert!(store.list_books().await.unwrap().is_empty());
        assert!(store.list_authors().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_author_rejects_blank_and_duplicate() {
        let (service, _) = service(MutationPolicy::default()).await;
        assert_matches!(
            service.add_author("  ".to_string()).await,
            Err(ApiError::ValidationError(_))
        );
        assert_matches!(
            service.add_author("George Orwell".to_string()).await,
            Err(ApiError::Conflict { .. })
        );
    }
}
