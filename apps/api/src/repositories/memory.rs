//! In-memory entity store
//!
//! Keeps authors and books in insertion order behind a single tokio
//! `RwLock`. Ids are assigned from per-kind counters starting at 1 and are
//! never reused.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::{Author, Book, BookPatch, NewAuthor, NewBook, SortOrder};

#[derive(Debug)]
struct Tables {
    authors: Vec<Author>,
    books: Vec<Book>,
    next_author_id: i32,
    next_book_id: i32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            authors: Vec::new(),
            books: Vec::new(),
            next_author_id: 1,
            next_book_id: 1,
        }
    }
}

/// Entity store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn find_author(&self, id: i32) -> StoreResult<Option<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.iter().find(|a| a.id == id).cloned())
    }

    async fn find_authors_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(tables
            .authors
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn find_author_by_name(&self, name: &str) -> StoreResult<Option<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.iter().find(|a| a.name == name).cloned())
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        Ok(self.tables.read().await.authors.clone())
    }

    async fn create_author(&self, author: NewAuthor) -> StoreResult<Author> {
        let mut tables = self.tables.write().await;
        if tables.authors.iter().any(|a| a.name == author.name) {
            return Err(StoreError::Conflict {
                resource_type: "author",
                key: author.name,
            });
        }

        let created = Author {
            id: tables.next_author_id,
            name: author.name,
        };
        tables.next_author_id += 1;
        tables.authors.push(created.clone());
        Ok(created)
    }

    async fn delete_author(&self, id: i32, cascade: bool) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(position) = tables.authors.iter().position(|a| a.id == id) else {
            return Ok(false);
        };

        if cascade {
            tables.books.retain(|b| b.author_id != id);
        }
        tables.authors.remove(position);
        Ok(true)
    }

    async fn find_books_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn find_books_by_author_ids(&self, author_ids: &[i32]) -> StoreResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| author_ids.contains(&b.author_id))
            .cloned()
            .collect())
    }

    async fn find_book_by_title(&self, title: &str) -> StoreResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.title == title).cloned())
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.tables.read().await.books.clone())
    }

    async fn find_books_by_category(&self, category: &str) -> StoreResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|b| b.has_category(category))
            .cloned()
            .collect())
    }

    async fn list_books_by_date(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Book>> {
        let mut books = self.tables.read().await.books.clone();
        books.sort_by(|a, b| order.compare(a, b));
        if let Some(limit) = limit {
            books.truncate(limit);
        }
        Ok(books)
    }

    async fn create_book(&self, book: NewBook) -> StoreResult<Book> {
        let mut tables = self.tables.write().await;
        let created = Book {
            id: tables.next_book_id,
            title: book.title,
            author_id: book.author_id,
            publication_date: book.publication_date,
            categories: book.categories,
        };
        tables.next_book_id += 1;
        tables.books.push(created.clone());
        Ok(created)
    }

    async fn update_book(&self, id: i32, patch: BookPatch) -> StoreResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        Ok(tables.books.iter_mut().find(|b| b.id == id).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }

    async fn delete_book(&self, id: i32) -> StoreResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .books
            .iter()
            .position(|b| b.id == id)
            .map(|position| tables.books.remove(position)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_publication_date;

    async fn store_with_books() -> (MemoryStore, Author) {
        let store = MemoryStore::new();
        let author = store
            .create_author(NewAuthor::new("Kate Chopin"))
            .await
            .unwrap();
        for (title, date) in [
            ("The Awakening", "1899-04-22"),
            ("At Fault", "1890-09-01"),
            ("Bayou Folk", "1894-03-24"),
        ] {
            store
                .create_book(NewBook {
                    title: title.to_string(),
                    author_id: author.id,
                    publication_date: parse_publication_date(date).unwrap(),
                    categories: vec!["Fiction".to_string()],
                })
                .await
                .unwrap();
        }
        (store, author)
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let (store, _) = store_with_books().await;
        let deleted = store.delete_book(3).await.unwrap();
        assert_eq!(deleted.map(|b| b.title), Some("Bayou Folk".to_string()));

        let author = store.find_author(1).await.unwrap().unwrap();
        let book = store
            .create_book(NewBook {
                title: "A Night in Acadie".to_string(),
                author_id: author.id,
                publication_date: parse_publication_date("1897-01-01").unwrap(),
                categories: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(book.id, 4);
    }

    #[tokio::test]
    async fn test_duplicate_author_name_conflicts() {
        let (store, _) = store_with_books().await;
        let result = store.create_author(NewAuthor::new("Kate Chopin")).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_list_books_by_date_with_limit() {
        let (store, _) = store_with_books().await;
        let books = store
            .list_books_by_date(SortOrder::Desc, Some(2))
            .await
            .unwrap();
        let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["The Awakening", "Bayou Folk"]);
    }

    #[tokio::test]
    async fn test_multi_key_lookups_skip_missing_ids() {
        let (store, _) = store_with_books().await;
        let books = store.find_books_by_ids(&[3, 99, 1]).await.unwrap();
        let mut ids: Vec<_> = books.iter().map(|b| b.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_delete_author_cascade() {
        let (store, author) = store_with_books().await;
        assert!(store.delete_author(author.id, true).await.unwrap());
        assert!(store.list_books().await.unwrap().is_empty());
        assert!(!store.delete_author(author.id, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_book_returns_none() {
        let (store, _) = store_with_books().await;
        let patch = BookPatch {
            title: Some("Nothing".to_string()),
            ..BookPatch::default()
        };
        assert!(store.update_book(42, patch).await.unwrap().is_none());
    }
}
