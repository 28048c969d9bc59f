//! PostgreSQL entity store
//!
//! Implements [`EntityStore`] with `sqlx` queries against the `authors` and
//! `books` tables created by the embedded migrations.

use async_trait::async_trait;
use sqlx::PgPool;

use super::utils::{is_unique_violation, AUTHOR_COLUMNS, BOOK_COLUMNS};
use super::{EntityStore, StoreError, StoreResult};
use crate::models::{Author, Book, BookPatch, NewAuthor, NewBook, SortOrder};

/// Entity store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== Authors ====================

    async fn find_author(&self, id: i32) -> StoreResult<Option<Author>> {
        let sql = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_authors_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Author>> {
        let sql = format!("SELECT {} FROM authors WHERE id = ANY($1)", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_author_by_name(&self, name: &str) -> StoreResult<Option<Author>> {
        let sql = format!("SELECT {} FROM authors WHERE name = $1", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        let sql = format!("SELECT {} FROM authors ORDER BY id ASC", AUTHOR_COLUMNS);
        Ok(sqlx::query_as::<_, Author>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_author(&self, author: NewAuthor) -> StoreResult<Author> {
        let sql = format!(
            "INSERT INTO authors (name) VALUES ($1) RETURNING {}",
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&sql)
            .bind(&author.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict {
                        resource_type: "author",
                        key: author.name.clone(),
                    }
                } else {
                    StoreError::Database(e)
                }
            })
    }

    #[tracing::instrument(skip(self))]
    async fn delete_author(&self, id: i32, cascade: bool) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        if cascade {
            let removed = sqlx::query("DELETE FROM books WHERE author_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(author_id = id, books = removed, "Cascaded author deletion");
        }

        let deleted = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    // ==================== Books ====================

    async fn find_books_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Book>> {
        let sql = format!("SELECT {} FROM books WHERE id = ANY($1)", BOOK_COLUMNS);
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_books_by_author_ids(&self, author_ids: &[i32]) -> StoreResult<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books WHERE author_id = ANY($1) ORDER BY id ASC",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_book_by_title(&self, title: &str) -> StoreResult<Option<Book>> {
        let sql = format!(
            "SELECT {} FROM books WHERE title = $1 ORDER BY id ASC LIMIT 1",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let sql = format!("SELECT {} FROM books ORDER BY id ASC", BOOK_COLUMNS);
        Ok(sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_books_by_category(&self, category: &str) -> StoreResult<Vec<Book>> {
        let sql = format!(
            "SELECT {} FROM books WHERE $1 = ANY(categories) ORDER BY id ASC",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_books_by_date(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Book>> {
        // LIMIT NULL means no limit
        let sql = format!(
            "SELECT {} FROM books ORDER BY publication_date {}, id ASC LIMIT $1",
            BOOK_COLUMNS,
            order.as_sql()
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(limit.map(|l| l as i64))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_book(&self, book: NewBook) -> StoreResult<Book> {
        let sql = format!(
            r#"INSERT INTO books (title, author_id, publication_date, categories)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(book.author_id)
            .bind(book.publication_date)
            .bind(&book.categories)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_book(&self, id: i32, patch: BookPatch) -> StoreResult<Option<Book>> {
        let sql = format!(
            r#"UPDATE books SET
                title = COALESCE($2, title),
                publication_date = COALESCE($3, publication_date),
                categories = COALESCE($4, categories)
            WHERE id = $1
            RETURNING {}"#,
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.publication_date)
            .bind(patch.categories)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_book(&self, id: i32) -> StoreResult<Option<Book>> {
        let sql = format!("DELETE FROM books WHERE id = $1 RETURNING {}", BOOK_COLUMNS);
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}
