//! Shared SQL fragments for the PostgreSQL store

// ============================================================================
// SQL Column Constants
//
// SELECT/RETURNING column lists, kept in the field order of the models.
// ============================================================================

/// SQL columns for author queries
pub const AUTHOR_COLUMNS: &str = "id, name";

/// SQL columns for book queries
pub const BOOK_COLUMNS: &str = "id, title, author_id, publication_date, categories";

/// True when a database error is a unique constraint violation
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
