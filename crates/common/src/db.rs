//! Shared database helpers for the domain repositories

use sqlx::{Postgres, QueryBuilder};

/// Postgres SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Whether the error is a unique-constraint violation reported by Postgres
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// `%text%` with LIKE wildcards in `text` matched literally
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Push `{column} ILIKE $n ESCAPE '\'`, binding `pattern`
pub fn push_ilike(qb: &mut QueryBuilder<'_, Postgres>, column: &str, pattern: &str) {
    qb.push(column)
        .push(" ILIKE ")
        .push_bind(pattern.to_string())
        .push(" ESCAPE '\\'");
}
