//! Database-specific error types and conversions.

use foodie_core::error::FoodieError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Stale revision for {entity} {id}")]
    Conflict { entity: String, id: String },

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<DbError> for FoodieError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FoodieError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => FoodieError::AlreadyExists { entity },
            DbError::Conflict { entity, id } => FoodieError::Conflict { entity, id },
            other => FoodieError::Database(other.to_string()),
        }
    }
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value).map_err(|e| DbError::Corrupt(format!("invalid {field} UUID: {e}")))
}

/// Classify a failed write on `entity` `id`.
///
/// The storage engine aborts a transaction that raced another writer
/// with a retryable error; that outcome is the same lost race as a
/// revision mismatch and maps to `Conflict`.
pub(crate) fn write_error(entity: &str, id: &str, err: surrealdb::Error) -> DbError {
    if is_retryable_conflict(&err.to_string()) {
        DbError::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    } else {
        DbError::Surreal(err)
    }
}

fn is_retryable_conflict(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("read or write conflict") || message.contains("can be retried")
}

#[cfg(test)]
mod tests {
    use foodie_core::ErrorKind;

    use super::*;

    #[test]
    fn stale_revision_maps_to_conflict() {
        let err: FoodieError = DbError::Conflict {
            entity: "order".into(),
            id: "x".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn engine_write_conflicts_are_retryable() {
        assert!(is_retryable_conflict(
            "Failed to commit transaction due to a read or write conflict. \
             This transaction can be retried"
        ));
        assert!(!is_retryable_conflict(
            "Found NONE for field `status`, but expected a string"
        ));
    }

    #[test]
    fn corrupt_rows_are_internal() {
        let err: FoodieError = DbError::Corrupt("bad".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
