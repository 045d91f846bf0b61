use agora_storage::StorageError;

pub(crate) trait PostgresErrorExt {
    fn into_storage_error(self, id_for_error: impl FnOnce() -> String) -> StorageError;
}

impl PostgresErrorExt for sqlx::Error {
    fn into_storage_error(self, id_for_error: impl FnOnce() -> String) -> StorageError {
        match self {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::DuplicateId(id_for_error())
            }
            sqlx::Error::PoolTimedOut => StorageError::TooBusy,
            sqlx::Error::RowNotFound => StorageError::NotFound(id_for_error()),
            other => StorageError::other(other),
        }
    }
}
