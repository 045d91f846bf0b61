use async_trait::async_trait;

use agora_model::{ActionRow, LogRow, ParticipantRow};
use agora_query::{Query, RangeQueryParams};

use crate::error::StorageResult;
use crate::rows::{ActionUpdate, LogUpdate, NewAction, NewLog, NewParticipant, ParticipantUpdate};

/// Controller for the participants table. Every method is atomic with
/// respect to a single row; there are no cross-row transactions.
#[async_trait]
pub trait ParticipantController: Send + Sync {
    async fn create(&self, row: NewParticipant) -> StorageResult<ParticipantRow>;
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<ParticipantRow>>;
    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<ParticipantRow>>;
    async fn find(
        &self,
        query: &Query,
        range: &RangeQueryParams,
    ) -> StorageResult<Vec<ParticipantRow>>;
    async fn update(
        &self,
        id: &str,
        update: ParticipantUpdate,
    ) -> StorageResult<Option<ParticipantRow>>;
    async fn delete(&self, id: &str) -> StorageResult<bool>;
    async fn count(&self) -> StorageResult<i64>;

    /// Every id containing `id_pattern`, used by the allocator to seed its
    /// per-base counter.
    async fn find_agents_by_id_pattern(&self, id_pattern: &str) -> StorageResult<Vec<String>>;

    /// Lookup by bound auth token, used by the gateway's auth extractor.
    async fn get_by_auth_token(&self, token: &str) -> StorageResult<Option<ParticipantRow>>;
}

#[async_trait]
pub trait ActionController: Send + Sync {
    async fn create(&self, row: NewAction) -> StorageResult<ActionRow>;
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<ActionRow>>;
    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<ActionRow>>;
    async fn find(&self, query: &Query, range: &RangeQueryParams) -> StorageResult<Vec<ActionRow>>;
    async fn update(&self, id: &str, update: ActionUpdate) -> StorageResult<Option<ActionRow>>;
    async fn delete(&self, id: &str) -> StorageResult<bool>;
    async fn count(&self) -> StorageResult<i64>;
}

#[async_trait]
pub trait LogController: Send + Sync {
    async fn create(&self, row: NewLog) -> StorageResult<LogRow>;
    async fn get_by_id(&self, id: &str) -> StorageResult<Option<LogRow>>;
    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<LogRow>>;
    async fn find(&self, query: &Query, range: &RangeQueryParams) -> StorageResult<Vec<LogRow>>;
    async fn update(&self, id: &str, update: LogUpdate) -> StorageResult<Option<LogRow>>;
    async fn delete(&self, id: &str) -> StorageResult<bool>;
    async fn count(&self) -> StorageResult<i64>;
}
