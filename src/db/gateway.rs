use async_trait::async_trait;

use super::Store;
use crate::domain::{LocationId, ResourceKind};
use crate::models::{Location, NewLocation, NewRecord, Record};

/// Persistence seam for the cache core.
///
/// Every operation hits the store directly. Delete and insert are separate
/// calls with no surrounding transaction, so a reader running between them
/// sees an empty batch.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn find_location_by_query(&self, search_query: &str) -> anyhow::Result<Option<Location>>;

    async fn insert_location(&self, location: NewLocation) -> anyhow::Result<Location>;

    /// Records of `kind` for one location, oldest insert first.
    async fn find_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<Vec<Record>>;

    /// Returns the number of rows removed.
    async fn delete_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<u64>;

    async fn insert_record(
        &self,
        location_id: LocationId,
        record: NewRecord,
    ) -> anyhow::Result<Record>;
}

#[async_trait]
impl PersistenceGateway for Store {
    async fn find_location_by_query(&self, search_query: &str) -> anyhow::Result<Option<Location>> {
        self.location_repo().find_by_query(search_query).await
    }

    async fn insert_location(&self, location: NewLocation) -> anyhow::Result<Location> {
        self.location_repo().insert(location).await
    }

    async fn find_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<Vec<Record>> {
        self.record_repo().find(kind, location_id).await
    }

    async fn delete_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<u64> {
        self.record_repo().delete(kind, location_id).await
    }

    async fn insert_record(
        &self,
        location_id: LocationId,
        record: NewRecord,
    ) -> anyhow::Result<Record> {
        self.record_repo().insert(location_id, record).await
    }
}
