//! In-memory doubles for the store and the providers.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use crate::clients::{ClientError, ProviderRequest, Upstream};
use crate::db::PersistenceGateway;
use crate::domain::{LocationId, ResourceKind};
use crate::models::{
    BusinessRecord, EventRecord, Location, MovieRecord, NewLocation, NewRecord, Record,
    WeatherRecord,
};

#[derive(Default)]
pub struct MemoryGateway {
    locations: Mutex<Vec<Location>>,
    records: Mutex<Vec<Record>>,
    next_id: AtomicI32,
    failing_inserts: HashSet<usize>,
    insert_attempts: AtomicUsize,
    deletes: AtomicUsize,
    fail_reads: bool,
    lookups_to_miss: AtomicUsize,
}

impl MemoryGateway {
    /// Makes the listed record inserts (0-based, in call order) fail.
    pub fn fail_inserts(mut self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.failing_inserts = attempts.into_iter().collect();
        self
    }

    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// The next `count` location lookups report nothing stored, as if another
    /// request inserted the row right after they ran.
    pub fn miss_lookups(self, count: usize) -> Self {
        self.lookups_to_miss.store(count, Ordering::SeqCst);
        self
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn location_count(&self) -> usize {
        self.locations.lock().unwrap().len()
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn materialize(id: i32, location_id: LocationId, record: NewRecord) -> Record {
    match record {
        NewRecord::Weather(r) => Record::Weather(WeatherRecord {
            id,
            created_at: r.created_at,
            forecast: r.forecast,
            time: r.time,
            location_id,
        }),
        NewRecord::Event(r) => Record::Event(EventRecord {
            id,
            created_at: r.created_at,
            link: r.link,
            name: r.name,
            event_date: r.event_date,
            summary: r.summary,
            location_id,
        }),
        NewRecord::Movie(r) => Record::Movie(MovieRecord {
            id,
            created_at: r.created_at,
            title: r.title,
            overview: r.overview,
            average_votes: r.average_votes,
            total_votes: r.total_votes,
            image_url: r.image_url,
            popularity: r.popularity,
            released_on: r.released_on,
            location_id,
        }),
        NewRecord::Business(r) => Record::Business(BusinessRecord {
            id,
            created_at: r.created_at,
            name: r.name,
            image_url: r.image_url,
            price: r.price,
            rating: r.rating,
            url: r.url,
            location_id,
        }),
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn find_location_by_query(&self, search_query: &str) -> anyhow::Result<Option<Location>> {
        if self.fail_reads {
            anyhow::bail!("connection reset");
        }
        if self
            .lookups_to_miss
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Ok(None);
        }
        let locations = self.locations.lock().unwrap();
        Ok(locations
            .iter()
            .find(|l| l.search_query == search_query)
            .cloned())
    }

    async fn insert_location(&self, location: NewLocation) -> anyhow::Result<Location> {
        let mut locations = self.locations.lock().unwrap();
        if locations
            .iter()
            .any(|l| l.search_query == location.search_query)
        {
            anyhow::bail!("UNIQUE constraint failed: locations.search_query");
        }
        let stored = Location {
            id: LocationId::new(self.next_id()),
            created_at: location.created_at,
            latitude: location.latitude,
            longitude: location.longitude,
            search_query: location.search_query,
            formatted_query: location.formatted_query,
        };
        locations.push(stored.clone());
        Ok(stored)
    }

    async fn find_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<Vec<Record>> {
        if self.fail_reads {
            anyhow::bail!("connection reset");
        }
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.kind() == kind && r.location_id() == location_id)
            .cloned()
            .collect())
    }

    async fn delete_records(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> anyhow::Result<u64> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.kind() == kind && r.location_id() == location_id));
        Ok((before - records.len()) as u64)
    }

    async fn insert_record(
        &self,
        location_id: LocationId,
        record: NewRecord,
    ) -> anyhow::Result<Record> {
        let attempt = self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing_inserts.contains(&attempt) {
            anyhow::bail!("insert {attempt} rejected");
        }
        let stored = materialize(self.next_id(), location_id, record);
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}

/// Answers with a fixed body for any request whose path contains a needle.
/// Unmatched requests get a 502.
#[derive(Default)]
pub struct CannedUpstream {
    routes: Vec<(String, serde_json::Value)>,
    calls: AtomicUsize,
}

impl CannedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path_needle: &str, body: serde_json::Value) -> Self {
        self.routes.push((path_needle.to_string(), body));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for CannedUpstream {
    async fn get_json(&self, request: &ProviderRequest) -> Result<serde_json::Value, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes
            .iter()
            .find(|(needle, _)| request.url.path().contains(needle.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or(ClientError::Status(502))
    }
}
