pub mod cache_policy;
pub use cache_policy::{CacheDecision, CachePolicy, is_stale};

pub mod orchestrator;
pub use orchestrator::{FetchOrchestrator, extract_records};

pub mod resource_service;
pub use resource_service::{ResourceService, ServiceError};

#[cfg(test)]
pub(crate) mod test_support;
