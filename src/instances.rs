//! Instance-lookup collaborator
//!
//! The reporting module does not own the compute-instance datastore; it asks
//! a collaborator for the instances whose lifecycle overlapped a window,
//! optionally filtered to one tenant. The trait mirrors that single query.
//! An in-memory implementation backed by a JSON fixture file lets the server
//! binary and the tests run without a real datastore.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::types::{InstanceRecord, TenantId, TimeWindow};

/// Instance-lookup collaborator
///
/// Returns the instances whose lifecycle overlapped the window, in the
/// store's own order. The aggregator preserves that order and does not
/// re-sort.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Instances active at any point within `window`, optionally filtered
    /// to one tenant
    async fn get_active_by_window(
        &self,
        window: &TimeWindow,
        tenant_id: Option<&TenantId>,
    ) -> Result<Vec<InstanceRecord>>;
}

/// In-memory store over a fixed set of instance records
pub struct StaticInstanceStore {
    instances: Vec<InstanceRecord>,
}

impl StaticInstanceStore {
    /// Build a store from explicit records
    pub fn new(instances: Vec<InstanceRecord>) -> Self {
        Self { instances }
    }

    /// Load records from a JSON file containing an array of instances
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let instances: Vec<InstanceRecord> = serde_json::from_str(&data)?;
        Ok(Self::new(instances))
    }

    fn overlaps(instance: &InstanceRecord, window: &TimeWindow) -> bool {
        // never-launched records are returned and priced at zero hours
        // downstream rather than filtered here
        if let Some(terminated_at) = instance.terminated_at {
            if terminated_at < window.start() {
                return false;
            }
        }
        if let Some(launched_at) = instance.launched_at {
            if launched_at > window.stop() {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl InstanceStore for StaticInstanceStore {
    async fn get_active_by_window(
        &self,
        window: &TimeWindow,
        tenant_id: Option<&TenantId>,
    ) -> Result<Vec<InstanceRecord>> {
        Ok(self
            .instances
            .iter()
            .filter(|i| Self::overlaps(i, window))
            .filter(|i| tenant_id.is_none_or(|t| &i.tenant_id == t))
            .cloned()
            .collect())
    }
}
