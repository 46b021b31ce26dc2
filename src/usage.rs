//! Usage aggregation engine
//!
//! Folds per-instance billable hours and resource shapes into per-tenant
//! totals for one reporting window. Everything here is request-scoped: the
//! instance set, the flavor cache, and the produced summaries live exactly
//! as long as one report computation.
//!
//! # Examples
//!
//! ```no_run
//! use tenusage::{
//!     flavors::{FlavorResolver, StaticFlavorCatalog},
//!     instances::StaticInstanceStore,
//!     usage::UsageReporter,
//!     types::TimeWindow,
//! };
//! use chrono::{TimeZone, Utc};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # async fn example() -> tenusage::Result<()> {
//! let store = Arc::new(StaticInstanceStore::new(vec![]));
//! let catalog = Arc::new(StaticFlavorCatalog::new(HashMap::new()));
//! let reporter = UsageReporter::new(store, FlavorResolver::new(catalog));
//!
//! let window = TimeWindow::new(
//!     Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2013, 1, 2, 0, 0, 0).unwrap(),
//! )?;
//! let summaries = reporter
//!     .tenant_usages(&window, None, true, Utc::now())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::flavors::{FlavorCache, FlavorResolver};
use crate::hours::billable_hours;
use crate::instances::InstanceStore;
use crate::types::{InstanceId, InstanceRecord, TenantId, TimeWindow};

/// Lifecycle state reported for instances that have terminated
const STATE_TERMINATED: &str = "terminated";

/// Per-instance computed usage within one report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerUsage {
    /// Instance identifier
    pub instance_id: InstanceId,
    /// Instance display name
    pub name: String,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Resolved flavor name
    pub flavor: String,
    /// Memory in megabytes
    pub memory_mb: u64,
    /// Total local disk in gigabytes (root plus ephemeral)
    pub local_gb: u64,
    /// Virtual CPU count
    pub vcpus: u64,
    /// Launch timestamp
    pub started_at: Option<DateTime<Utc>>,
    /// Termination timestamp, absent while running
    pub ended_at: Option<DateTime<Utc>>,
    /// "terminated" once ended, else the current lifecycle state
    pub state: String,
    /// Whole seconds the instance has existed, through termination or now
    pub uptime: i64,
    /// Billable hours within the report window
    pub hours: f64,
}

/// Per-tenant usage aggregate for one reporting window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUsageSummary {
    /// Tenant identifier
    pub tenant_id: TenantId,
    /// Window start
    pub start: DateTime<Utc>,
    /// Window stop
    pub stop: DateTime<Utc>,
    /// Total billable hours across contributing instances
    pub total_hours: f64,
    /// Σ vcpus × hours
    pub total_vcpus_usage: f64,
    /// Σ memory_mb × hours
    pub total_memory_mb_usage: f64,
    /// Σ (root_gb + ephemeral_gb) × hours
    pub total_local_gb_usage: f64,
    /// Contributing instances in processing order, detailed mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_usages: Option<Vec<ServerUsage>>,
}

impl TenantUsageSummary {
    /// A zeroed summary for a tenant with no qualifying instances
    ///
    /// An empty report is a valid report, not a "not found" condition.
    pub fn empty(tenant_id: TenantId, window: &TimeWindow, detailed: bool) -> Self {
        Self {
            tenant_id,
            start: window.start(),
            stop: window.stop(),
            total_hours: 0.0,
            total_vcpus_usage: 0.0,
            total_memory_mb_usage: 0.0,
            total_local_gb_usage: 0.0,
            server_usages: detailed.then(Vec::new),
        }
    }

    fn accumulate(&mut self, usage: ServerUsage) {
        self.total_hours += usage.hours;
        self.total_vcpus_usage += usage.vcpus as f64 * usage.hours;
        self.total_memory_mb_usage += usage.memory_mb as f64 * usage.hours;
        self.total_local_gb_usage += usage.local_gb as f64 * usage.hours;
        if let Some(server_usages) = &mut self.server_usages {
            server_usages.push(usage);
        }
    }
}

/// Whole seconds an instance has existed, through termination or `now`
fn uptime_seconds(instance: &InstanceRecord, now: DateTime<Utc>) -> i64 {
    let Some(started_at) = instance.launched_at else {
        return 0;
    };
    let until = instance.terminated_at.unwrap_or(now);
    (until - started_at).num_seconds()
}

/// Main report engine
pub struct UsageReporter {
    instances: Arc<dyn InstanceStore>,
    resolver: FlavorResolver,
}

impl UsageReporter {
    /// Create a new UsageReporter over its collaborators
    pub fn new(instances: Arc<dyn InstanceStore>, resolver: FlavorResolver) -> Self {
        Self {
            instances,
            resolver,
        }
    }

    /// Compute per-tenant usage summaries for one window
    ///
    /// Fetches the overlapping instances (optionally filtered to one
    /// tenant), computes billable hours and resource usage per instance, and
    /// folds them into per-tenant totals. Tenants appear in first-seen
    /// order. Instances whose flavor cannot be resolved from the catalog are
    /// dropped from the report entirely; a live instance with no embedded
    /// shape snapshot aborts the report with a data-integrity error.
    pub async fn tenant_usages(
        &self,
        window: &TimeWindow,
        tenant_id: Option<&TenantId>,
        detailed: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<TenantUsageSummary>> {
        let instances = self
            .instances
            .get_active_by_window(window, tenant_id)
            .await?;
        debug!(
            "aggregating {} instances between {} and {}",
            instances.len(),
            window.start(),
            window.stop()
        );

        let mut flavor_cache = FlavorCache::new();
        let mut summaries: Vec<TenantUsageSummary> = Vec::new();
        let mut by_tenant: HashMap<TenantId, usize> = HashMap::new();

        for instance in &instances {
            let hours = billable_hours(instance, window);
            let Some(shape) = self.resolver.resolve(instance, &mut flavor_cache).await? else {
                continue;
            };

            let state = match instance.terminated_at {
                Some(_) => STATE_TERMINATED.to_string(),
                None => instance.vm_state.clone(),
            };

            let usage = ServerUsage {
                instance_id: instance.id.clone(),
                name: instance.display_name.clone(),
                tenant_id: instance.tenant_id.clone(),
                flavor: shape.name.clone(),
                memory_mb: shape.memory_mb,
                local_gb: shape.local_gb(),
                vcpus: shape.vcpus,
                started_at: instance.launched_at,
                ended_at: instance.terminated_at,
                state,
                uptime: uptime_seconds(instance, now),
                hours,
            };

            let index = *by_tenant.entry(instance.tenant_id.clone()).or_insert_with(|| {
                summaries.push(TenantUsageSummary::empty(
                    instance.tenant_id.clone(),
                    window,
                    detailed,
                ));
                summaries.len() - 1
            });
            summaries[index].accumulate(usage);
        }

        Ok(summaries)
    }
}
