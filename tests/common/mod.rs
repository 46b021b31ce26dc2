//! Shared fixtures for integration tests

use chrono::{DateTime, TimeZone, Utc};
use tenusage::types::{FlavorId, FlavorShape, InstanceId, InstanceRecord, TenantId, TimeWindow};
use tenusage::window::Clock;

/// Clock pinned to a fixed instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A January 2013 UTC timestamp at `day` and `hour`
pub fn jan2013(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 1, day, hour, 0, 0).unwrap()
}

/// The canonical one-day test window, 2013-01-01 to 2013-01-02
pub fn day_window() -> TimeWindow {
    TimeWindow::new(jan2013(1, 0), jan2013(2, 0)).unwrap()
}

/// A small single-vCPU shape
pub fn small_shape() -> FlavorShape {
    FlavorShape {
        name: "m1.small".to_string(),
        memory_mb: 2048,
        root_gb: 20,
        ephemeral_gb: 0,
        vcpus: 1,
    }
}

/// An instance record with an embedded shape snapshot
pub fn snapshot_instance(
    id: &str,
    tenant: &str,
    launched_at: Option<DateTime<Utc>>,
    terminated_at: Option<DateTime<Utc>>,
) -> InstanceRecord {
    InstanceRecord {
        id: InstanceId::new(id),
        display_name: id.to_string(),
        tenant_id: TenantId::new(tenant),
        launched_at,
        terminated_at,
        vm_state: "active".to_string(),
        flavor: Some(small_shape()),
        flavor_id: FlavorId::new("1"),
        deleted: false,
    }
}
