//! Core domain types for tenusage
//!
//! This module contains the fundamental types used throughout the tenusage
//! library. These types provide strong typing for common concepts like tenant
//! identifiers, instance identifiers, flavor identifiers, and report windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, UsageError};

/// Strongly-typed tenant identifier
///
/// A tenant is an isolated ownership/billing domain for compute resources
/// (a "project"). Wrapping the identifier keeps it from being confused with
/// instance or flavor identifiers in function signatures.
///
/// # Examples
/// ```
/// use tenusage::types::TenantId;
///
/// let tenant = TenantId::new("acme-prod");
/// assert_eq!(tenant.as_str(), "acme-prod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Create a new TenantId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strongly-typed instance identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    /// Create a new InstanceId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed flavor identifier, the historical-lookup key into the
/// flavor catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlavorId(String);

impl FlavorId {
    /// Create a new FlavorId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlavorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resource-shape descriptor for a flavor
///
/// Describes the resource template an instance was launched with. The shape
/// is either embedded in the instance record as a launch-time snapshot or
/// resolved from the flavor catalog for legacy deleted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorShape {
    /// Flavor name, e.g. "m1.small"
    pub name: String,
    /// Memory in megabytes
    pub memory_mb: u64,
    /// Root disk in gigabytes
    pub root_gb: u64,
    /// Ephemeral disk in gigabytes
    pub ephemeral_gb: u64,
    /// Number of virtual CPUs
    pub vcpus: u64,
}

impl FlavorShape {
    /// Total local disk in gigabytes (root plus ephemeral)
    pub fn local_gb(&self) -> u64 {
        self.root_gb + self.ephemeral_gb
    }
}

/// One compute instance's billing-relevant lifecycle
///
/// Read-only input to the report: the reporting module never mutates or
/// persists instance records. Missing required fields are deserialization
/// errors, not silent defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Unique instance identifier
    pub id: InstanceId,
    /// Human-readable display name
    pub display_name: String,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// When the instance launched; absent for instances that never started
    pub launched_at: Option<DateTime<Utc>>,
    /// When the instance terminated; absent while still running
    pub terminated_at: Option<DateTime<Utc>>,
    /// Current lifecycle state, e.g. "active" or "stopped"
    pub vm_state: String,
    /// Resource-shape snapshot captured at launch time
    ///
    /// Preferred over the catalog because it stays historically accurate
    /// even if the flavor is later resized or deleted from the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<FlavorShape>,
    /// Historical-lookup key for records predating snapshot capture
    pub flavor_id: FlavorId,
    /// Whether the record is soft-deleted
    pub deleted: bool,
}

/// A reporting window with the invariant `start < stop`
///
/// # Examples
/// ```
/// use tenusage::types::TimeWindow;
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap();
/// let stop = Utc.with_ymd_and_hms(2013, 1, 2, 0, 0, 0).unwrap();
/// let window = TimeWindow::new(start, stop).unwrap();
/// assert_eq!(window.duration_hours(), 24.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, enforcing `start < stop`
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Result<Self> {
        if start < stop {
            Ok(Self { start, stop })
        } else {
            Err(UsageError::StartAfterStop)
        }
    }

    /// Window start
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Window stop
    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    /// Cap the window's stop at `now`
    ///
    /// Reports never charge into the future, so a stop beyond the current
    /// time is silently clipped before any instance lookup runs.
    pub fn clip_to(self, now: DateTime<Utc>) -> Self {
        if self.stop > now {
            Self {
                start: self.start,
                stop: now,
            }
        } else {
            self
        }
    }

    /// Window duration in fractional hours
    pub fn duration_hours(&self) -> f64 {
        crate::hours::seconds_between(self.start, self.stop) / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tenant_id() {
        let tenant = TenantId::new("acme");
        assert_eq!(tenant.as_str(), "acme");
        assert_eq!(tenant.to_string(), "acme");
    }

    #[test]
    fn test_flavor_shape_local_gb() {
        let shape = FlavorShape {
            name: "m1.small".to_string(),
            memory_mb: 2048,
            root_gb: 20,
            ephemeral_gb: 10,
            vcpus: 1,
        };
        assert_eq!(shape.local_gb(), 30);
    }

    #[test]
    fn test_window_ordering_enforced() {
        let start = Utc.with_ymd_and_hms(2013, 1, 2, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(start, stop).is_err());
        assert!(TimeWindow::new(start, start).is_err());
        assert!(TimeWindow::new(stop, start).is_ok());
    }

    #[test]
    fn test_window_clipping() {
        let start = Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2013, 1, 3, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2013, 1, 2, 0, 0, 0).unwrap();

        let window = TimeWindow::new(start, stop).unwrap().clip_to(now);
        assert_eq!(window.stop(), now);

        // already in the past, untouched
        let later = Utc.with_ymd_and_hms(2013, 1, 4, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, stop).unwrap().clip_to(later);
        assert_eq!(window.stop(), stop);
    }

    #[test]
    fn test_instance_record_rejects_missing_fields() {
        let incomplete = serde_json::json!({
            "id": "inst-1",
            "display_name": "web-1",
            "tenant_id": "acme"
        });
        assert!(serde_json::from_value::<InstanceRecord>(incomplete).is_err());
    }
}
