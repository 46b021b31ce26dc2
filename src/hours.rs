//! Billable-hours calculator
//!
//! Computes the fractional hours an instance was active within a reporting
//! window, clipped to the window boundaries. This is pure arithmetic: it
//! never errors and degrades to zero on any lifecycle ambiguity it cannot
//! resolve, such as a record that never launched.

use chrono::{DateTime, Utc};

use crate::types::{InstanceRecord, TimeWindow};

/// Elapsed seconds between two timestamps as a float, fractional part
/// included.
pub fn seconds_between(start: DateTime<Utc>, stop: DateTime<Utc>) -> f64 {
    let delta = stop - start;
    // num_microseconds only overflows for spans over ~292k years
    delta
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_seconds() as f64)
}

/// Billable hours for one instance within a window
///
/// Policy:
/// - terminated before the window start, or launched after the window stop,
///   or never launched at all: 0.0
/// - otherwise, the duration of `[max(launch, start), min(stop, termination)]`
///   in fractional hours; still-running instances are charged through the
///   window stop rather than the current time.
///
/// No rounding is applied.
///
/// # Examples
/// ```
/// use tenusage::hours::billable_hours;
/// use tenusage::types::{FlavorId, InstanceId, InstanceRecord, TenantId, TimeWindow};
/// use chrono::{TimeZone, Utc};
///
/// let window = TimeWindow::new(
///     Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2013, 1, 2, 0, 0, 0).unwrap(),
/// )
/// .unwrap();
///
/// let instance = InstanceRecord {
///     id: InstanceId::new("inst-1"),
///     display_name: "web-1".to_string(),
///     tenant_id: TenantId::new("acme"),
///     launched_at: Some(Utc.with_ymd_and_hms(2013, 1, 1, 6, 0, 0).unwrap()),
///     terminated_at: None,
///     vm_state: "active".to_string(),
///     flavor: None,
///     flavor_id: FlavorId::new("1"),
///     deleted: true,
/// };
///
/// assert_eq!(billable_hours(&instance, &window), 18.0);
/// ```
pub fn billable_hours(instance: &InstanceRecord, window: &TimeWindow) -> f64 {
    if let Some(terminated_at) = instance.terminated_at {
        if terminated_at < window.start() {
            return 0.0;
        }
    }

    let Some(launched_at) = instance.launched_at else {
        // never launched, no charge
        return 0.0;
    };

    // nothing if it started after the usage report ended
    if launched_at > window.stop() {
        return 0.0;
    }

    // don't charge before the window opens or after it closes
    let start = launched_at.max(window.start());
    let stop = match instance.terminated_at {
        Some(terminated_at) => terminated_at.min(window.stop()),
        // still running, charge through the window stop
        None => window.stop(),
    };

    seconds_between(start, stop) / 3600.0
}
