//! tenusage - Per-tenant compute usage reporting
//!
//! This library computes per-tenant resource usage summaries (billable
//! hours, vCPU-hours, memory-MB-hours, disk-GB-hours) over a requested time
//! window and exposes them as a read-only HTTP reporting endpoint:
//!
//! - Parse window bounds from the accepted textual timestamp layouts
//! - Fetch overlapping instance records from the instance-store collaborator
//! - Resolve each instance's resource shape, preferring the launch-time
//!   snapshot with a cached catalog fallback for legacy deleted records
//! - Fold billable hours and shapes into per-tenant totals
//!
//! # Examples
//!
//! ```no_run
//! use tenusage::{
//!     api::{router, AllowAll, AppState},
//!     flavors::{FlavorResolver, StaticFlavorCatalog},
//!     instances::StaticInstanceStore,
//!     usage::UsageReporter,
//!     window::SystemClock,
//! };
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let store = Arc::new(StaticInstanceStore::new(vec![]));
//! let catalog = Arc::new(StaticFlavorCatalog::new(HashMap::new()));
//! let state = AppState {
//!     reporter: Arc::new(UsageReporter::new(store, FlavorResolver::new(catalog))),
//!     authorizer: Arc::new(AllowAll),
//!     clock: Arc::new(SystemClock),
//! };
//! let app = router(state);
//! ```

pub mod api;
pub mod error;
pub mod flavors;
pub mod hours;
pub mod instances;
pub mod types;
pub mod usage;
pub mod window;

// Re-export commonly used types
pub use error::{Result, UsageError};
pub use types::{FlavorId, FlavorShape, InstanceId, InstanceRecord, TenantId, TimeWindow};
pub use usage::{ServerUsage, TenantUsageSummary, UsageReporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
