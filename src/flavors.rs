//! Flavor resolution for usage reports
//!
//! Every billed instance needs a resource shape. The shape snapshot embedded
//! in the instance record at launch time is authoritative; the catalog is
//! only consulted as a legacy fallback for soft-deleted records that predate
//! snapshot capture. Catalog lookups within one report run are cached in a
//! per-report map so each distinct flavor id is fetched at most once.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{Result, UsageError};
use crate::types::{FlavorId, FlavorShape, InstanceRecord};

/// Per-report cache of catalog lookups, keyed by flavor id
///
/// Allocated fresh for each report computation and discarded with the
/// response; nothing here survives a request.
pub type FlavorCache = HashMap<FlavorId, FlavorShape>;

/// Flavor-catalog collaborator
///
/// Implementations answer by-id lookups, failing with
/// [`UsageError::FlavorNotFound`] for unknown ids.
#[async_trait]
pub trait FlavorCatalog: Send + Sync {
    /// Look up a flavor's resource shape by id
    async fn get_flavor_by_id(&self, id: &FlavorId) -> Result<FlavorShape>;
}

/// Resolves the resource shape for one instance record
pub struct FlavorResolver {
    catalog: Arc<dyn FlavorCatalog>,
}

impl FlavorResolver {
    /// Create a new FlavorResolver over a catalog collaborator
    pub fn new(catalog: Arc<dyn FlavorCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve the shape for `instance`, consulting `cache` before the catalog
    ///
    /// Returns `Ok(None)` when the instance cannot be billed because its
    /// flavor no longer exists in the catalog; the caller drops such
    /// instances from the report entirely. A live record with no embedded
    /// snapshot is a data-integrity error and propagates.
    pub async fn resolve(
        &self,
        instance: &InstanceRecord,
        cache: &mut FlavorCache,
    ) -> Result<Option<FlavorShape>> {
        if let Some(shape) = &instance.flavor {
            return Ok(Some(shape.clone()));
        }

        if !instance.deleted {
            // the fallback is only for deleted records that predate
            // snapshot capture
            return Err(UsageError::MissingFlavorSnapshot(instance.id.clone()));
        }

        if let Some(shape) = cache.get(&instance.flavor_id) {
            return Ok(Some(shape.clone()));
        }

        match self.catalog.get_flavor_by_id(&instance.flavor_id).await {
            Ok(shape) => {
                debug!("resolved flavor {} from catalog", instance.flavor_id);
                cache.insert(instance.flavor_id.clone(), shape.clone());
                Ok(Some(shape))
            }
            Err(UsageError::FlavorNotFound(id)) => {
                // can't bill without a shape, drop the instance
                warn!("flavor {} not found, excluding instance {}", id, instance.id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// In-memory catalog backed by a JSON map of flavor id to shape
///
/// Lets the server run against fixture data; a production deployment would
/// put the real catalog service behind [`FlavorCatalog`] instead.
pub struct StaticFlavorCatalog {
    flavors: HashMap<FlavorId, FlavorShape>,
}

impl StaticFlavorCatalog {
    /// Build a catalog from an explicit map
    pub fn new(flavors: HashMap<FlavorId, FlavorShape>) -> Self {
        Self { flavors }
    }

    /// Load a catalog from a JSON file of `{"<flavor_id>": <shape>, ...}`
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let flavors: HashMap<FlavorId, FlavorShape> = serde_json::from_str(&data)?;
        Ok(Self::new(flavors))
    }
}

#[async_trait]
impl FlavorCatalog for StaticFlavorCatalog {
    async fn get_flavor_by_id(&self, id: &FlavorId) -> Result<FlavorShape> {
        self.flavors
            .get(id)
            .cloned()
            .ok_or_else(|| UsageError::FlavorNotFound(id.clone()))
    }
}
