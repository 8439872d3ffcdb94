//! Process-wide dataset cache.
//!
//! Each source path is read at most once per process; later requests get the
//! same shared, immutable dataset back.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::Result;

use super::loader::load_file;
use super::model::RtoDataset;

type DatasetCache = Mutex<HashMap<PathBuf, Arc<RtoDataset>>>;

static DATASETS: OnceLock<DatasetCache> = OnceLock::new();

fn datasets() -> &'static DatasetCache {
    DATASETS.get_or_init(Default::default)
}

/// Load `path`, or return the dataset already loaded from it.
///
/// Failed loads are not cached, so a fixed file can be retried.
pub fn load_cached(path: &Path) -> Result<Arc<RtoDataset>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    // A poisoned lock only means another load panicked; the map is still valid.
    let mut cache = datasets().lock().unwrap_or_else(|e| e.into_inner());
    if let Some(ds) = cache.get(&key) {
        log::debug!("Dataset cache hit for {}", key.display());
        return Ok(Arc::clone(ds));
    }

    let dataset = Arc::new(load_file(path)?);
    cache.insert(key, Arc::clone(&dataset));
    Ok(dataset)
}
