//! Cache metadata management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::error::{CacheError, CacheResult};
use crate::core::layout::Layout;

/// Metadata file name, stored at the cache root
pub const META_FILE: &str = "wmts.json";

/// Cache metadata stored in `<root>/wmts.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// Layout used to interpret every tile path under this root
    pub layout: Layout,
}

impl CacheMeta {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

pub fn meta_path(root: &Path) -> PathBuf {
    root.join(META_FILE)
}

/// Write cache metadata
pub fn write_meta(root: &Path, meta: &CacheMeta) -> CacheResult<()> {
    let file_path = meta_path(root);
    let json = serde_json::to_string(meta)?;
    fs::write(&file_path, json).map_err(|e| CacheError::io(&file_path, e))
}

/// Read cache metadata
pub fn read_meta(root: &Path) -> CacheResult<CacheMeta> {
    let file_path = meta_path(root);
    let content = match fs::read_to_string(&file_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CacheError::MissingMetadata(file_path))
        }
        Err(e) => return Err(CacheError::io(&file_path, e)),
    };
    Ok(serde_json::from_str(&content)?)
}
