//! Explicit cache configuration, built once by the bootstrap code

use std::path::PathBuf;

use crate::cache::error::{CacheError, CacheResult};
use crate::core::layout::Layout;

/// Root path, layout name and debug-header toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub root_path: PathBuf,
    pub layout: String,
    pub debug_headers: bool,
}

impl CacheConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            layout: Layout::default().name().to_string(),
            debug_headers: false,
        }
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_debug_headers(mut self, enabled: bool) -> Self {
        self.debug_headers = enabled;
        self
    }

    /// Check the root directory and resolve the layout name
    pub fn validate(&self) -> CacheResult<Layout> {
        if self.root_path.as_os_str().is_empty() {
            return Err(CacheError::InvalidRoot {
                path: self.root_path.clone(),
                reason: "no cache root defined",
            });
        }
        if !self.root_path.is_dir() {
            return Err(CacheError::InvalidRoot {
                path: self.root_path.clone(),
                reason: "must exist and must be a directory",
            });
        }
        self.layout.parse()
    }
}
