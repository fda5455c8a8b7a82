//! Serving-path adapter between a map server's cache callbacks and the store
//!
//! Nothing here returns an error: a broken cache is logged and behaves like
//! a miss, so the renderer fallback can always answer the request.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::config::CacheConfig;
use crate::cache::error::CacheResult;
use crate::cache::store::CacheStore;
use crate::core::request::TileRequest;

pub const DEBUG_PLUGIN_HEADER: &str = "X-Debug-Cache-Plugin";
pub const DEBUG_PATH_HEADER: &str = "X-Debug-Cache-Path";
pub const PLUGIN_NAME: &str = "wmtsCacheServer";

/// Default suffix for cached capability documents
pub const DOCUMENT_SUFFIX: &str = ".xml";

/// Raw request parameters as received by the host
pub type RequestParams = BTreeMap<String, String>;

/// A cache hit: body plus the headers the host should add to its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub body: Vec<u8>,
    pub headers: Vec<(&'static str, String)>,
}

/// Cache callbacks a host server invokes around rendering
pub trait CacheFilter: Send + Sync {
    /// Cached document for the request, or `None` on a miss
    fn cached_document(&self, project: &str, params: &RequestParams) -> Option<CachedResponse>;

    /// Store a freshly rendered document
    fn set_cached_document(&self, body: &[u8], project: &str, params: &RequestParams) -> bool;

    fn delete_cached_document(&self, project: &str, params: &RequestParams) -> bool;

    fn delete_cached_documents(&self, project: &str) -> bool;

    /// Cached tile image for the request, or `None` on a miss
    fn cached_image(&self, project: &str, params: &RequestParams) -> Option<CachedResponse>;

    /// Store a freshly rendered tile image
    fn set_cached_image(&self, body: &[u8], project: &str, params: &RequestParams) -> bool;

    fn delete_cached_image(&self, project: &str, params: &RequestParams) -> bool;

    fn delete_cached_images(&self, project: &str) -> bool;
}

/// [`CacheFilter`] backed by a [`CacheStore`]
#[derive(Debug, Clone)]
pub struct DiskCacheFilter {
    store: Arc<CacheStore>,
    debug_headers: bool,
}

impl DiskCacheFilter {
    pub fn new(store: Arc<CacheStore>, debug_headers: bool) -> Self {
        Self {
            store,
            debug_headers,
        }
    }

    /// Filter for a host configuration; `None` when caching is disabled
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        CacheStore::open_or_disable(config)
            .map(|store| Self::new(Arc::new(store), config.debug_headers))
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    fn document_path(&self, project: &str, params: &RequestParams, create: bool) -> CacheResult<PathBuf> {
        self.store
            .document_path(project, params, DOCUMENT_SUFFIX, create)
    }

    fn tile_path(&self, project: &str, params: &RequestParams, create: bool) -> CacheResult<PathBuf> {
        let tile = TileRequest::from_params(params)?;
        self.store.tile_path(project, &tile, create)
    }

    fn hit(&self, body: Vec<u8>, path: &std::path::Path) -> CachedResponse {
        let headers = if self.debug_headers {
            vec![
                (DEBUG_PLUGIN_HEADER, PLUGIN_NAME.to_string()),
                (DEBUG_PATH_HEADER, path.display().to_string()),
            ]
        } else {
            Vec::new()
        };
        CachedResponse { body, headers }
    }

    fn lookup(&self, path: CacheResult<PathBuf>) -> Option<CachedResponse> {
        let result = path.and_then(|path| {
            Ok(self.store.read(&path)?.map(|body| self.hit(body, &path)))
        });
        match result {
            Ok(Some(hit)) => {
                debug!(bytes = hit.body.len(), "Cache hit");
                Some(hit)
            }
            Ok(None) => {
                debug!("Cache miss");
                None
            }
            Err(e) => trap(e),
        }
    }

    fn store_body(&self, path: CacheResult<PathBuf>, body: &[u8]) -> bool {
        match path.and_then(|path| self.store.write(&path, body)) {
            Ok(()) => true,
            Err(e) => trap(e),
        }
    }

    fn remove(&self, result: CacheResult<bool>) -> bool {
        result.unwrap_or_else(trap)
    }
}

/// Log a serving-path failure and turn it into a miss
fn trap<T: Default>(e: crate::cache::error::CacheError) -> T {
    error!(error = %e, "WMTS cache error");
    T::default()
}

impl CacheFilter for DiskCacheFilter {
    fn cached_document(&self, project: &str, params: &RequestParams) -> Option<CachedResponse> {
        self.lookup(self.document_path(project, params, false))
    }

    fn set_cached_document(&self, body: &[u8], project: &str, params: &RequestParams) -> bool {
        if body.is_empty() {
            return false;
        }
        self.store_body(self.document_path(project, params, true), body)
    }

    fn delete_cached_document(&self, project: &str, params: &RequestParams) -> bool {
        self.remove(
            self.document_path(project, params, false)
                .and_then(|path| self.store.delete(&path)),
        )
    }

    fn delete_cached_documents(&self, project: &str) -> bool {
        self.remove(self.store.delete_documents(project))
    }

    fn cached_image(&self, project: &str, params: &RequestParams) -> Option<CachedResponse> {
        self.lookup(self.tile_path(project, params, false))
    }

    fn set_cached_image(&self, body: &[u8], project: &str, params: &RequestParams) -> bool {
        self.store_body(self.tile_path(project, params, true), body)
    }

    fn delete_cached_image(&self, project: &str, params: &RequestParams) -> bool {
        self.remove(
            self.tile_path(project, params, false)
                .and_then(|path| self.store.delete(&path)),
        )
    }

    fn delete_cached_images(&self, project: &str) -> bool {
        self.remove(self.store.delete_layers(project))
    }
}
