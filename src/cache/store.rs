//! Cache store - path derivation and filesystem i/o under the cache root
//!
//! ```text
//! root/wmts.json
//! root/<project>.inf
//! root/<project>/docs/<document><suffix>
//! root/<project>/tiles/<layer>/<variant>/<layout path>.<ext>
//! ```
//!
//! The filesystem is the only index: enumeration re-scans directories on
//! every call.

use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::cache::config::CacheConfig;
use crate::cache::error::{CacheError, CacheResult};
use crate::cache::meta::{read_meta, write_meta, CacheMeta};
use crate::core::digest::{
    document_digest, project_digest, tile_extension, tile_variant_digest, Digest,
};
use crate::core::layout::Layout;
use crate::core::request::TileRequest;

/// Collection marker extension (`<digest>.inf`)
pub const MARKER_EXT: &str = "inf";
pub const DOCS_DIR: &str = "docs";
pub const TILES_DIR: &str = "tiles";

/// A registered project collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    pub id: Digest,
    pub project: String,
}

/// Disk cache rooted at a single directory, with one layout
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    layout: Layout,
}

impl CacheStore {
    /// Store handle without touching the filesystem
    pub fn new(root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// Initialize a store and record its layout in the root metadata
    pub fn create(root: impl Into<PathBuf>, layout: Layout) -> CacheResult<Self> {
        let store = Self::new(root, layout);
        write_meta(&store.root, &CacheMeta::new(layout))?;
        info!(root = %store.root.display(), layout = %layout, "Cache store initialized");
        Ok(store)
    }

    /// Open a store using the layout recorded in the root metadata
    pub fn open_existing(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        let meta = read_meta(&root)?;
        Ok(Self::new(root, meta.layout))
    }

    /// Validate the configuration and initialize the store
    pub fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        let layout = config.validate()?;
        Self::create(&config.root_path, layout)
    }

    /// Validate the configuration, then reuse the recorded layout if the
    /// root already has metadata. The configured layout only seeds a new root.
    pub fn open_or_create(config: &CacheConfig) -> CacheResult<Self> {
        let layout = config.validate()?;
        match Self::open_existing(&config.root_path) {
            Ok(store) => {
                if store.layout != layout {
                    warn!(
                        recorded = %store.layout,
                        requested = %layout,
                        "Cache root already has a layout, keeping the recorded one"
                    );
                }
                Ok(store)
            }
            Err(CacheError::MissingMetadata(_)) => Self::create(&config.root_path, layout),
            Err(e) => Err(e),
        }
    }

    /// Like [`CacheStore::from_config`], but a bad configuration disables
    /// caching instead of failing.
    pub fn open_or_disable(config: &CacheConfig) -> Option<Self> {
        match Self::from_config(config) {
            Ok(store) => Some(store),
            Err(e) => {
                error!(error = %e, "WMTS cache configuration is invalid, cache disabled");
                None
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn collection_dir(&self, digest: &str) -> PathBuf {
        self.root.join(digest)
    }

    fn marker_path(&self, digest: &str) -> PathBuf {
        self.root.join(format!("{}.{}", digest, MARKER_EXT))
    }

    /// Base path for a project's documents
    pub fn documents_root(&self, project: &str) -> CacheResult<PathBuf> {
        Ok(self.collection_dir(&project_digest(project)?).join(DOCS_DIR))
    }

    /// Base path for a project's tiles
    pub fn tiles_root(&self, project: &str) -> CacheResult<PathBuf> {
        Ok(self.collection_dir(&project_digest(project)?).join(TILES_DIR))
    }

    /// Cache path for a document response
    pub fn document_path<K, V>(
        &self,
        project: &str,
        params: impl IntoIterator<Item = (K, V)>,
        suffix: &str,
        create_parents: bool,
    ) -> CacheResult<PathBuf>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let project_hash = project_digest(project)?;
        let digest = document_digest(project, params)?;
        let docs = self.collection_dir(&project_hash).join(DOCS_DIR);

        if create_parents {
            create_dir_restricted(&docs)?;
            self.register(&project_hash, project)?;
        }

        Ok(docs.join(format!("{}{}", digest, suffix)))
    }

    /// Cache path for a tile
    pub fn tile_path(
        &self,
        project: &str,
        tile: &TileRequest,
        create_parents: bool,
    ) -> CacheResult<PathBuf> {
        tile.validate()?;
        let project_hash = project_digest(project)?;
        let variant = tile_variant_digest(project, &tile.layer, &tile.tile_matrix_set, &tile.style)?;
        let ext = tile_extension(tile.format.as_deref())?;

        let base = self
            .collection_dir(&project_hash)
            .join(TILES_DIR)
            .join(&tile.layer)
            .join(variant);
        let path = self
            .layout
            .locate(&base, tile.column, tile.row, &tile.level, ext);

        if create_parents {
            if let Some(parent) = path.parent() {
                create_dir_restricted(parent)?;
            }
            self.register(&project_hash, project)?;
        }

        Ok(path)
    }

    /// Write the marker for a collection if it does not exist yet
    fn register(&self, digest: &str, project: &str) -> CacheResult<()> {
        let marker = self.marker_path(digest);
        match OpenOptions::new().write(true).create_new(true).open(&marker) {
            Ok(mut file) => {
                file.write_all(project.as_bytes())
                    .map_err(|e| CacheError::io(&marker, e))?;
                debug!(id = digest, project, "Registered cache collection");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(CacheError::io(&marker, e)),
        }
    }

    pub fn write(&self, path: &Path, bytes: &[u8]) -> CacheResult<()> {
        fs::write(path, bytes).map_err(|e| CacheError::io(path, e))
    }

    /// Read a cached entry; a missing file is a miss, not an error
    pub fn read(&self, path: &Path) -> CacheResult<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::io(path, e)),
        }
    }

    /// Remove a single cached file. Returns false if there was none.
    pub fn delete(&self, path: &Path) -> CacheResult<bool> {
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(|e| CacheError::io(path, e))?;
        Ok(true)
    }

    /// Remove a directory tree. Returns false if there was none.
    pub fn delete_subtree(&self, path: &Path) -> CacheResult<bool> {
        if !path.is_dir() {
            return Ok(false);
        }
        fs::remove_dir_all(path).map_err(|e| CacheError::io(path, e))?;
        Ok(true)
    }

    /// One entry per marker file directly under the root, sorted by id
    pub fn enumerate_collections(&self) -> CacheResult<Vec<CollectionInfo>> {
        let entries = fs::read_dir(&self.root).map_err(|e| CacheError::io(&self.root, e))?;

        let mut collections = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MARKER_EXT) || !path.is_file() {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "Skipping marker with non UTF-8 name");
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(project) => collections.push(CollectionInfo {
                    id: id.to_string(),
                    project,
                }),
                // Removed by a concurrent delete
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(CacheError::io(&path, e)),
            }
        }

        collections.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(collections)
    }

    /// Resolve a collection id through its marker file
    pub fn find_collection(&self, id: &str) -> CacheResult<CollectionInfo> {
        if !is_collection_id(id) {
            return Err(CacheError::CollectionNotFound(id.to_string()));
        }
        let marker = self.marker_path(id);
        match fs::read_to_string(&marker) {
            Ok(project) => Ok(CollectionInfo {
                id: id.to_string(),
                project,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CacheError::CollectionNotFound(id.to_string()))
            }
            Err(e) => Err(CacheError::io(&marker, e)),
        }
    }

    /// Layer directory names under the project's tiles root, sorted
    pub fn enumerate_layers(&self, project: &str) -> CacheResult<Vec<String>> {
        let tiles = self.tiles_root(project)?;
        let entries = match fs::read_dir(&tiles) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(&tiles, e)),
        };

        let mut layers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&tiles, e))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    layers.push(name.to_string());
                }
            }
        }
        layers.sort();
        Ok(layers)
    }

    /// Number of files in the project's documents root
    pub fn count_documents(&self, project: &str) -> CacheResult<usize> {
        let docs = self.documents_root(project)?;
        if !docs.is_dir() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in WalkDir::new(&docs).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| docs.clone());
                CacheError::io(path, e.into())
            })?;
            if entry.file_type().is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Remove every document cached for a project
    pub fn delete_documents(&self, project: &str) -> CacheResult<bool> {
        let docs = self.documents_root(project)?;
        let removed = self.delete_subtree(&docs)?;
        if removed {
            info!(project, "Removed cached documents");
        }
        Ok(removed)
    }

    /// Remove every tile of every layer cached for a project
    pub fn delete_layers(&self, project: &str) -> CacheResult<bool> {
        let tiles = self.tiles_root(project)?;
        let removed = self.delete_subtree(&tiles)?;
        if removed {
            info!(project, "Removed cached tiles");
        }
        Ok(removed)
    }

    /// Remove the tiles of a single layer; the layer must currently exist
    pub fn delete_layer(&self, project: &str, layer: &str) -> CacheResult<bool> {
        if !self.enumerate_layers(project)?.iter().any(|l| l == layer) {
            return Err(CacheError::LayerNotFound(layer.to_string()));
        }
        let removed = self.delete_subtree(&self.tiles_root(project)?.join(layer))?;
        info!(project, layer, "Removed cached layer");
        Ok(removed)
    }

    /// Remove a whole collection: documents, tiles and marker
    pub fn delete_collection(&self, project: &str) -> CacheResult<bool> {
        self.delete_collection_by_id(&project_digest(project)?)
    }

    /// Remove `root/<id>/` and `root/<id>.inf`, whatever the marker says
    pub fn delete_collection_by_id(&self, id: &str) -> CacheResult<bool> {
        if !is_collection_id(id) {
            return Err(CacheError::CollectionNotFound(id.to_string()));
        }
        let dir_removed = self.delete_subtree(&self.collection_dir(id))?;
        let marker_removed = self.delete(&self.marker_path(id))?;
        if dir_removed || marker_removed {
            info!(id, "Removed cache collection");
        }
        Ok(dir_removed || marker_removed)
    }
}

/// Collection ids are digests; anything else cannot name a marker
fn is_collection_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Create a directory tree readable by owner and group only
fn create_dir_restricted(path: &Path) -> CacheResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(path).map_err(|e| CacheError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::meta::META_FILE;
    use tempfile::tempdir;

    const PROJECT: &str = "/data/france_parts.qgs";

    fn capabilities() -> Vec<(&'static str, &'static str)> {
        vec![
            ("MAP", PROJECT),
            ("REQUEST", "GetCapabilities"),
            ("SERVICE", "WMTS"),
        ]
    }

    fn tile(layer: &str, col: u64, row: u64) -> TileRequest {
        TileRequest {
            layer: layer.to_string(),
            tile_matrix_set: "EPSG:4326".to_string(),
            style: String::new(),
            column: col,
            row,
            level: "0".to_string(),
            format: Some("image/png".to_string()),
        }
    }

    fn store(root: &Path) -> CacheStore {
        CacheStore::create(root, Layout::Tc).unwrap()
    }

    #[test]
    fn test_create_writes_metadata() {
        let temp = tempdir().unwrap();
        let store = CacheStore::create(temp.path(), Layout::Mp).unwrap();
        assert_eq!(store.layout(), Layout::Mp);
        assert!(temp.path().join(META_FILE).exists());

        let reopened = CacheStore::open_existing(temp.path()).unwrap();
        assert_eq!(reopened.layout(), Layout::Mp);
    }

    #[test]
    fn test_unknown_layout() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            CacheStore::from_config(&CacheConfig::new(temp.path()).with_layout("bogus")),
            Err(CacheError::UnknownLayout(_))
        ));
        assert!(!temp.path().join(META_FILE).exists());
    }

    #[test]
    fn test_open_or_create_keeps_recorded_layout() {
        let temp = tempdir().unwrap();
        let config = CacheConfig::new(temp.path()).with_layout("mp");
        assert_eq!(CacheStore::open_or_create(&config).unwrap().layout(), Layout::Mp);

        // Default layout on an existing root leaves the metadata alone
        let store = CacheStore::open_or_create(&CacheConfig::new(temp.path())).unwrap();
        assert_eq!(store.layout(), Layout::Mp);
        assert_eq!(read_meta(temp.path()).unwrap().layout, Layout::Mp);

        assert!(CacheStore::open_or_create(&CacheConfig::new(temp.path().join("x"))).is_err());
    }

    #[test]
    fn test_open_or_disable() {
        let temp = tempdir().unwrap();
        assert!(CacheStore::open_or_disable(&CacheConfig::new(temp.path())).is_some());
        assert!(CacheStore::open_or_disable(&CacheConfig::new(temp.path().join("x"))).is_none());
        assert!(
            CacheStore::open_or_disable(&CacheConfig::new(temp.path()).with_layout("x")).is_none()
        );
    }

    #[test]
    fn test_document_path_shape() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let path = store.document_path(PROJECT, capabilities(), ".xml", false).unwrap();

        let digest = project_digest(PROJECT).unwrap();
        let expected_dir = temp.path().join(&digest).join(DOCS_DIR);
        assert_eq!(path.parent().unwrap(), expected_dir);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}.xml", document_digest(PROJECT, capabilities()).unwrap())
        );
        // Lookup alone creates nothing
        assert!(!expected_dir.exists());
        assert!(store.enumerate_collections().unwrap().is_empty());
    }

    #[test]
    fn test_document_path_order_independent() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let mut reversed = capabilities();
        reversed.reverse();
        assert_eq!(
            store.document_path(PROJECT, capabilities(), ".xml", false).unwrap(),
            store.document_path(PROJECT, reversed, ".xml", false).unwrap()
        );
    }

    #[test]
    fn test_document_path_rejects_empty_project() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        assert!(matches!(
            store.document_path("", capabilities(), ".xml", true),
            Err(CacheError::InvalidIdentifier)
        ));
    }

    #[test]
    fn test_create_parents_registers_once() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        let first = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        let second = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        assert_eq!(first, second);
        assert!(first.parent().unwrap().is_dir());

        let marker = temp
            .path()
            .join(format!("{}.inf", project_digest(PROJECT).unwrap()));
        assert_eq!(fs::read_to_string(&marker).unwrap(), PROJECT);

        let collections = store.enumerate_collections().unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].project, PROJECT);
        assert_eq!(collections[0].id, project_digest(PROJECT).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_docs_dir_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let path = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        let mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
        assert_eq!(mode & 0o007, 0);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let path = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();

        assert_eq!(store.read(&path).unwrap(), None);
        store.write(&path, b"<Capabilities/>").unwrap();
        assert_eq!(store.read(&path).unwrap().unwrap(), b"<Capabilities/>");

        assert!(store.delete(&path).unwrap());
        assert!(!store.delete(&path).unwrap());
        assert_eq!(store.read(&path).unwrap(), None);
    }

    #[test]
    fn test_tile_path_shape() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let path = store.tile_path(PROJECT, &tile("roads", 0, 0), false).unwrap();

        let variant = tile_variant_digest(PROJECT, "roads", "EPSG:4326", "").unwrap();
        let expected = store
            .tiles_root(PROJECT)
            .unwrap()
            .join("roads")
            .join(variant)
            .join("00/000/000/000/000/000/000.png");
        assert_eq!(path, expected);
    }

    #[test]
    fn test_tile_variant_buckets() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        let a = store.tile_path(PROJECT, &tile("roads", 1, 2), false).unwrap();
        let b = store.tile_path(PROJECT, &tile("roads", 3, 4), false).unwrap();
        let mut jpeg = tile("roads", 1, 2);
        jpeg.format = Some("image/jpeg".to_string());
        let c = store.tile_path(PROJECT, &jpeg, false).unwrap();

        // Same bucket, different files
        let bucket = |p: &Path| p.ancestors().nth(7).unwrap().to_path_buf();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(bucket(&a), bucket(&b));
        assert_eq!(bucket(&a), bucket(&c));

        let mut styled = tile("roads", 1, 2);
        styled.style = "dark".to_string();
        let d = store.tile_path(PROJECT, &styled, false).unwrap();
        assert_ne!(bucket(&a), bucket(&d));
    }

    #[test]
    fn test_tile_path_unsupported_format() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let mut bad = tile("roads", 0, 0);
        bad.format = Some("application/json".to_string());
        assert!(matches!(
            store.tile_path(PROJECT, &bad, true),
            Err(CacheError::UnsupportedFormat(_))
        ));
        assert!(store.enumerate_collections().unwrap().is_empty());
    }

    #[test]
    fn test_enumerate_layers_and_count_documents() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());

        assert!(store.enumerate_layers(PROJECT).unwrap().is_empty());
        assert_eq!(store.count_documents(PROJECT).unwrap(), 0);

        for layer in ["rivers", "roads"] {
            let path = store.tile_path(PROJECT, &tile(layer, 0, 0), true).unwrap();
            store.write(&path, b"png").unwrap();
        }
        let doc = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        store.write(&doc, b"<xml/>").unwrap();

        assert_eq!(store.enumerate_layers(PROJECT).unwrap(), vec!["rivers", "roads"]);
        assert_eq!(store.count_documents(PROJECT).unwrap(), 1);
    }

    #[test]
    fn test_delete_layer_keeps_siblings() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        for layer in ["rivers", "roads"] {
            let path = store.tile_path(PROJECT, &tile(layer, 0, 0), true).unwrap();
            store.write(&path, b"png").unwrap();
        }
        let doc = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        store.write(&doc, b"<xml/>").unwrap();

        assert!(store.delete_layer(PROJECT, "roads").unwrap());
        assert_eq!(store.enumerate_layers(PROJECT).unwrap(), vec!["rivers"]);
        assert!(doc.exists());

        assert!(matches!(
            store.delete_layer(PROJECT, "roads"),
            Err(CacheError::LayerNotFound(name)) if name == "roads"
        ));
    }

    #[test]
    fn test_delete_documents_and_layers() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let path = store.tile_path(PROJECT, &tile("roads", 0, 0), true).unwrap();
        store.write(&path, b"png").unwrap();
        let doc = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        store.write(&doc, b"<xml/>").unwrap();

        assert!(store.delete_documents(PROJECT).unwrap());
        assert!(!store.documents_root(PROJECT).unwrap().exists());
        assert!(path.exists());
        assert!(!store.delete_documents(PROJECT).unwrap());

        assert!(store.delete_layers(PROJECT).unwrap());
        assert!(!store.tiles_root(PROJECT).unwrap().exists());
        // Collection stays registered
        assert_eq!(store.enumerate_collections().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_collection() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let other = "/data/other.qgs";
        for project in [PROJECT, other] {
            let doc = store.document_path(project, capabilities(), ".xml", true).unwrap();
            store.write(&doc, b"<xml/>").unwrap();
            let path = store.tile_path(project, &tile("roads", 0, 0), true).unwrap();
            store.write(&path, b"png").unwrap();
        }

        assert!(store.delete_collection(PROJECT).unwrap());
        assert!(!store.documents_root(PROJECT).unwrap().exists());
        assert!(!store.tiles_root(PROJECT).unwrap().exists());

        let remaining = store.enumerate_collections().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].project, other);
        assert!(!store.delete_collection(PROJECT).unwrap());
    }

    #[test]
    fn test_delete_collection_by_id_ignores_marker_text() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        let doc = store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();
        store.write(&doc, b"<xml/>").unwrap();

        let id = project_digest(PROJECT).unwrap();
        fs::write(temp.path().join(format!("{}.inf", id)), format!("{}\n", PROJECT)).unwrap();

        assert!(store.delete_collection_by_id(&id).unwrap());
        assert!(!temp.path().join(&id).exists());
        assert!(store.enumerate_collections().unwrap().is_empty());
        assert!(!store.delete_collection_by_id(&id).unwrap());
        assert!(store.delete_collection_by_id("../x").is_err());
    }

    #[test]
    fn test_tile_path_rejects_escaping_layer() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        for layer in ["/etc", "..", "a/b", ""] {
            assert!(matches!(
                store.tile_path(PROJECT, &tile(layer, 0, 0), true),
                Err(CacheError::InvalidPathComponent { name: "LAYER", .. })
            ));
        }
        assert!(store.enumerate_collections().unwrap().is_empty());
    }

    #[test]
    fn test_find_collection() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        store.document_path(PROJECT, capabilities(), ".xml", true).unwrap();

        let id = project_digest(PROJECT).unwrap();
        assert_eq!(store.find_collection(&id).unwrap().project, PROJECT);
        assert!(matches!(
            store.find_collection("foobar"),
            Err(CacheError::CollectionNotFound(name)) if name == "foobar"
        ));
        assert!(store.find_collection("../etc").is_err());
        assert!(store.find_collection("").is_err());
    }

    #[test]
    fn test_enumerate_ignores_unrelated_files() {
        let temp = tempdir().unwrap();
        let store = store(temp.path());
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("dir.inf")).unwrap();
        assert!(store.enumerate_collections().unwrap().is_empty());
    }
}
