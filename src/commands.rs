//! Admin commands over an existing cache root
//!
//! Each command builds a ResultSet and prints it with the selected renderer.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::warn;

use crate::cache::error::CacheError;
use crate::cache::store::CacheStore;
use crate::core::digest::project_digest;
use crate::core::layout::Layout;
use crate::core::model::{ItemError, ResultItem, ResultSet};
use crate::core::paths::{normalize_path, ProjectMatcher};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::request::TileRequest;

fn open_store(root: &Path) -> Result<CacheStore> {
    CacheStore::open_existing(root)
        .with_context(|| format!("Failed to open cache at {}", root.display()))
}

fn no_match(name: &str) -> ResultItem {
    ResultItem::error(ItemError::new(
        "NOT_FOUND",
        format!("No projects found for {}", name),
    ))
}

fn print(result_set: &ResultSet, render_config: RenderConfig) {
    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(result_set));
}

/// Summaries of every collection whose project matches `name`
pub fn list_collections(root: &Path, name: &str) -> Result<ResultSet> {
    let store = open_store(root)?;
    let matcher = ProjectMatcher::new(name).with_context(|| format!("Invalid pattern: {}", name))?;
    let layout = store.layout().name();

    let mut result_set = ResultSet::new();
    for collection in store.enumerate_collections()? {
        if !matcher.is_match(&collection.project) {
            continue;
        }
        let layers = store.enumerate_layers(&collection.project)?;
        let documents = store.count_documents(&collection.project)?;
        result_set.push(
            ResultItem::collection(collection.id, collection.project)
                .with_layout(layout)
                .with_layers(layers)
                .with_documents(documents),
        );
    }
    if result_set.is_empty() {
        result_set.push(no_match(name));
    }
    Ok(result_set)
}

/// Remove matching collections, or a single layer of each
pub fn delete_collections(root: &Path, name: &str, layer: Option<&str>) -> Result<ResultSet> {
    let store = open_store(root)?;
    let matcher = ProjectMatcher::new(name).with_context(|| format!("Invalid pattern: {}", name))?;

    let mut result_set = ResultSet::new();
    let mut matched = 0;
    for collection in store.enumerate_collections()? {
        let project = collection.project;
        if !matcher.is_match(&project) {
            continue;
        }
        matched += 1;

        // A marker whose content does not hash to its name is foreign
        if project_digest(&project).ok().as_deref() != Some(collection.id.as_str()) {
            warn!(id = %collection.id, project = %project, "Collection hash mismatch, skipping");
            result_set.push(
                ResultItem::skipped(
                    collection.id,
                    ItemError::new("HASH_MISMATCH", "Project does not match collection hash"),
                )
                .with_project(project),
            );
            continue;
        }

        match layer {
            Some(layer) => {
                let path = store.tiles_root(&project)?.join(layer);
                match store.delete_layer(&project, layer) {
                    Ok(_) => result_set.push(
                        ResultItem::removed(normalize_path(&path)).with_project(project),
                    ),
                    Err(CacheError::LayerNotFound(_)) => result_set.push(
                        ResultItem::skipped(
                            collection.id,
                            ItemError::new("LAYER_NOT_FOUND", format!("Layer '{}' not found", layer)),
                        )
                        .with_project(project),
                    ),
                    Err(e) => return Err(e.into()),
                }
            }
            None => {
                let path = root.join(&collection.id);
                store.delete_collection(&project)?;
                result_set.push(ResultItem::removed(normalize_path(&path)).with_project(project));
            }
        }
    }
    if matched == 0 {
        result_set.push(no_match(name));
    }
    Ok(result_set)
}

/// Split `KEY=VALUE` arguments
pub fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("Invalid parameter {:?}, expected KEY=VALUE", arg),
        })
        .collect()
}

/// Compute where a request would be cached, without touching the cache
pub fn locate_entry(
    root: &Path,
    layout: &str,
    project: &str,
    suffix: &str,
    params: &[(String, String)],
) -> Result<ResultSet> {
    let store = match CacheStore::open_existing(root) {
        Ok(store) => store,
        Err(CacheError::MissingMetadata(_)) => CacheStore::new(root, layout.parse::<Layout>()?),
        Err(e) => return Err(e.into()),
    };

    let pairs = params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let item = if TileRequest::is_tile_request(pairs.clone()) {
        let tile = TileRequest::from_params(pairs)?;
        let path = store.tile_path(project, &tile, false)?;
        ResultItem::tile(normalize_path(&path))
    } else {
        let path = store.document_path(project, pairs, suffix, false)?;
        ResultItem::document(normalize_path(&path))
    };

    Ok(std::iter::once(item.with_project(project).with_layout(store.layout().name())).collect())
}

pub fn run_list(root: &Path, name: &str, render_config: RenderConfig) -> Result<()> {
    print(&list_collections(root, name)?, render_config);
    Ok(())
}

pub fn run_delete(
    root: &Path,
    name: &str,
    layer: Option<&str>,
    render_config: RenderConfig,
) -> Result<()> {
    print(&delete_collections(root, name, layer)?, render_config);
    Ok(())
}

pub fn run_locate(
    root: &Path,
    layout: &str,
    project: &str,
    suffix: &str,
    params: &[String],
    render_config: RenderConfig,
) -> Result<()> {
    let params = parse_params(params)?;
    print(&locate_entry(root, layout, project, suffix, &params)?, render_config);
    Ok(())
}
