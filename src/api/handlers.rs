//! Management API route handlers
//!
//! Every request re-reads the filesystem: collection ids resolve through
//! their marker file and layer names through the live layer listing, so a
//! DELETE is visible to the very next GET.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::types::{
    CollectionDetail, CollectionList, CollectionSummary, Deleted, DocumentsInfo, LandingPage,
    LayerDetail, LayerList, LayerSummary, Link,
};
use crate::cache::error::{CacheError, CacheResult};
use crate::cache::store::CacheStore;

const TITLE_PREFIX: &str = "WMTS Cache manager";

/// Shared state for the management routes
#[derive(Debug)]
pub struct ApiState {
    pub store: Arc<CacheStore>,
    /// Mount prefix without trailing slash, used to build links
    pub base: String,
}

impl ApiState {
    fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn collection_href(&self, id: &str) -> String {
        self.href(&format!("/collections/{}", id))
    }

    fn layer_summary(&self, id: &str, layer: String) -> LayerSummary {
        let href = format!("{}/layers/{}.json", self.collection_href(id), layer);
        LayerSummary {
            links: vec![Link::json(href, "item", "Cache layer")],
            id: layer,
        }
    }
}

fn title(resource: &str) -> String {
    format!("{} {} as JSON", TITLE_PREFIX, resource)
}

/// Accept both `/x` and `/x.json`
fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Run filesystem work off the async executor
async fn blocking<T, F>(state: &ApiState, f: F) -> ApiResult<T>
where
    F: FnOnce(&CacheStore) -> CacheResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
}

/// Resolve a layer path segment against the current layer listing
fn resolve_layer(store: &CacheStore, project: &str, segment: &str) -> CacheResult<String> {
    let layers = store.enumerate_layers(project)?;
    let stripped = strip_json(segment);
    [segment, stripped]
        .into_iter()
        .find(|name| layers.iter().any(|l| l == name))
        .map(str::to_string)
        .ok_or_else(|| CacheError::LayerNotFound(stripped.to_string()))
}

/// GET / - links to the collections resource
pub async fn landing_page(State(state): State<Arc<ApiState>>) -> Json<LandingPage> {
    Json(LandingPage {
        links: vec![
            Link::json(state.href("/"), "self", title("LandingPage")),
            Link::json(
                state.href("/collections.json"),
                "data",
                title("Collections"),
            ),
        ],
    })
}

/// GET /collections - every registered collection
pub async fn list_collections(State(state): State<Arc<ApiState>>) -> ApiResult<Json<CollectionList>> {
    let collections = blocking(&state, |store| store.enumerate_collections()).await?;

    let collections = collections
        .into_iter()
        .map(|c| CollectionSummary {
            links: vec![Link::json(
                format!("{}.json", state.collection_href(&c.id)),
                "item",
                "Cache collection",
            )],
            id: c.id,
            project: c.project,
        })
        .collect();

    Ok(Json(CollectionList {
        cache_layout: state.store.layout().name().to_string(),
        collections,
        links: vec![Link::json(
            state.href("/collections.json"),
            "self",
            title("Collections"),
        )],
    }))
}

/// GET /collections/{id}
pub async fn get_collection(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CollectionDetail>> {
    let id = strip_json(&id).to_string();
    let lookup_id = id.clone();
    let (info, layers) = blocking(&state, move |store| {
        let info = store.find_collection(&lookup_id)?;
        let layers = store.enumerate_layers(&info.project)?;
        Ok((info, layers))
    })
    .await?;

    let base = state.collection_href(&id);
    Ok(Json(CollectionDetail {
        layers: layers
            .into_iter()
            .map(|layer| state.layer_summary(&id, layer))
            .collect(),
        links: vec![
            Link::json(format!("{}.json", base), "self", title("ProjectCollection")),
            Link::json(format!("{}/docs.json", base), "item", "Cache collection documents"),
            Link::json(format!("{}/layers.json", base), "item", "Cache collection layers"),
        ],
        id: info.id,
        project: info.project,
    }))
}

/// DELETE /collections/{id} - documents, tiles and marker
pub async fn delete_collection(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let id = strip_json(&id).to_string();
    blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        store.delete_collection_by_id(&info.id)
    })
    .await?;
    Ok(Json(Deleted::default()))
}

/// GET /collections/{id}/docs
pub async fn get_documents(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DocumentsInfo>> {
    let (info, documents) = blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        let documents = store.count_documents(&info.project)?;
        Ok((info, documents))
    })
    .await?;

    let href = format!("{}/docs.json", state.collection_href(&info.id));
    Ok(Json(DocumentsInfo {
        id: info.id,
        project: info.project,
        documents,
        links: vec![Link::json(href, "self", title("DocumentCollection"))],
    }))
}

/// DELETE /collections/{id}/docs - documents only
pub async fn delete_documents(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        store.delete_documents(&info.project)
    })
    .await?;
    Ok(Json(Deleted::default()))
}

/// GET /collections/{id}/layers
pub async fn get_layers(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LayerList>> {
    let (info, layers) = blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        let layers = store.enumerate_layers(&info.project)?;
        Ok((info, layers))
    })
    .await?;

    let href = format!("{}/layers.json", state.collection_href(&info.id));
    Ok(Json(LayerList {
        layers: layers
            .into_iter()
            .map(|layer| state.layer_summary(&info.id, layer))
            .collect(),
        links: vec![Link::json(href, "self", title("LayerCollection"))],
        id: info.id,
        project: info.project,
    }))
}

/// DELETE /collections/{id}/layers - all tiles of the collection
pub async fn delete_layers(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        store.delete_layers(&info.project)
    })
    .await?;
    Ok(Json(Deleted::default()))
}

/// GET /collections/{id}/layers/{layerId}
pub async fn get_layer(
    State(state): State<Arc<ApiState>>,
    Path((id, layer)): Path<(String, String)>,
) -> ApiResult<Json<LayerDetail>> {
    let lookup_id = id.clone();
    let layer = blocking(&state, move |store| {
        let info = store.find_collection(&lookup_id)?;
        resolve_layer(store, &info.project, &layer)
    })
    .await?;

    let href = format!("{}/layers/{}.json", state.collection_href(&id), layer);
    Ok(Json(LayerDetail {
        id: layer,
        links: vec![Link::json(href, "self", title("LayerCache"))],
    }))
}

/// DELETE /collections/{id}/layers/{layerId} - a single layer
pub async fn delete_layer(
    State(state): State<Arc<ApiState>>,
    Path((id, layer)): Path<(String, String)>,
) -> ApiResult<Json<Deleted>> {
    blocking(&state, move |store| {
        let info = store.find_collection(&id)?;
        let layer = resolve_layer(store, &info.project, &layer)?;
        store.delete_layer(&info.project, &layer)
    })
    .await?;
    Ok(Json(Deleted::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json() {
        assert_eq!(strip_json("abc.json"), "abc");
        assert_eq!(strip_json("abc"), "abc");
        assert_eq!(strip_json(".json"), "");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("Collections"), "WMTS Cache manager Collections as JSON");
    }
}
