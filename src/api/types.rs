//! Response bodies for the management API

use serde::Serialize;

pub const JSON_MIME: &str = "application/json";

/// Hypermedia link attached to every resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub rel: &'static str,
    #[serde(rename = "type")]
    pub mime_type: &'static str,
    pub title: String,
}

impl Link {
    pub fn json(href: impl Into<String>, rel: &'static str, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel,
            mime_type: JSON_MIME,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub project: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionList {
    pub cache_layout: String,
    pub collections: Vec<CollectionSummary>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub id: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    pub id: String,
    pub project: String,
    pub layers: Vec<LayerSummary>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentsInfo {
    pub id: String,
    pub project: String,
    pub documents: usize,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerList {
    pub id: String,
    pub project: String,
    pub layers: Vec<LayerSummary>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerDetail {
    pub id: String,
    pub links: Vec<Link>,
}

/// Body returned by successful DELETE requests
#[derive(Debug, Clone, Default, Serialize)]
pub struct Deleted {}
