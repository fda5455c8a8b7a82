//! Unified Result Model
//!
//! Every admin command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Collection,
    Document,
    Tile,
    Removed,
    Skipped,
    Error,
}

/// Error or warning attached to a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The result item all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Collection digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw project identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Filesystem path, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Cache layout name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<String>,

    /// Number of cached documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            id: None,
            project: None,
            path: None,
            layout: None,
            layers: Vec::new(),
            documents: None,
            errors: Vec::new(),
        }
    }

    /// Create a collection summary
    pub fn collection(id: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            project: Some(project.into()),
            ..Self::empty(Kind::Collection)
        }
    }

    /// Create a located document path
    pub fn document(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::empty(Kind::Document)
        }
    }

    /// Create a located tile path
    pub fn tile(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::empty(Kind::Tile)
        }
    }

    /// Create a removal record
    pub fn removed(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::empty(Kind::Removed)
        }
    }

    /// Create a skipped entry with the reason
    pub fn skipped(id: impl Into<String>, reason: ItemError) -> Self {
        Self {
            id: Some(id.into()),
            errors: vec![reason],
            ..Self::empty(Kind::Skipped)
        }
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        Self {
            errors: vec![error],
            ..Self::empty(Kind::Error)
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_documents(mut self, documents: usize) -> Self {
        self.documents = Some(documents);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
