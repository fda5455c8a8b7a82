//! Typed view of WMTS GetTile parameters

use std::collections::HashMap;
use std::path::Path;

use crate::cache::error::{CacheError, CacheResult};

/// Layer name used when a request carries no LAYER parameter
pub const DEFAULT_LAYER: &str = "_none";

/// The parameters that address a cached tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub layer: String,
    pub tile_matrix_set: String,
    pub style: String,
    pub column: u64,
    pub row: u64,
    pub level: String,
    pub format: Option<String>,
}

impl TileRequest {
    /// Build from raw request parameters. Keys are matched case-insensitively.
    pub fn from_params<K, V>(params: impl IntoIterator<Item = (K, V)>) -> CacheResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params: HashMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_uppercase(), v.as_ref().to_string()))
            .collect();

        let get = |key: &str| params.get(key).cloned();

        let level = get("TILEMATRIX").ok_or(CacheError::MissingParameter("TILEMATRIX"))?;
        let row = parse_coordinate(&params, "TILEROW")?;
        let column = parse_coordinate(&params, "TILECOL")?;

        let request = Self {
            layer: get("LAYER").unwrap_or_else(|| DEFAULT_LAYER.to_string()),
            tile_matrix_set: get("TILEMATRIXSET").unwrap_or_default(),
            style: get("STYLE").unwrap_or_default(),
            column,
            row,
            level,
            format: get("FORMAT"),
        };
        request.validate()?;
        Ok(request)
    }

    /// Reject layer and level values that would not stay a single path segment
    pub fn validate(&self) -> CacheResult<()> {
        check_path_component("LAYER", &self.layer)?;
        check_path_component("TILEMATRIX", &self.level)
    }

    /// Whether a parameter set looks like a tile request
    pub fn is_tile_request<K: AsRef<str>, V>(params: impl IntoIterator<Item = (K, V)>) -> bool {
        params
            .into_iter()
            .any(|(k, _)| k.as_ref().eq_ignore_ascii_case("TILEMATRIX"))
    }
}

/// A value used verbatim as one directory or file name
pub fn check_path_component(name: &'static str, value: &str) -> CacheResult<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0'])
        || Path::new(value).is_absolute();
    if invalid {
        return Err(CacheError::InvalidPathComponent {
            name,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_coordinate(params: &HashMap<String, String>, name: &'static str) -> CacheResult<u64> {
    let raw = params.get(name).ok_or(CacheError::MissingParameter(name))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CacheError::InvalidCoordinate {
            name,
            value: raw.clone(),
        })
}
