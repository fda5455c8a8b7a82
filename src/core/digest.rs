//! Digest engine - content addresses for projects, documents and tile variants
//!
//! Every digest is an MD5 over an ordered byte sequence, rendered as 32
//! lowercase hex characters. Document and tile digests extend the project
//! identifier bytes, so `document_digest(p, m)` equals `md5(p || canonical_query(m))`.

use md5::{Digest as _, Md5};
use std::collections::BTreeMap;

use crate::cache::error::{CacheError, CacheResult};

/// Hex digest used as a directory or file name component
pub type Digest = String;

/// Hash an ordered sequence of byte chunks
pub fn hash_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Digest {
    let mut hasher = Md5::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    format!("{:x}", hasher.finalize())
}

fn check_identifier(identifier: &str) -> CacheResult<()> {
    if identifier.is_empty() {
        return Err(CacheError::InvalidIdentifier);
    }
    Ok(())
}

/// Digest of a project identifier (the collection id)
pub fn project_digest(identifier: &str) -> CacheResult<Digest> {
    check_identifier(identifier)?;
    Ok(hash_chunks([identifier.as_bytes()]))
}

/// Canonical `k1=v1&k2=v2` form with keys sorted ascending
pub fn canonical_query<K, V>(params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Digest of a document request; independent of parameter iteration order
pub fn document_digest<K, V>(
    identifier: &str,
    params: impl IntoIterator<Item = (K, V)>,
) -> CacheResult<Digest>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    check_identifier(identifier)?;
    let query = canonical_query(params);
    Ok(hash_chunks([identifier.as_bytes(), query.as_bytes()]))
}

/// Digest of a tile variant bucket.
///
/// Only layer, tile matrix set and style contribute; coordinates and format
/// are encoded by the layout instead.
pub fn tile_variant_digest(
    identifier: &str,
    layer: &str,
    tile_matrix_set: &str,
    style: &str,
) -> CacheResult<Digest> {
    check_identifier(identifier)?;
    Ok(hash_chunks([
        identifier.as_bytes(),
        layer.as_bytes(),
        tile_matrix_set.as_bytes(),
        style.as_bytes(),
    ]))
}

/// File extension for an image mime type (`image/jpeg*`, `image/png*`)
pub fn image_extension(format: &str) -> CacheResult<&'static str> {
    if format.starts_with("image/jpeg") {
        Ok(".jpg")
    } else if format.starts_with("image/png") {
        Ok(".png")
    } else {
        Err(CacheError::UnsupportedFormat(format.to_string()))
    }
}

/// Tile extension, defaulting to `.png` when no format was requested
pub fn tile_extension(format: Option<&str>) -> CacheResult<&'static str> {
    match format {
        Some(fmt) if !fmt.is_empty() => image_extension(fmt),
        _ => Ok(".png"),
    }
}
