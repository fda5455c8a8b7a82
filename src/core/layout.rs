//! Tile layouts - map tile coordinates to nested cache paths
//!
//! * `tc`: TileCache compatible layout (`zz/xxx/xxx/xxx/yyy/yyy/yyy.ext`)
//! * `mp`: MapProxy layout (`zz/xxxx/xxxx/yyyy/yyyy.ext`), fewer directory levels
//! * `tms`: TMS compatible layout (`z/x/y.ext`)
//! * `reverse_tms`: TMS with level and row swapped (`y/x/z.ext`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cache::error::CacheError;

/// Directory layout used for tile files under a variant bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Tc,
    Mp,
    Tms,
    ReverseTms,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Tc, Layout::Mp, Layout::Tms, Layout::ReverseTms];

    /// Name as recorded in the root metadata
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Tc => "tc",
            Layout::Mp => "mp",
            Layout::Tms => "tms",
            Layout::ReverseTms => "reverse_tms",
        }
    }

    /// Compute the tile file path under `base`. Pure, no i/o.
    pub fn locate(&self, base: &Path, column: u64, row: u64, level: &str, ext: &str) -> PathBuf {
        let parts: Vec<String> = match self {
            Layout::Tc => vec![
                pad_level(level),
                format!("{:03}", column / 1_000_000),
                format!("{:03}", (column / 1000) % 1000),
                format!("{:03}", column % 1000),
                format!("{:03}", row / 1_000_000),
                format!("{:03}", (row / 1000) % 1000),
                format!("{:03}", row % 1000),
            ],
            Layout::Mp => vec![
                pad_level(level),
                format!("{:04}", column / 10_000),
                format!("{:04}", column % 10_000),
                format!("{:04}", row / 10_000),
                format!("{:04}", row % 10_000),
            ],
            Layout::Tms => vec![level.to_string(), column.to_string(), row.to_string()],
            Layout::ReverseTms => vec![row.to_string(), column.to_string(), level.to_string()],
        };

        with_extension(base, &parts, ext)
    }
}

/// Zero-pad integer levels to two digits; other tokens pass through
fn pad_level(level: &str) -> String {
    match level.parse::<i64>() {
        Ok(z) => format!("{:02}", z),
        Err(_) => level.to_string(),
    }
}

fn with_extension(base: &Path, parts: &[String], ext: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    if let Some((last, dirs)) = parts.split_last() {
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{}{}", last, ext));
    }
    path
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Layout {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tc" => Ok(Layout::Tc),
            "mp" => Ok(Layout::Mp),
            "tms" => Ok(Layout::Tms),
            "reverse_tms" => Ok(Layout::ReverseTms),
            _ => Err(CacheError::UnknownLayout(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(layout: Layout, column: u64, row: u64, level: &str, ext: &str) -> String {
        layout
            .locate(Path::new(""), column, row, level, ext)
            .to_string_lossy()
            .replace('\\', "/")
    }

    #[test]
    fn test_origin_tile() {
        assert_eq!(rel(Layout::Tc, 0, 0, "0", ".png"), "00/000/000/000/000/000/000.png");
        assert_eq!(rel(Layout::Mp, 0, 0, "0", ".png"), "00/0000/0000/0000/0000.png");
        assert_eq!(rel(Layout::Tms, 0, 0, "0", ".png"), "0/0/0.png");
        assert_eq!(rel(Layout::ReverseTms, 0, 0, "0", ".png"), "0/0/0.png");
    }

    #[test]
    fn test_tms_and_reverse_ordering() {
        assert_eq!(rel(Layout::Tms, 2, 3, "1", ".png"), "1/2/3.png");
        assert_eq!(rel(Layout::ReverseTms, 2, 3, "1", ".png"), "3/2/1.png");
    }

    #[test]
    fn test_tc_grouping() {
        assert_eq!(
            rel(Layout::Tc, 12_345_678, 987_654, "18", ".jpg"),
            "18/012/345/678/000/987/654.jpg"
        );
    }

    #[test]
    fn test_mp_grouping() {
        assert_eq!(
            rel(Layout::Mp, 123_456, 7, "5", ".png"),
            "05/0012/3456/0000/0007.png"
        );
    }

    #[test]
    fn test_non_numeric_level_passes_through() {
        assert_eq!(
            rel(Layout::Tc, 1, 2, "EPSG:4326:3", ".png"),
            "EPSG:4326:3/000/000/001/000/000/002.png"
        );
        assert_eq!(rel(Layout::Mp, 1, 2, "L3", ".png"), "L3/0000/0001/0000/0002.png");
    }

    #[test]
    fn test_locate_under_base() {
        let path = Layout::Tms.locate(Path::new("/cache/tiles/roads/abc"), 4, 5, "6", ".png");
        assert!(path.starts_with("/cache/tiles/roads/abc"));
        assert!(path.ends_with("6/4/5.png"));
    }

    #[test]
    fn test_parse_names() {
        for layout in Layout::ALL {
            assert_eq!(layout.name().parse::<Layout>().unwrap(), layout);
            assert_eq!(layout.to_string(), layout.name());
        }
        assert!(matches!(
            "quadkey".parse::<Layout>(),
            Err(CacheError::UnknownLayout(name)) if name == "quadkey"
        ));
    }
}
