//! Path utilities
//!
//! Path display normalization and project name matching for the admin commands.

use globset::{Glob, GlobMatcher};
use std::path::Path;

/// Project file extension tried when a name is given without one
pub const PROJECT_EXT: &str = ".qgs";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Matches project identifiers against a user supplied name or glob.
///
/// A project matches when the glob matches its full path or its file name,
/// either as given or with the project extension appended. `*` matches
/// everything.
pub struct ProjectMatcher {
    raw: String,
    globs: Vec<GlobMatcher>,
}

impl ProjectMatcher {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let mut globs = vec![Glob::new(pattern)?.compile_matcher()];
        if !pattern.ends_with(PROJECT_EXT) {
            // `dir/**` has no valid extension form
            if let Ok(glob) = Glob::new(&format!("{}{}", pattern, PROJECT_EXT)) {
                globs.push(glob.compile_matcher());
            }
        }
        Ok(Self {
            raw: pattern.to_string(),
            globs,
        })
    }

    pub fn is_match(&self, project: &str) -> bool {
        if self.raw == "*" {
            return true;
        }
        let path = Path::new(project);
        let name = path.file_name().map(Path::new);

        self.globs.iter().any(|glob| {
            glob.is_match(path) || name.map(|n| glob.is_match(n)).unwrap_or(false)
        })
    }
}
