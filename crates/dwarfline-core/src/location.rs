//! Source locations returned by address lookups.

use std::fmt;

/// Marker shown in place of context that the line tables cannot supply.
pub const NOT_AVAILABLE: &str = "* not available";

/// The source location an address resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLocation {
    /// Source line number.
    pub line: i64,
    /// Directory part of the source path (empty when the path has no `/`).
    pub directory: String,
    /// File name part of the source path.
    pub file: String,
    /// Extra context such as the enclosing function. Line tables alone never
    /// carry it, so this is `None` for every location produced here.
    pub context: Option<String>,
}

impl DebugLocation {
    /// Build a location by splitting `path` at its last `/`.
    pub fn from_path(line: i64, path: &str) -> Self {
        let (directory, file) = match path.rfind('/') {
            Some(slash) => (&path[..slash], &path[slash + 1..]),
            None => ("", path),
        };
        Self {
            line,
            directory: directory.to_string(),
            file: file.to_string(),
            context: None,
        }
    }

    /// Returns the extra context, or the "not available" marker.
    pub fn context_or_marker(&self) -> &str {
        self.context.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Directory and file joined back together.
    pub fn path(&self) -> String {
        if self.directory.is_empty() {
            self.file.clone()
        } else {
            format!("{}/{}", self.directory, self.file)
        }
    }
}

impl fmt::Display for DebugLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path(), self.line)
    }
}
