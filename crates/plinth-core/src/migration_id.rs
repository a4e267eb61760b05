//! Storage-relative migration file identifiers.

use crate::newtype_string::define_newtype_string;
use std::path::{Component, Path};

define_newtype_string! {
    /// Identifier of a migration file as recorded in the completed set.
    ///
    /// This is the file path with the content root stripped, always using `/`
    /// separators and a leading `/` (e.g. `/acme-events/migrations/001-init.sql`).
    /// Identifiers are shared across every repo using the same option store,
    /// so the content root should sit above the repo directory.
    pub struct MigrationId;
}

impl MigrationId {
    /// Build the identifier for `path` relative to `content_root`.
    ///
    /// Paths outside the content root keep their full form (still with `/`
    /// separators) so they remain unique.
    pub fn from_path(path: &Path, content_root: &Path) -> Self {
        let relative = path.strip_prefix(content_root).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                Component::Prefix(p) => Some(p.as_os_str().to_string_lossy().into_owned()),
                Component::RootDir | Component::CurDir => None,
            })
            .collect();
        Self::new(format!("/{}", parts.join("/")))
    }
}
