//! Resolution of `{#ref id #}` link markers left in rendered text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use moxydoc_render::slug;
use regex::{Captures, Regex};

/// Maps compound and member ids to the document that renders them.
#[derive(Clone, Debug, Default)]
pub struct ReferenceIndex {
    targets: HashMap<String, PathBuf>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `id` is rendered in `document`. The first document wins.
    pub fn insert(&mut self, id: impl Into<String>, document: &Path) {
        self.targets
            .entry(id.into())
            .or_insert_with(|| document.to_path_buf());
    }

    pub fn document_of(&self, id: &str) -> Option<&Path> {
        self.targets.get(id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// How a link to another document is spelled.
#[derive(Clone, Debug)]
pub struct LinkStyle<'a> {
    /// Separator replaced in anchor slugs, matching the `anchor` helper.
    pub separator: &'a str,
    /// Link by file name only instead of by path.
    pub relative_paths: bool,
    /// Paths below this directory are written relative to it.
    pub base_dir: &'a Path,
}

/// Replace every reference marker in `text` rendered into `document`.
///
/// Targets in the same document become `#anchor`; targets elsewhere become
/// `path#anchor`; unknown targets fall back to `#anchor`.
pub fn resolve_references(
    text: &str,
    document: &Path,
    index: &ReferenceIndex,
    style: &LinkStyle<'_>,
) -> String {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker = MARKER.get_or_init(|| {
        Regex::new(r"\{#ref\s+([^\s#}]+)\s*#\}").expect("reference marker pattern is valid")
    });

    marker
        .replace_all(text, |caps: &Captures<'_>| {
            let id = &caps[1];
            let fragment = slug(id, style.separator);
            match index.document_of(id) {
                Some(target) if target == document => format!("#{fragment}"),
                Some(target) => format!("{}#{fragment}", link_path(target, style)),
                None => {
                    log::debug!("unresolved reference to {id} in {}", document.display());
                    format!("#{fragment}")
                }
            }
        })
        .into_owned()
}

fn link_path(target: &Path, style: &LinkStyle<'_>) -> String {
    if style.relative_paths {
        if let Some(name) = target.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    target
        .strip_prefix(style.base_dir)
        .unwrap_or(target)
        .to_string_lossy()
        .into_owned()
}
