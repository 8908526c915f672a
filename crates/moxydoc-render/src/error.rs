use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while loading templates or rendering compounds.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read templates from {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to compile template '{name}'{}: {source}", location(.path))]
    Compile {
        name: String,
        path: Option<PathBuf>,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
    #[error("template \"{name}\" not found in the templates directory")]
    TemplateNotFound { name: String },
    #[error("failed to render {kind} {fullname}: {source}")]
    Render {
        kind: String,
        fullname: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },
    #[error("no bundled templates for language '{0}'")]
    NoBundledTemplates(String),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" ({})", path.display()))
        .unwrap_or_default()
}
