use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::RenderError;
use crate::helpers::{register_helpers, RenderSettings};

const TEMPLATE_EXTENSION: &str = "md";

/// Templates shipped with the crate, keyed by language.
const BUNDLED: &[(&str, &[(&str, &str)])] = &[(
    "cpp",
    &[
        ("index", include_str!("../templates/cpp/index.md")),
        ("page", include_str!("../templates/cpp/page.md")),
        ("namespace", include_str!("../templates/cpp/namespace.md")),
        ("class", include_str!("../templates/cpp/class.md")),
    ],
)];

/// Named templates compiled in strict mode with escaping disabled, plus the
/// helpers bound to one set of [`RenderSettings`].
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
    settings: RenderSettings,
}

impl TemplateRegistry {
    pub fn new(settings: RenderSettings) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut handlebars, &settings);
        TemplateRegistry {
            handlebars,
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Rebind the helpers to new settings. Registered templates are kept.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        register_helpers(&mut self.handlebars, &settings);
        self.settings = settings;
    }

    /// Compile `source` under `name`, replacing any template of that name.
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.compile(name, source, None)
    }

    /// Register every `*.md` file directly inside `directory` under its file
    /// stem. Returns the number of templates loaded.
    pub fn load_dir(&mut self, directory: &Path) -> Result<usize, RenderError> {
        let io_error = |source| RenderError::Io {
            path: directory.to_path_buf(),
            source,
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(directory).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            let is_template = path
                .extension()
                .is_some_and(|extension| extension == TEMPLATE_EXTENSION);
            if is_template && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        for path in &files {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                log::warn!("skipping template with non UTF-8 name: {}", path.display());
                continue;
            };
            let source = fs::read_to_string(path).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            self.compile(name, &source, Some(path.clone()))?;
            log::debug!("loaded template '{name}' from {}", path.display());
        }
        Ok(files.len())
    }

    /// Register the templates bundled for `language`.
    pub fn load_bundled(&mut self, language: &str) -> Result<usize, RenderError> {
        let (_, templates) = BUNDLED
            .iter()
            .find(|(candidate, _)| *candidate == language)
            .ok_or_else(|| RenderError::NoBundledTemplates(language.to_string()))?;
        for (name, source) in templates.iter() {
            self.compile(name, source, None)?;
        }
        Ok(templates.len())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Render template `name` against `data`. `kind` and `fullname` label errors.
    pub(crate) fn render_template<T: Serialize>(
        &self,
        name: &str,
        data: &T,
        kind: &str,
        fullname: &str,
    ) -> Result<String, RenderError> {
        if !self.contains(name) {
            return Err(RenderError::TemplateNotFound {
                name: name.to_string(),
            });
        }
        self.handlebars
            .render(name, data)
            .map_err(|source| RenderError::Render {
                kind: kind.to_string(),
                fullname: fullname.to_string(),
                source: Box::new(source),
            })
    }

    fn compile(
        &mut self,
        name: &str,
        source: &str,
        path: Option<PathBuf>,
    ) -> Result<(), RenderError> {
        self.handlebars
            .register_template_string(name, source)
            .map_err(|source| RenderError::Compile {
                name: name.to_string(),
                path,
                source: Box::new(source),
            })
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        TemplateRegistry::new(RenderSettings::default())
    }
}
