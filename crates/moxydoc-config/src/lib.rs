//! Configuration primitives and loader for moxydoc.
//!
//! Settings are resolved from a precedence stack:
//! command-line overrides → `--config` file → working directory → git root →
//! built-in defaults. Each layer is parsed into a partial structure that
//! remembers where every value came from, then the merged result is validated
//! and normalised into typed settings.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use moxydoc_model::{Access, FilterRules};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".moxydoc.toml";

/// Substitution placeholder for multi-document output paths.
pub const PLACEHOLDER: &str = "%s";

/// Member section kinds documented when no filter is configured.
pub const DEFAULT_MEMBER_KINDS: &[&str] = &[
    "define",
    "enum",
    "func",
    "property",
    "public-attrib",
    "public-func",
    "protected-attrib",
    "protected-func",
    "signal",
    "public-slot",
    "protected-slot",
    "public-type",
    "private-attrib",
    "private-func",
    "private-slot",
    "public-static-func",
    "private-static-func",
];

/// Compound kinds documented when no filter is configured.
pub const DEFAULT_COMPOUND_KINDS: &[&str] = &[
    "namespace",
    "class",
    "struct",
    "union",
    "typedef",
    "interface",
];

const DEFAULT_OUTPUT: &str = "api.md";
const DEFAULT_MULTI_OUTPUT: &str = "api_%s.md";
const DEFAULT_PAGES_OUTPUT: &str = "page-%s.md";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub render: RenderConfig,
    pub filters: FilterSettings,
    pub sources: ConfigSources,
}

/// Where the Doxygen XML is read from.
#[derive(Clone, Debug)]
pub struct InputSettings {
    pub directory: Option<PathBuf>,
}

/// Output partitioning and naming.
#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub pages_path: PathBuf,
    pub groups: bool,
    pub classes: bool,
    pub pages: bool,
    pub noindex: bool,
    pub relative_paths: bool,
}

/// Primary partitioning mode. Pages output is additive and tracked separately.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Single,
    Groups,
    Classes,
}

impl OutputSettings {
    /// Groups take precedence over classes when both are enabled.
    pub fn mode(&self) -> OutputMode {
        if self.groups {
            OutputMode::Groups
        } else if self.classes {
            OutputMode::Classes
        } else {
            OutputMode::Single
        }
    }

    /// Output path for a group or class document.
    pub fn path_for(&self, name: &str) -> PathBuf {
        fill_placeholder(&self.path, name)
    }

    /// Output path for a page document.
    pub fn page_path_for(&self, name: &str) -> PathBuf {
        fill_placeholder(&self.pages_path, name)
    }
}

/// Replace the first [`PLACEHOLDER`] in `template` with `value`.
pub fn fill_placeholder(template: &Path, value: &str) -> PathBuf {
    let raw = template.to_string_lossy();
    PathBuf::from(raw.replacen(PLACEHOLDER, value, 1))
}

/// Template lookup and helper behaviour.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Template directory; `None` selects the bundled templates for `language`.
    pub templates: Option<PathBuf>,
    pub language: String,
    pub anchors: bool,
    pub html_anchors: bool,
    pub separator: String,
    pub show_access_modifiers: bool,
}

/// Kind and access filters applied to the compound tree.
#[derive(Clone, Debug)]
pub struct FilterSettings {
    pub members: Vec<String>,
    pub compounds: Vec<String>,
    pub access_level: Access,
    pub skip_empty_namespaces: bool,
}

impl FilterSettings {
    pub fn rules(&self) -> FilterRules {
        FilterRules::new(
            self.members.iter().cloned(),
            self.compounds.iter().cloned(),
            self.access_level,
        )
        .with_skip_empty_namespaces(self.skip_empty_namespaces)
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override/command line).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn command_line(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::CommandLine,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
    CommandLine,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
            ConfigSourceKind::CommandLine => "command line",
        };
        f.write_str(label)
    }
}

/// Values supplied on the command line. They form the highest-precedence layer.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub directory: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub pages_output: Option<PathBuf>,
    pub groups: Option<bool>,
    pub classes: Option<bool>,
    pub pages: Option<bool>,
    pub noindex: Option<bool>,
    pub relative_paths: Option<bool>,
    pub templates: Option<PathBuf>,
    pub language: Option<String>,
    pub anchors: Option<bool>,
    pub html_anchors: Option<bool>,
    pub separator: Option<String>,
    pub show_access_modifiers: Option<bool>,
    pub access_level: Option<String>,
}

impl ConfigOverrides {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let raw = RawConfig {
            input: Some(RawInput {
                directory: self.directory,
            }),
            output: Some(RawOutput {
                path: self.output,
                pages_path: self.pages_output,
                groups: self.groups,
                classes: self.classes,
                pages: self.pages,
                noindex: self.noindex,
                relative_paths: self.relative_paths,
            }),
            render: Some(RawRender {
                templates: self.templates,
                language: self.language,
                anchors: self.anchors,
                html_anchors: self.html_anchors,
                separator: self.separator,
                show_access_modifiers: self.show_access_modifiers,
            }),
            filters: Some(RawFilters {
                access_level: self.access_level,
                ..RawFilters::default()
            }),
        };
        raw.into_partial(source)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source.clone()];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let command_line = ConfigSource::command_line(working_dir.clone());
        merged.merge(options.overrides.into_partial(command_line.clone()));
        source_layers.push(command_line);

        let resolved = merged
            .finalize(&default_source)
            .map_err(ConfigError::Validation)?;
        Ok(Config {
            input: resolved.input,
            output: resolved.output,
            render: resolved.render,
            filters: resolved.filters,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Built-in defaults anchored at `base_dir`, without reading any file.
    pub fn defaults(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let source = ConfigSource::default(base_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(source.clone()));
        let resolved = merged.finalize(&source).unwrap_or_else(|err| {
            panic!("built-in moxydoc defaults are invalid: {err}");
        });
        Config {
            input: resolved.input,
            output: resolved.output,
            render: resolved.render,
            filters: resolved.filters,
            sources: ConfigSources {
                working_directory: base_dir,
                layers: vec![source],
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::defaults(PathBuf::from("."))
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let located = |value| Some(Located::new(value, source.clone()));
    let strings = |values: &[&str]| -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    };

    PartialConfig {
        input: InputPartial::default(),
        output: OutputPartial {
            groups: located(false),
            classes: located(false),
            pages: located(false),
            noindex: located(false),
            relative_paths: located(false),
            ..OutputPartial::default()
        },
        render: RenderPartial {
            language: Some(Located::new("cpp".to_string(), source.clone())),
            anchors: located(true),
            html_anchors: located(false),
            separator: Some(Located::new("::".to_string(), source.clone())),
            show_access_modifiers: located(false),
            ..RenderPartial::default()
        },
        filters: FiltersPartial {
            members: Some(Located::new(strings(DEFAULT_MEMBER_KINDS), source.clone())),
            compounds: Some(Located::new(strings(DEFAULT_COMPOUND_KINDS), source.clone())),
            access_level: Some(Located::new("private".to_string(), source.clone())),
            skip_empty_namespaces: located(false),
        },
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

fn overlay<T>(slot: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *slot = other;
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    input: InputPartial,
    output: OutputPartial,
    render: RenderPartial,
    filters: FiltersPartial,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        self.input.merge(other.input);
        self.output.merge(other.output);
        self.render.merge(other.render);
        self.filters.merge(other.filters);
    }

    /// Resolves the merged layers. Built-in values missing from every layer
    /// are anchored at `defaults`, the working-directory source.
    fn finalize(self, defaults: &ConfigSource) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = || defaults.clone();

        let directory = self.input.directory.as_ref().map(resolve_path);

        let flag = |value: Option<Located<bool>>| value.map(|located| located.value).unwrap_or(false);
        let groups = flag(self.output.groups);
        let classes = flag(self.output.classes);
        let pages = flag(self.output.pages);
        let noindex = flag(self.output.noindex);
        let relative_paths = flag(self.output.relative_paths);

        let output_loc = self.output.path.unwrap_or_else(|| {
            let default = if groups || classes {
                DEFAULT_MULTI_OUTPUT
            } else {
                DEFAULT_OUTPUT
            };
            Located::new(PathBuf::from(default), fallback())
        });
        let output_path = resolve_path(&output_loc);

        if groups || classes {
            check_placeholder(&output_loc, "output.path", "`groups` or `classes`", &mut errors);
        }

        let pages_path = match &self.output.pages_path {
            Some(located) => {
                if pages {
                    check_placeholder(located, "output.pages_path", "`pages`", &mut errors);
                }
                resolve_path(located)
            }
            None => output_path
                .parent()
                .map(|parent| parent.join(DEFAULT_PAGES_OUTPUT))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PAGES_OUTPUT)),
        };

        let templates = self.render.templates.as_ref().map(resolve_path);

        let language = self
            .render
            .language
            .unwrap_or_else(|| Located::new("cpp".to_string(), fallback()));
        if language.value.trim().is_empty() {
            errors.push(
                ConfigValidationError::new(Some(language.source.clone()), "cannot be empty".into())
                    .with_context("render.language"),
            );
        }

        let separator = self
            .render
            .separator
            .unwrap_or_else(|| Located::new("::".to_string(), fallback()));
        if separator.value.is_empty() {
            errors.push(
                ConfigValidationError::new(Some(separator.source.clone()), "cannot be empty".into())
                    .with_context("render.separator"),
            );
        }

        let access_loc = self
            .filters
            .access_level
            .unwrap_or_else(|| Located::new("private".to_string(), fallback()));
        let access_level = match access_loc.value.parse::<Access>() {
            Ok(access) => access,
            Err(err) => {
                errors.push(
                    ConfigValidationError::new(Some(access_loc.source.clone()), err.to_string())
                        .with_context("filters.access_level"),
                );
                Access::Private
            }
        };

        let members = parse_kinds(self.filters.members, "filters.members", &mut errors);
        let compounds = parse_kinds(self.filters.compounds, "filters.compounds", &mut errors);

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            input: InputSettings { directory },
            output: OutputSettings {
                path: output_path,
                pages_path,
                groups,
                classes,
                pages,
                noindex,
                relative_paths,
            },
            render: RenderConfig {
                templates,
                language: language.value,
                anchors: self
                    .render
                    .anchors
                    .map(|located| located.value)
                    .unwrap_or(true),
                html_anchors: flag(self.render.html_anchors),
                separator: separator.value,
                show_access_modifiers: flag(self.render.show_access_modifiers),
            },
            filters: FilterSettings {
                members,
                compounds,
                access_level,
                skip_empty_namespaces: flag(self.filters.skip_empty_namespaces),
            },
        })
    }
}

#[derive(Clone, Debug, Default)]
struct InputPartial {
    directory: Option<Located<PathBuf>>,
}

impl InputPartial {
    fn merge(&mut self, other: InputPartial) {
        overlay(&mut self.directory, other.directory);
    }
}

#[derive(Clone, Debug, Default)]
struct OutputPartial {
    path: Option<Located<PathBuf>>,
    pages_path: Option<Located<PathBuf>>,
    groups: Option<Located<bool>>,
    classes: Option<Located<bool>>,
    pages: Option<Located<bool>>,
    noindex: Option<Located<bool>>,
    relative_paths: Option<Located<bool>>,
}

impl OutputPartial {
    fn merge(&mut self, other: OutputPartial) {
        overlay(&mut self.path, other.path);
        overlay(&mut self.pages_path, other.pages_path);
        overlay(&mut self.groups, other.groups);
        overlay(&mut self.classes, other.classes);
        overlay(&mut self.pages, other.pages);
        overlay(&mut self.noindex, other.noindex);
        overlay(&mut self.relative_paths, other.relative_paths);
    }
}

#[derive(Clone, Debug, Default)]
struct RenderPartial {
    templates: Option<Located<PathBuf>>,
    language: Option<Located<String>>,
    anchors: Option<Located<bool>>,
    html_anchors: Option<Located<bool>>,
    separator: Option<Located<String>>,
    show_access_modifiers: Option<Located<bool>>,
}

impl RenderPartial {
    fn merge(&mut self, other: RenderPartial) {
        overlay(&mut self.templates, other.templates);
        overlay(&mut self.language, other.language);
        overlay(&mut self.anchors, other.anchors);
        overlay(&mut self.html_anchors, other.html_anchors);
        overlay(&mut self.separator, other.separator);
        overlay(&mut self.show_access_modifiers, other.show_access_modifiers);
    }
}

#[derive(Clone, Debug, Default)]
struct FiltersPartial {
    members: Option<Located<Vec<String>>>,
    compounds: Option<Located<Vec<String>>>,
    access_level: Option<Located<String>>,
    skip_empty_namespaces: Option<Located<bool>>,
}

impl FiltersPartial {
    fn merge(&mut self, other: FiltersPartial) {
        overlay(&mut self.members, other.members);
        overlay(&mut self.compounds, other.compounds);
        overlay(&mut self.access_level, other.access_level);
        overlay(&mut self.skip_empty_namespaces, other.skip_empty_namespaces);
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn locate<T>(value: Option<T>, source: &ConfigSource) -> Option<Located<T>> {
    value.map(|value| Located::new(value, source.clone()))
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

fn check_placeholder(
    located: &Located<PathBuf>,
    context: &str,
    reason: &str,
    errors: &mut Vec<ConfigValidationError>,
) {
    let count = located.value.to_string_lossy().matches(PLACEHOLDER).count();
    if count != 1 {
        errors.push(
            ConfigValidationError::new(
                Some(located.source.clone()),
                format!(
                    "must contain exactly one '{PLACEHOLDER}' for name substitution when {reason} output is enabled (found {count} in '{}')",
                    located.value.display()
                ),
            )
            .with_context(context),
        );
    }
}

fn parse_kinds(
    located: Option<Located<Vec<String>>>,
    context: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Vec<String> {
    let Some(located) = located else {
        return Vec::new();
    };

    let mut kinds = Vec::with_capacity(located.value.len());
    for kind in located.value {
        let trimmed = kind.trim();
        if trimmed.is_empty() {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "kind names cannot be empty".into(),
                )
                .with_context(context),
            );
            continue;
        }
        if !kinds.iter().any(|existing| existing == trimmed) {
            kinds.push(trimmed.to_string());
        }
    }
    kinds
}

#[derive(Clone, Debug)]
struct ResolvedConfig {
    input: InputSettings,
    output: OutputSettings,
    render: RenderConfig,
    filters: FilterSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    input: Option<RawInput>,
    #[serde(default)]
    output: Option<RawOutput>,
    #[serde(default)]
    render: Option<RawRender>,
    #[serde(default)]
    filters: Option<RawFilters>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();

        if let Some(input) = self.input {
            partial.input.directory = locate(input.directory, &source);
        }

        if let Some(output) = self.output {
            partial.output = OutputPartial {
                path: locate(output.path, &source),
                pages_path: locate(output.pages_path, &source),
                groups: locate(output.groups, &source),
                classes: locate(output.classes, &source),
                pages: locate(output.pages, &source),
                noindex: locate(output.noindex, &source),
                relative_paths: locate(output.relative_paths, &source),
            };
        }

        if let Some(render) = self.render {
            partial.render = RenderPartial {
                templates: locate(render.templates, &source),
                language: locate(render.language, &source),
                anchors: locate(render.anchors, &source),
                html_anchors: locate(render.html_anchors, &source),
                separator: locate(render.separator, &source),
                show_access_modifiers: locate(render.show_access_modifiers, &source),
            };
        }

        if let Some(filters) = self.filters {
            partial.filters = FiltersPartial {
                members: locate(filters.members, &source),
                compounds: locate(filters.compounds, &source),
                access_level: locate(filters.access_level, &source),
                skip_empty_namespaces: locate(filters.skip_empty_namespaces, &source),
            };
        }

        partial
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawInput {
    #[serde(default)]
    directory: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    pages_path: Option<PathBuf>,
    #[serde(default)]
    groups: Option<bool>,
    #[serde(default)]
    classes: Option<bool>,
    #[serde(default)]
    pages: Option<bool>,
    #[serde(default)]
    noindex: Option<bool>,
    #[serde(default)]
    relative_paths: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRender {
    #[serde(default)]
    templates: Option<PathBuf>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    anchors: Option<bool>,
    #[serde(default)]
    html_anchors: Option<bool>,
    #[serde(default)]
    separator: Option<String>,
    #[serde(default)]
    show_access_modifiers: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFilters {
    #[serde(default)]
    members: Option<Vec<String>>,
    #[serde(default)]
    compounds: Option<Vec<String>>,
    #[serde(default)]
    access_level: Option<String>,
    #[serde(default)]
    skip_empty_namespaces: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_first_placeholder_only() {
        let path = fill_placeholder(Path::new("out/api_%s.md"), "core");
        assert_eq!(path, PathBuf::from("out/api_core.md"));
    }

    #[test]
    fn groups_take_precedence_over_classes() {
        let mut config = Config::defaults(".");
        config.output.classes = true;
        assert_eq!(config.output.mode(), OutputMode::Classes);
        config.output.groups = true;
        assert_eq!(config.output.mode(), OutputMode::Groups);
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::defaults("/work");
        assert_eq!(config.output.path, PathBuf::from("/work/api.md"));
        assert_eq!(config.output.pages_path, PathBuf::from("/work/page-%s.md"));
        assert_eq!(config.filters.access_level, Access::Private);
        assert_eq!(config.render.language, "cpp");
        assert!(config.render.anchors);
    }
}
