//! High-level operations shared by moxydoc front ends: planning documents,
//! rendering them, and writing or checking the results.

mod error;
mod refs;
mod router;

use std::path::{Path, PathBuf};

use moxydoc_config::Config;
use moxydoc_model::CompoundTree;
use moxydoc_render::{collapse_blank_lines, Renderer, TemplateRegistry};
use moxydoc_utils::{atomic_write, read_existing, unified_diff};

pub use error::{ExitCode, OperationError, OperationResult};
pub use refs::{resolve_references, LinkStyle, ReferenceIndex};
pub use router::{class_file_name, plan_documents, DocumentPlan};

/// Whether [`Operations::generate`] writes files or only compares them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WriteMode {
    #[default]
    Write,
    Check,
}

#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    pub mode: WriteMode,
}

/// A fully rendered output document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedDocument {
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentStatus {
    /// New or updated contents were written.
    Written,
    Unchanged,
    /// Check mode: the file on disk differs.
    Changed { diff: String },
    /// Check mode: the file does not exist yet.
    Missing,
}

#[derive(Clone, Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub status: DocumentStatus,
}

#[derive(Clone, Debug)]
pub struct GenerateReport {
    pub mode: WriteMode,
    pub documents: Vec<DocumentOutcome>,
}

impl GenerateReport {
    /// Documents that check mode found stale or missing.
    pub fn stale(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.documents.iter().filter(|outcome| {
            matches!(
                outcome.status,
                DocumentStatus::Changed { .. } | DocumentStatus::Missing
            )
        })
    }

    pub fn has_differences(&self) -> bool {
        self.stale().next().is_some()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.mode == WriteMode::Check && self.has_differences() {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }
}

/// Operation bundle binding one configuration to one template registry.
pub struct Operations {
    config: Config,
    registry: TemplateRegistry,
}

impl Operations {
    pub fn new(config: Config, registry: TemplateRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Partition `tree` into documents according to the output settings.
    pub fn plan(&self, tree: &CompoundTree) -> OperationResult<Vec<DocumentPlan>> {
        plan_documents(tree, &self.config.output, &self.config.filters.rules())
    }

    /// Render every planned document. Nothing touches the filesystem.
    pub fn render(&self, tree: &CompoundTree) -> OperationResult<Vec<RenderedDocument>> {
        let plans = self.plan(tree)?;
        let renderer = Renderer::new(&self.registry);

        let mut index = ReferenceIndex::new();
        let mut drafts = Vec::with_capacity(plans.len());
        for plan in &plans {
            let parts = renderer.render_array(tree, &plan.view, &plan.compounds)?;
            for (id, part) in plan.compounds.iter().zip(&parts) {
                if part.is_none() {
                    continue;
                }
                index.insert(tree[*id].id.as_str(), &plan.path);
                for member in plan.view.members(tree, *id) {
                    index.insert(member.id.as_str(), &plan.path);
                }
            }
            let body: Vec<String> = parts.into_iter().flatten().collect();
            drafts.push((plan.path.clone(), body.join("\n")));
        }

        let style = LinkStyle {
            separator: &self.registry.settings().separator,
            relative_paths: self.config.output.relative_paths,
            base_dir: &self.config.sources.working_directory,
        };

        Ok(drafts
            .into_iter()
            .map(|(path, body)| {
                let resolved = resolve_references(&body, &path, &index, &style);
                let contents = collapse_blank_lines(&resolved).into_owned();
                RenderedDocument { path, contents }
            })
            .collect())
    }

    /// Render all documents, then write them (or compare them in check mode).
    pub fn generate(
        &self,
        tree: &CompoundTree,
        options: GenerateOptions,
    ) -> OperationResult<GenerateReport> {
        let documents = self.render(tree)?;

        let mut outcomes = Vec::with_capacity(documents.len());
        for document in documents {
            let status = match options.mode {
                WriteMode::Write => write_document(&document)?,
                WriteMode::Check => check_document(&document, &self.config.sources.working_directory)?,
            };
            outcomes.push(DocumentOutcome {
                path: document.path,
                status,
            });
        }

        Ok(GenerateReport {
            mode: options.mode,
            documents: outcomes,
        })
    }
}

fn write_document(document: &RenderedDocument) -> OperationResult<DocumentStatus> {
    let existing = read_existing(&document.path).map_err(|source| io_error(&document.path, source))?;
    if existing.as_deref() == Some(document.contents.as_str()) {
        log::debug!("{} is up to date", document.path.display());
        return Ok(DocumentStatus::Unchanged);
    }

    atomic_write(&document.path, &document.contents)
        .map_err(|source| io_error(&document.path, source))?;
    log::info!("wrote {}", document.path.display());
    Ok(DocumentStatus::Written)
}

fn check_document(document: &RenderedDocument, base_dir: &Path) -> OperationResult<DocumentStatus> {
    let existing = read_existing(&document.path).map_err(|source| io_error(&document.path, source))?;
    let Some(existing) = existing else {
        return Ok(DocumentStatus::Missing);
    };

    let label = document
        .path
        .strip_prefix(base_dir)
        .unwrap_or(&document.path)
        .to_string_lossy()
        .into_owned();
    Ok(match unified_diff(&existing, &document.contents, &label) {
        Some(diff) => DocumentStatus::Changed { diff },
        None => DocumentStatus::Unchanged,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> OperationError {
    OperationError::Io {
        path: path.to_path_buf(),
        source,
    }
}
