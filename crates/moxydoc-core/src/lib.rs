//! Core orchestration layer for moxydoc.
//!
//! Wires a loaded [`Config`] to a [`TemplateRegistry`] and the operation
//! bundle, then runs the pipeline against any [`TreeSource`].

use moxydoc_config::Config;
use moxydoc_model::TreeSource;
use moxydoc_ops::{ExitCode, GenerateOptions, GenerateReport, OperationError, Operations};
use moxydoc_render::{RenderError, RenderSettings, TemplateRegistry};
use thiserror::Error;

/// Failure of one [`MoxyDoc::run`]: either the source could not produce a
/// tree, or the pipeline failed on it.
#[derive(Debug, Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static,
{
    #[error("failed to load the compound tree: {0}")]
    Ingest(#[source] E),
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl<E> RunError<E>
where
    E: std::error::Error + 'static,
{
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Ingest(_) => ExitCode::Failure,
            RunError::Operation(err) => err.exit_code(),
        }
    }
}

/// Entry point for higher-level consumers such as the CLI.
pub struct MoxyDoc {
    ops: Operations,
}

impl MoxyDoc {
    /// Build the template registry described by `config` and bind it to the
    /// operation bundle. A configured template directory replaces the
    /// bundled templates for the configured language.
    pub fn bootstrap(config: Config) -> Result<Self, RenderError> {
        let mut registry = TemplateRegistry::new(RenderSettings::from_config(&config.render));
        match &config.render.templates {
            Some(directory) => {
                let count = registry.load_dir(directory)?;
                log::debug!("loaded {count} templates from {}", directory.display());
            }
            None => {
                let count = registry.load_bundled(&config.render.language)?;
                log::debug!(
                    "loaded {count} bundled templates for '{}'",
                    config.render.language
                );
            }
        }

        Ok(Self {
            ops: Operations::new(config, registry),
        })
    }

    /// Access the operation bundle.
    pub fn operations(&self) -> &Operations {
        &self.ops
    }

    pub fn config(&self) -> &Config {
        self.ops.config()
    }

    /// Load the tree from `source`, then render and write (or check) every
    /// document.
    pub fn run<S: TreeSource>(
        &self,
        source: &S,
        options: GenerateOptions,
    ) -> Result<GenerateReport, RunError<S::Error>> {
        let tree = source.load().map_err(RunError::Ingest)?;
        log::debug!("loaded {} compounds", tree.len());
        Ok(self.ops.generate(&tree, options)?)
    }
}
