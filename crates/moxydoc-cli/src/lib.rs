use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use moxydoc_config::{Config, ConfigError, ConfigOverrides, LoadOptions};
use moxydoc_core::{MoxyDoc, RunError};
use moxydoc_ops::{DocumentStatus, ExitCode, GenerateOptions, GenerateReport, WriteMode};
use moxydoc_render::RenderError;
use moxydoc_xml::{DoxygenXmlSource, IngestError};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;
    let mode = if cli.check {
        WriteMode::Check
    } else {
        WriteMode::Write
    };

    let mut options = LoadOptions::default().with_overrides(cli.overrides());
    if let Some(path) = cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;

    let Some(directory) = config.input.directory.clone() else {
        eprintln!("moxydoc error: no input directory; pass DIR or set input.directory");
        return Ok(ExitCode::Config.code());
    };

    let engine = MoxyDoc::bootstrap(config)?;
    let source = DoxygenXmlSource::new(&directory);
    let report = engine
        .run(&source, GenerateOptions { mode })
        .with_context(|| format!("failed to document {}", directory.display()))?;

    print_report(&report, quiet)?;
    Ok(report.exit_code().code())
}

/// Exit code for an error returned by [`run`].
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    let code = if err.downcast_ref::<ConfigError>().is_some() {
        ExitCode::Config
    } else if let Some(err) = err.downcast_ref::<RunError<IngestError>>() {
        match err {
            RunError::Ingest(IngestError::Io { .. } | IngestError::MissingIndex(_)) => ExitCode::Io,
            other => other.exit_code(),
        }
    } else if let Some(err) = err.downcast_ref::<RenderError>() {
        match err {
            RenderError::Io { .. } => ExitCode::Io,
            _ => ExitCode::Failure,
        }
    } else {
        ExitCode::Failure
    };
    code.code()
}

fn print_report(report: &GenerateReport, quiet: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for outcome in &report.documents {
        let path = outcome.path.display();
        match &outcome.status {
            DocumentStatus::Written if !quiet => writeln!(handle, "wrote {path}")?,
            DocumentStatus::Unchanged if !quiet && report.mode == WriteMode::Check => {
                writeln!(handle, "up to date {path}")?
            }
            DocumentStatus::Missing => writeln!(handle, "missing {path}")?,
            DocumentStatus::Changed { diff } => {
                write!(handle, "{diff}")?;
                if !diff.ends_with('\n') {
                    writeln!(handle)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    builder.parse_env("RUST_LOG");
    // A logger may already be installed when running inside tests.
    let _ = builder.try_init();
}

/// Convert Doxygen XML output into Markdown documents.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding Doxygen's XML output (index.xml)
    #[arg(value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output path; must contain `%s` when splitting by groups or classes
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output path for pages; must contain `%s`
    #[arg(long = "pages-output", value_name = "PATH")]
    pages_output: Option<PathBuf>,

    /// Write one document per group
    #[arg(short, long)]
    groups: bool,

    /// Write one document per top-level class
    #[arg(short, long)]
    classes: bool,

    /// Write one document per page
    #[arg(short, long)]
    pages: bool,

    /// Leave the index out of the output
    #[arg(short, long)]
    noindex: bool,

    /// Link other documents by file name only
    #[arg(long = "relative-paths")]
    relative_paths: bool,

    /// Emit anchors for headings (default)
    #[arg(short, long, overrides_with = "no_anchors")]
    anchors: bool,

    /// Do not emit anchors
    #[arg(long = "no-anchors")]
    no_anchors: bool,

    /// Emit anchors as HTML `<a>` tags
    #[arg(short = 'H', long = "html-anchors")]
    html_anchors: bool,

    /// Language used for code blocks and bundled templates
    #[arg(short, long, value_name = "LANG")]
    language: Option<String>,

    /// Directory of custom templates (`*.md`)
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Scope separator replaced in anchors
    #[arg(short, long, value_name = "SEP")]
    separator: Option<String>,

    /// Keep access modifiers in member prototypes
    #[arg(long = "show-access-modifiers")]
    show_access_modifiers: bool,

    /// Minimum member access to document (public, protected, private)
    #[arg(long = "access-level", value_name = "LEVEL")]
    access_level: Option<String>,

    /// Report out-of-date documents without writing them
    #[arg(long)]
    check: bool,

    /// Additional configuration file, applied over the discovered ones
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let flag = |set: bool| set.then_some(true);
        let anchors = if self.no_anchors {
            Some(false)
        } else {
            flag(self.anchors)
        };

        ConfigOverrides {
            directory: self.directory.clone(),
            output: self.output.clone(),
            pages_output: self.pages_output.clone(),
            groups: flag(self.groups),
            classes: flag(self.classes),
            pages: flag(self.pages),
            noindex: flag(self.noindex),
            relative_paths: flag(self.relative_paths),
            templates: self.templates.clone(),
            language: self.language.clone(),
            anchors,
            html_anchors: flag(self.html_anchors),
            separator: self.separator.clone(),
            show_access_modifiers: flag(self.show_access_modifiers),
            access_level: self.access_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_leave_configuration_alone() {
        let cli = Cli::parse_from(["moxydoc", "xml"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.directory, Some(PathBuf::from("xml")));
        assert_eq!(overrides.groups, None);
        assert_eq!(overrides.anchors, None);
        assert_eq!(overrides.access_level, None);
    }

    #[test]
    fn no_anchors_wins_over_anchors() {
        let cli = Cli::parse_from(["moxydoc", "-a", "--no-anchors", "xml"]);
        assert_eq!(cli.overrides().anchors, Some(false));

        let cli = Cli::parse_from(["moxydoc", "-c", "-a", "-s", ".", "xml"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.anchors, Some(true));
        assert_eq!(overrides.classes, Some(true));
        assert_eq!(overrides.separator.as_deref(), Some("."));
    }

    #[test]
    fn config_errors_map_to_their_exit_code() {
        let err = anyhow::Error::new(ConfigError::OverrideNotFound {
            path: PathBuf::from("missing.toml"),
        });
        assert_eq!(exit_code_for(&err), 2);

        let err = anyhow::Error::new(RunError::<IngestError>::Ingest(IngestError::MissingIndex(
            PathBuf::from("xml"),
        )))
        .context("failed to document xml");
        assert_eq!(exit_code_for(&err), 4);
    }
}
