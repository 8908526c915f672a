use std::fmt;
use std::fs;

use moxydoc_core::{MoxyDoc, RunError};
use moxydoc_model::{CompoundTree, TreeSource};
use moxydoc_ops::{DocumentStatus, ExitCode, GenerateOptions, OperationError};
use moxydoc_render::RenderError;
use moxydoc_test_support::{sample_tree, test_config};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Debug)]
struct Unreadable;

impl fmt::Display for Unreadable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("source is unreadable")
    }
}

impl std::error::Error for Unreadable {}

struct BrokenSource;

impl TreeSource for BrokenSource {
    type Error = Unreadable;

    fn load(&self) -> Result<CompoundTree, Unreadable> {
        Err(Unreadable)
    }
}

#[test]
fn runs_with_bundled_templates() {
    let temp = TempDir::new().expect("tempdir");
    let engine = MoxyDoc::bootstrap(test_config(temp.path())).unwrap();
    assert!(engine.operations().registry().contains("class"));

    let report = engine
        .run(&sample_tree(), GenerateOptions::default())
        .unwrap();
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].status, DocumentStatus::Written);

    let written = fs::read_to_string(temp.path().join("api.md")).unwrap();
    assert!(written.starts_with("# Summary\n"), "{written}");
    assert!(
        written.contains("[`geo::Circle::Arc`](#classgeo_1_1Circle_1_1Arc)"),
        "{written}"
    );
    assert!(!written.contains("{#ref"));
    assert!(!written.contains("\n\n\n"));
}

#[test]
fn template_directory_replaces_bundled_templates() {
    let temp = TempDir::new().expect("tempdir");
    let templates = temp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("index.md"), "index of {{name}}\n").unwrap();

    let mut config = test_config(temp.path());
    config.render.templates = Some(templates);

    let engine = MoxyDoc::bootstrap(config).unwrap();
    assert!(engine.operations().registry().contains("index"));
    assert!(!engine.operations().registry().contains("class"));

    let err = engine
        .run(&sample_tree(), GenerateOptions::default())
        .unwrap_err();
    assert!(
        matches!(
            &err,
            RunError::Operation(OperationError::Render(RenderError::TemplateNotFound { name }))
                if name == "namespace"
        ),
        "{err}"
    );
    assert!(!temp.path().join("api.md").exists());
}

#[test]
fn unknown_language_without_templates_fails_to_bootstrap() {
    let temp = TempDir::new().expect("tempdir");
    let mut config = test_config(temp.path());
    config.render.language = "cobol".into();

    let err = MoxyDoc::bootstrap(config).err().expect("bootstrap fails");
    assert!(matches!(err, RenderError::NoBundledTemplates(ref lang) if lang == "cobol"));
}

#[test]
fn ingest_errors_pass_through_unchanged() {
    let temp = TempDir::new().expect("tempdir");
    let engine = MoxyDoc::bootstrap(test_config(temp.path())).unwrap();

    let err = engine
        .run(&BrokenSource, GenerateOptions::default())
        .unwrap_err();
    assert!(matches!(err, RunError::Ingest(Unreadable)));
    assert_eq!(err.exit_code(), ExitCode::Failure);
    assert_eq!(
        err.to_string(),
        "failed to load the compound tree: source is unreadable"
    );
}
