use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use moxydoc_config::{
    Config, ConfigError, ConfigOverrides, ConfigSourceKind, LoadOptions, OutputMode,
    DEFAULT_COMPOUND_KINDS, DEFAULT_MEMBER_KINDS,
};
use moxydoc_model::Access;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn validation_message(err: ConfigError) -> String {
    match err {
        ConfigError::Validation(errors) => errors.to_string(),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.input.directory, None);
    assert_eq!(config.output.path, working_dir.join("api.md"));
    assert_eq!(config.output.pages_path, working_dir.join("page-%s.md"));
    assert_eq!(config.output.mode(), OutputMode::Single);
    assert!(!config.output.pages);
    assert!(!config.output.noindex);
    assert!(!config.output.relative_paths);

    assert_eq!(config.render.templates, None);
    assert_eq!(config.render.language, "cpp");
    assert_eq!(config.render.separator, "::");
    assert!(config.render.anchors);
    assert!(!config.render.html_anchors);
    assert!(!config.render.show_access_modifiers);

    assert_eq!(config.filters.members, DEFAULT_MEMBER_KINDS.to_vec());
    assert_eq!(config.filters.compounds, DEFAULT_COMPOUND_KINDS.to_vec());
    assert_eq!(config.filters.access_level, Access::Private);
    assert!(!config.filters.skip_empty_namespaces);

    let kinds: Vec<_> = config.sources.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(
        kinds,
        vec![ConfigSourceKind::Default, ConfigSourceKind::CommandLine]
    );
}

#[test]
fn applies_precedence_and_merges_fields() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".moxydoc.toml"),
        r#"
        [input]
        directory = "xml"

        [output]
        path = "root.md"

        [render]
        separator = "."

        [filters]
        access_level = "protected"
        compounds = ["class", "namespace"]
        "#,
    );

    let workspace = git_root.join("workspace");
    fs::create_dir(&workspace).expect("create workspace");

    write_file(
        workspace.join(".moxydoc.toml"),
        r#"
        [output]
        path = "local.md"

        [render]
        html_anchors = true
        "#,
    );

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [render]
        anchors = false
        language = "cpp"
        "#,
    );

    let overrides = ConfigOverrides {
        separator: Some("/".to_string()),
        ..ConfigOverrides::default()
    };

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&workspace)
            .with_override_path(&override_path)
            .with_overrides(overrides),
    )
    .expect("load config with precedence");

    assert_eq!(config.input.directory, Some(git_root.join("xml")));
    assert_eq!(config.output.path, workspace.join("local.md"));
    assert_eq!(config.output.pages_path, workspace.join("page-%s.md"));
    assert_eq!(config.render.separator, "/");
    assert!(!config.render.anchors);
    assert!(config.render.html_anchors);
    assert_eq!(config.filters.access_level, Access::Protected);
    assert_eq!(
        config.filters.compounds,
        vec!["class".to_string(), "namespace".to_string()]
    );

    let kinds: Vec<_> = config.sources.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override,
            ConfigSourceKind::CommandLine,
        ]
    );
}

#[test]
fn command_line_paths_resolve_against_working_dir() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let overrides = ConfigOverrides {
        directory: Some(PathBuf::from("build/xml")),
        output: Some(PathBuf::from("docs/api.md")),
        ..ConfigOverrides::default()
    };
    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_overrides(overrides),
    )
    .expect("load config");

    assert_eq!(config.input.directory, Some(working_dir.join("build/xml")));
    assert_eq!(config.output.path, working_dir.join("docs/api.md"));
    assert_eq!(config.output.pages_path, working_dir.join("docs/page-%s.md"));
}

#[test]
fn grouped_output_defaults_to_placeholder_path() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let overrides = ConfigOverrides {
        groups: Some(true),
        ..ConfigOverrides::default()
    };
    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_overrides(overrides),
    )
    .expect("load config");

    assert_eq!(config.output.mode(), OutputMode::Groups);
    assert_eq!(config.output.path, working_dir.join("api_%s.md"));
    assert_eq!(
        config.output.path_for("core"),
        working_dir.join("api_core.md")
    );
}

#[test]
fn multi_document_output_requires_placeholder() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".moxydoc.toml"),
        r#"
        [output]
        path = "api.md"
        classes = true
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");
    let message = validation_message(err);
    assert!(
        message.contains("output.path: must contain exactly one '%s'"),
        "unexpected error output: {message}"
    );
    assert!(message.contains("local config at"), "{message}");
}

#[test]
fn pages_path_requires_placeholder_when_pages_enabled() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".moxydoc.toml"),
        r#"
        [output]
        pages = true
        pages_path = "pages/all.md"
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");
    let message = validation_message(err);
    assert!(
        message.contains("output.pages_path: must contain exactly one '%s'"),
        "unexpected error output: {message}"
    );
}

#[test]
fn unknown_access_level_surfaces_validation_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".moxydoc.toml"),
        r#"
        [filters]
        access_level = "world"
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");
    let message = validation_message(err);
    assert!(
        message.contains("filters.access_level: unknown access level 'world'"),
        "unexpected error output: {message}"
    );
}

#[test]
fn validation_errors_are_aggregated() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(
        working_dir.join(".moxydoc.toml"),
        r#"
        [render]
        separator = ""

        [filters]
        access_level = "everyone"
        members = ["public-func", " "]
        "#,
    );

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected validation failure");
    match err {
        ConfigError::Validation(errors) => {
            let contexts: Vec<_> = errors
                .iter()
                .filter_map(|error| error.context.clone())
                .collect();
            assert_eq!(
                contexts,
                vec![
                    "render.separator".to_string(),
                    "filters.access_level".to_string(),
                    "filters.members".to_string(),
                ]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_override_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(&working_dir)
            .with_override_path("missing.toml"),
    )
    .expect_err("expected missing override");

    match err {
        ConfigError::OverrideNotFound { path } => {
            assert_eq!(path, working_dir.join("missing.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());
    write_file(working_dir.join(".moxydoc.toml"), "[output\npath = 3");

    let err = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect_err("expected parse failure");
    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[test]
fn built_in_output_paths_anchor_at_working_dir_under_file_layers() {
    let temp = TempDir::new().expect("tempdir");
    let root = canonical(temp.path());
    fs::create_dir_all(root.join(".git")).expect("create .git");
    write_file(root.join(".moxydoc.toml"), "[output]\nclasses = true\n");
    let working_dir = root.join("tools/docs");
    fs::create_dir_all(&working_dir).expect("create working dir");

    let config = Config::load(LoadOptions::default().with_working_dir(&working_dir))
        .expect("load config");

    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.output.mode(), OutputMode::Classes);
    assert_eq!(config.output.path, working_dir.join("api_%s.md"));
    assert_eq!(config.output.pages_path, working_dir.join("page-%s.md"));
    assert!(config.output.path.is_absolute());
}

#[test]
fn defaults_anchor_at_the_given_base_dir() {
    let temp = TempDir::new().expect("tempdir");
    let base = canonical(temp.path());

    let config = Config::defaults(&base);
    assert_eq!(config.output.path, base.join("api.md"));
    assert_eq!(config.output.pages_path, base.join("page-%s.md"));
    assert!(config.output.path.starts_with(&config.sources.working_directory));
}
