use std::path::{Path, PathBuf};
use std::rc::Rc;

use moxydoc_config::Config;
use moxydoc_model::{Compound, CompoundKind, CompoundTree};
use moxydoc_ops::{plan_documents, DocumentPlan, OperationError};
use moxydoc_test_support::{sample_tree, test_config};
use pretty_assertions::assert_eq;

fn config() -> Config {
    test_config("/work")
}

fn multi(config: &mut Config) {
    config.output.path = PathBuf::from("/work/api_%s.md");
}

fn ids(tree: &CompoundTree, plan: &DocumentPlan) -> Vec<String> {
    plan.compounds
        .iter()
        .map(|id| tree[*id].id.clone())
        .collect()
}

fn plan(tree: &CompoundTree, config: &Config) -> Result<Vec<DocumentPlan>, OperationError> {
    plan_documents(tree, &config.output, &config.filters.rules())
}

#[test]
fn single_document_starts_with_the_index() {
    let tree = sample_tree();
    let plans = plan(&tree, &config()).unwrap();

    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].path, Path::new("/work/api.md"));
    assert_eq!(plans[0].subject, tree.root());
    assert_eq!(
        ids(&tree, &plans[0]),
        vec![
            "index",
            "namespacegeo",
            "classgeo_1_1Shape",
            "classgeo_1_1Circle",
            "classgeo_1_1Circle_1_1Arc",
            "structgeo_1_1Point",
        ]
    );
}

#[test]
fn noindex_drops_the_root() {
    let tree = sample_tree();
    let mut config = config();
    config.output.noindex = true;

    let plans = plan(&tree, &config).unwrap();
    assert_eq!(ids(&tree, &plans[0])[0], "namespacegeo");
    assert!(!plans[0].compounds.contains(&tree.root()));
}

#[test]
fn one_document_per_group() {
    let tree = sample_tree();
    let mut config = config();
    multi(&mut config);
    config.output.groups = true;
    config.output.noindex = true;

    let plans = plan(&tree, &config).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].path, Path::new("/work/api_shapes.md"));
    assert_eq!(
        ids(&tree, &plans[0]),
        vec![
            "group__shapes",
            "classgeo_1_1Shape",
            "classgeo_1_1Circle",
            "classgeo_1_1Circle_1_1Arc",
        ]
    );
}

#[test]
fn groups_take_precedence_over_classes() {
    let tree = sample_tree();
    let mut config = config();
    multi(&mut config);
    config.output.groups = true;
    config.output.classes = true;

    let plans = plan(&tree, &config).unwrap();
    let subjects: Vec<_> = plans.iter().map(|plan| tree[plan.subject].id.as_str()).collect();
    assert_eq!(subjects, vec!["group__shapes"]);
}

#[test]
fn groups_mode_without_groups_fails() {
    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();
    tree.insert(root, Compound::new("ns", CompoundKind::Namespace, "ns"))
        .unwrap();

    let mut config = config();
    multi(&mut config);
    config.output.groups = true;

    assert!(matches!(plan(&tree, &config), Err(OperationError::NoGroups)));
}

#[test]
fn one_document_per_class_and_filtered_descendant() {
    let tree = sample_tree();
    let mut config = config();
    multi(&mut config);
    config.output.classes = true;

    let plans = plan(&tree, &config).unwrap();
    let paths: Vec<_> = plans.iter().map(|plan| plan.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("/work/api_geo--Shape.md"),
            PathBuf::from("/work/api_geo--Circle.md"),
            PathBuf::from("/work/api_geo--Circle--Arc.md"),
        ]
    );
    for plan in &plans {
        assert_eq!(plan.compounds, vec![plan.subject]);
    }
    assert!(Rc::ptr_eq(&plans[1].view, &plans[2].view));
    assert!(!Rc::ptr_eq(&plans[0].view, &plans[1].view));
}

#[test]
fn classes_mode_without_classes_fails() {
    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();
    tree.insert(root, Compound::new("s", CompoundKind::Struct, "S"))
        .unwrap();

    let mut config = config();
    multi(&mut config);
    config.output.classes = true;

    assert!(matches!(plan(&tree, &config), Err(OperationError::NoClasses)));
}

#[test]
fn pages_are_added_after_the_primary_documents() {
    let tree = sample_tree();
    let mut config = config();
    config.output.pages = true;

    let plans = plan(&tree, &config).unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[1].path, Path::new("/work/page-intro.md"));
    assert_eq!(ids(&tree, &plans[1]), vec!["intro"]);
}

#[test]
fn pages_mode_without_pages_fails() {
    let tree = CompoundTree::new(Compound::index());
    let mut config = config();
    config.output.pages = true;

    assert!(matches!(plan(&tree, &config), Err(OperationError::NoPages)));
}
