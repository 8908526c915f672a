//! Partition a compound tree into output documents.

use std::path::PathBuf;
use std::rc::Rc;

use moxydoc_config::{OutputMode, OutputSettings};
use moxydoc_model::{filter_children, CompoundKind, CompoundTree, FilterRules, FilteredView, NodeId};

use crate::error::{OperationError, OperationResult};

/// One output file: where it goes and which compounds it renders, in order.
#[derive(Clone, Debug)]
pub struct DocumentPlan {
    pub path: PathBuf,
    /// Compound the document is named after (root, group, class or page).
    pub subject: NodeId,
    pub compounds: Vec<NodeId>,
    /// View the compounds are rendered against, shared by every document
    /// cut from the same filtering pass.
    pub view: Rc<FilteredView>,
}

/// File-name form of a class's full name.
pub fn class_file_name(fullname: &str) -> String {
    fullname
        .chars()
        .map(|ch| match ch {
            ':' => '-',
            '<' => '(',
            '>' => ')',
            other => other,
        })
        .collect()
}

/// Decide which documents to produce for `tree`.
///
/// Groups mode wins over classes mode. Pages, when enabled, are planned after
/// the primary documents.
pub fn plan_documents(
    tree: &CompoundTree,
    output: &OutputSettings,
    rules: &FilterRules,
) -> OperationResult<Vec<DocumentPlan>> {
    let mut plans = match output.mode() {
        OutputMode::Groups => {
            if output.noindex {
                log::warn!("`noindex` has no effect when writing one document per group");
            }
            if output.classes {
                log::warn!("`classes` is ignored because `groups` is enabled");
            }
            plan_groups(tree, output, rules)?
        }
        OutputMode::Classes => plan_classes(tree, output, rules)?,
        OutputMode::Single => vec![plan_single(tree, output, rules)],
    };

    if output.pages {
        plans.extend(plan_pages(tree, output, rules)?);
    }

    Ok(plans)
}

fn plan_single(tree: &CompoundTree, output: &OutputSettings, rules: &FilterRules) -> DocumentPlan {
    let root = tree.root();
    let view = filter_children(tree, root, rules, None);

    let mut compounds = Vec::new();
    if !output.noindex {
        compounds.push(root);
    }
    compounds.extend(view.to_filtered_array(root));

    DocumentPlan {
        path: output.path.clone(),
        subject: root,
        compounds,
        view: Rc::new(view),
    }
}

fn plan_groups(
    tree: &CompoundTree,
    output: &OutputSettings,
    rules: &FilterRules,
) -> OperationResult<Vec<DocumentPlan>> {
    let groups = tree.to_array(tree.root(), Some(&CompoundKind::Group));
    if groups.is_empty() {
        return Err(OperationError::NoGroups);
    }

    Ok(groups
        .into_iter()
        .map(|group| {
            let compound = &tree[group];
            let view = filter_children(tree, group, rules, Some(&compound.id));
            let mut compounds = vec![group];
            compounds.extend(view.to_filtered_array(group));
            DocumentPlan {
                path: output.path_for(&compound.name),
                subject: group,
                compounds,
                view: Rc::new(view),
            }
        })
        .collect())
}

fn plan_classes(
    tree: &CompoundTree,
    output: &OutputSettings,
    rules: &FilterRules,
) -> OperationResult<Vec<DocumentPlan>> {
    let classes = tree.top_level(&CompoundKind::Class);
    if classes.is_empty() {
        return Err(OperationError::NoClasses);
    }

    let mut plans = Vec::new();
    for class in classes {
        let view = Rc::new(filter_children(tree, class, rules, None));
        let mut members = vec![class];
        members.extend(view.to_filtered_array(class));

        for id in members {
            plans.push(DocumentPlan {
                path: output.path_for(&class_file_name(&tree[id].fullname)),
                subject: id,
                compounds: vec![id],
                view: Rc::clone(&view),
            });
        }
    }
    Ok(plans)
}

fn plan_pages(
    tree: &CompoundTree,
    output: &OutputSettings,
    rules: &FilterRules,
) -> OperationResult<Vec<DocumentPlan>> {
    let pages = tree.to_array(tree.root(), Some(&CompoundKind::Page));
    if pages.is_empty() {
        return Err(OperationError::NoPages);
    }

    Ok(pages
        .into_iter()
        .map(|page| {
            let view = filter_children(tree, page, rules, None);
            let mut compounds = vec![page];
            compounds.extend(view.to_filtered_array(page));
            DocumentPlan {
                path: output.page_path_for(&tree[page].name),
                subject: page,
                compounds,
                view: Rc::new(view),
            }
        })
        .collect())
}
