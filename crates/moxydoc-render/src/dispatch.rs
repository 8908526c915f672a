use std::borrow::Cow;
use std::sync::OnceLock;

use moxydoc_model::{CompoundKind, CompoundTree, FilteredView, NodeId};
use regex::Regex;

use crate::error::RenderError;
use crate::registry::TemplateRegistry;
use crate::view::CompoundView;

/// Template a compound kind renders with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemplateKind {
    Index,
    Page,
    Namespace,
    Class,
}

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Index => "index",
            TemplateKind::Page => "page",
            TemplateKind::Namespace => "namespace",
            TemplateKind::Class => "class",
        }
    }
}

/// Outcome of template selection for one compound.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dispatch {
    Render(TemplateKind),
    /// Wrapper whose only child is a namespace; the child carries the content.
    Suppress,
    Unsupported,
}

/// Pick the template for `id`.
///
/// The suppression check looks one level deep at the children that survived
/// in `view`, so a wrapper is judged by what will actually be rendered.
pub fn select_template(tree: &CompoundTree, view: &FilteredView, id: NodeId) -> Dispatch {
    let compound = &tree[id];
    match &compound.kind {
        CompoundKind::Index => Dispatch::Render(TemplateKind::Index),
        CompoundKind::Page => Dispatch::Render(TemplateKind::Page),
        CompoundKind::Group | CompoundKind::Namespace => match view.children(id) {
            [only] if tree[*only].kind == CompoundKind::Namespace => Dispatch::Suppress,
            _ => Dispatch::Render(TemplateKind::Namespace),
        },
        CompoundKind::Class | CompoundKind::Struct | CompoundKind::Interface => {
            Dispatch::Render(TemplateKind::Class)
        }
        CompoundKind::Union
        | CompoundKind::Typedef
        | CompoundKind::File
        | CompoundKind::Dir
        | CompoundKind::Other(_) => Dispatch::Unsupported,
    }
}

/// Replace every run of three or more line breaks with a single blank line.
pub fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"(\r\n|\r|\n){3,}").expect("newline pattern is valid"));
    pattern.replace_all(text, "${1}\n")
}

/// Renders compounds of a tree through a [`TemplateRegistry`].
pub struct Renderer<'r> {
    registry: &'r TemplateRegistry,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Renderer { registry }
    }

    /// Render one compound with the children and members surviving in `view`.
    ///
    /// Returns `Ok(None)` when the compound is suppressed or its kind has no
    /// template.
    pub fn render(
        &self,
        tree: &CompoundTree,
        view: &FilteredView,
        id: NodeId,
    ) -> Result<Option<String>, RenderError> {
        let compound = &tree[id];
        let template = match select_template(tree, view, id) {
            Dispatch::Render(template) => template,
            Dispatch::Suppress => {
                log::debug!(
                    "suppressing {} {} in favour of its namespace",
                    compound.kind,
                    compound.fullname
                );
                return Ok(None);
            }
            Dispatch::Unsupported => {
                log::warn!("cannot render {} {}", compound.kind, compound.fullname);
                return Ok(None);
            }
        };

        log::debug!("rendering {} {}", compound.kind, compound.fullname);
        let data = CompoundView::build(tree, view, id);
        let text = self.registry.render_template(
            template.name(),
            &data,
            compound.kind.as_str(),
            &compound.fullname,
        )?;
        Ok(Some(collapse_blank_lines(&text).into_owned()))
    }

    /// Render `ids` in order, keeping `None` for skipped compounds.
    pub fn render_array(
        &self,
        tree: &CompoundTree,
        view: &FilteredView,
        ids: &[NodeId],
    ) -> Result<Vec<Option<String>>, RenderError> {
        ids.iter().map(|id| self.render(tree, view, *id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moxydoc_model::{filter_children, Access, Compound, FilterRules};

    fn rules(compounds: &[&str]) -> FilterRules {
        FilterRules::new(Vec::<String>::new(), compounds.iter().copied(), Access::Private)
    }

    #[test]
    fn collapses_long_newline_runs() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\r\n\r\n\r\nb"), "a\r\n\nb");
    }

    #[test]
    fn selection_is_by_kind() {
        let mut tree = CompoundTree::new(Compound::index());
        let root = tree.root();
        let page = tree
            .insert(root, Compound::new("p", CompoundKind::Page, "p"))
            .unwrap();
        let class = tree
            .insert(root, Compound::new("c", CompoundKind::Struct, "C"))
            .unwrap();
        let union = tree
            .insert(root, Compound::new("u", CompoundKind::Union, "U"))
            .unwrap();
        let other = tree
            .insert(
                root,
                Compound::new("o", CompoundKind::Other("concept".into()), "O"),
            )
            .unwrap();
        let view = filter_children(&tree, root, &rules(&["page", "struct", "union"]), None);

        assert_eq!(select_template(&tree, &view, root), Dispatch::Render(TemplateKind::Index));
        assert_eq!(select_template(&tree, &view, page), Dispatch::Render(TemplateKind::Page));
        assert_eq!(select_template(&tree, &view, class), Dispatch::Render(TemplateKind::Class));
        assert_eq!(select_template(&tree, &view, union), Dispatch::Unsupported);
        assert_eq!(select_template(&tree, &view, other), Dispatch::Unsupported);
    }

    #[test]
    fn namespace_wrapping_a_single_namespace_is_suppressed() {
        let mut tree = CompoundTree::new(Compound::index());
        let root = tree.root();
        let outer = tree
            .insert(root, Compound::new("outer", CompoundKind::Namespace, "outer"))
            .unwrap();
        let inner = tree
            .insert(outer, Compound::new("inner", CompoundKind::Namespace, "inner"))
            .unwrap();
        let group = tree
            .insert(root, Compound::new("g", CompoundKind::Group, "g"))
            .unwrap();
        tree.insert(group, Compound::new("k", CompoundKind::Class, "K"))
            .unwrap();
        let view = filter_children(&tree, root, &rules(&["namespace", "group", "class"]), None);

        assert_eq!(select_template(&tree, &view, outer), Dispatch::Suppress);
        assert_eq!(
            select_template(&tree, &view, inner),
            Dispatch::Render(TemplateKind::Namespace)
        );
        assert_eq!(
            select_template(&tree, &view, group),
            Dispatch::Render(TemplateKind::Namespace)
        );
    }

    #[test]
    fn suppression_counts_only_children_that_survive_filtering() {
        let mut tree = CompoundTree::new(Compound::index());
        let root = tree.root();
        let outer = tree
            .insert(root, Compound::new("outer", CompoundKind::Namespace, "outer"))
            .unwrap();
        tree.insert(outer, Compound::new("inner", CompoundKind::Namespace, "inner"))
            .unwrap();
        tree.insert(outer, Compound::new("c", CompoundKind::Class, "C"))
            .unwrap();

        let everything = filter_children(&tree, root, &rules(&["namespace", "class"]), None);
        assert_eq!(
            select_template(&tree, &everything, outer),
            Dispatch::Render(TemplateKind::Namespace)
        );

        let namespaces_only = filter_children(&tree, root, &rules(&["namespace"]), None);
        assert_eq!(namespaces_only.children(outer).len(), 1);
        assert_eq!(select_template(&tree, &namespaces_only, outer), Dispatch::Suppress);
    }
}
