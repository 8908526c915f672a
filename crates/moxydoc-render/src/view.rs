//! Serialisable projections of compounds handed to templates.
//!
//! Templates compile in strict mode, so every field here is always present;
//! optional data serialises as `null` and empty collections as `[]`.

use moxydoc_model::{
    Compound, CompoundKind, CompoundTree, FilteredView, Location, Member, NodeId,
    Reference,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CompoundView<'a> {
    pub id: &'a str,
    pub kind: &'a CompoundKind,
    pub name: &'a str,
    pub fullname: &'a str,
    pub title: &'a str,
    pub brief: &'a str,
    pub detailed: &'a str,
    pub summary: String,
    pub includes: Option<&'a str>,
    /// Named apart from the `language` helper so templates stay unambiguous.
    pub source_language: Option<&'a str>,
    pub bases: &'a [Reference],
    pub derived: &'a [Reference],
    pub location: Option<&'a Location>,
    pub compounds: Vec<ChildView<'a>>,
    pub members: Vec<MemberView<'a>>,
}

/// Surviving child compound, shown in summary tables.
#[derive(Debug, Serialize)]
pub struct ChildView<'a> {
    pub id: &'a str,
    pub kind: &'a CompoundKind,
    pub name: &'a str,
    pub fullname: &'a str,
    pub title: &'a str,
    pub brief: &'a str,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct MemberView<'a> {
    #[serde(flatten)]
    pub member: &'a Member,
    pub summary: String,
}

impl<'a> CompoundView<'a> {
    /// Project `id` with the children and members that survived in `view`.
    pub fn build(tree: &'a CompoundTree, view: &FilteredView, id: NodeId) -> Self {
        let compound = &tree[id];
        let compounds = view
            .children(id)
            .iter()
            .map(|child| ChildView::new(&tree[*child]))
            .collect();
        let members = view
            .members(tree, id)
            .into_iter()
            .map(MemberView::new)
            .collect();

        CompoundView {
            id: &compound.id,
            kind: &compound.kind,
            name: &compound.name,
            fullname: &compound.fullname,
            title: &compound.title,
            brief: &compound.brief,
            detailed: &compound.detailed,
            summary: summarize(&compound.brief, &compound.detailed),
            includes: compound.includes.as_deref(),
            source_language: compound.language.as_deref(),
            bases: &compound.bases,
            derived: &compound.derived,
            location: compound.location.as_ref(),
            compounds,
            members,
        }
    }
}

impl<'a> ChildView<'a> {
    fn new(compound: &'a Compound) -> Self {
        ChildView {
            id: &compound.id,
            kind: &compound.kind,
            name: &compound.name,
            fullname: &compound.fullname,
            title: &compound.title,
            brief: &compound.brief,
            summary: summarize(&compound.brief, &compound.detailed),
        }
    }
}

impl<'a> MemberView<'a> {
    fn new(member: &'a Member) -> Self {
        MemberView {
            member,
            summary: summarize(&member.brief, &member.detailed),
        }
    }
}

/// One-line description for summary tables: the first non-blank line of the
/// brief, falling back to the detailed description.
pub fn summarize(brief: &str, detailed: &str) -> String {
    [brief, detailed]
        .iter()
        .flat_map(|text| text.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_brief() {
        assert_eq!(summarize("\n  Runs things.\nMore.", "Detail"), "Runs things.");
        assert_eq!(summarize("", "\nDetail line\nnext"), "Detail line");
        assert_eq!(summarize("", ""), "");
    }
}
