use std::collections::{BTreeSet, HashMap, HashSet};

use crate::compound::Member;
use crate::kind::{Access, CompoundKind};
use crate::tree::{CompoundTree, MemberRef, NodeId};

/// Inclusion rules applied by [`filter_children`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterRules {
    pub members: BTreeSet<String>,
    pub compounds: BTreeSet<String>,
    pub access: Access,
    pub skip_empty_namespaces: bool,
}

impl FilterRules {
    pub fn new<M, C>(members: M, compounds: C, access: Access) -> Self
    where
        M: IntoIterator,
        M::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        FilterRules {
            members: members.into_iter().map(Into::into).collect(),
            compounds: compounds.into_iter().map(Into::into).collect(),
            access,
            skip_empty_namespaces: false,
        }
    }

    pub fn with_skip_empty_namespaces(mut self, skip: bool) -> Self {
        self.skip_empty_namespaces = skip;
        self
    }

    pub fn admits_compound(&self, kind: &CompoundKind) -> bool {
        self.compounds.contains(kind.as_str())
    }

    /// Both the kind and the access check must pass.
    pub fn admits_member(&self, member: &Member) -> bool {
        self.members.contains(&member.kind) && member.access.admits(self.access)
    }
}

/// Surviving children and members of every compound visited by one
/// [`filter_children`] call. The tree itself is never modified, so any number
/// of views can be taken from the same tree.
#[derive(Clone, Debug)]
pub struct FilteredView {
    root: NodeId,
    children: HashMap<NodeId, Vec<NodeId>>,
    members: HashMap<NodeId, Vec<usize>>,
}

impl FilteredView {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` was reached by the filter (the root always is).
    pub fn contains(&self, id: NodeId) -> bool {
        self.children.contains_key(&id)
    }

    /// Surviving child compounds of `id`, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices into `tree[id].members()` that survived.
    pub fn member_indices(&self, id: NodeId) -> &[usize] {
        self.members.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn members<'t>(&self, tree: &'t CompoundTree, id: NodeId) -> Vec<&'t Member> {
        let all = tree[id].members();
        self.member_indices(id)
            .iter()
            .filter_map(|index| all.get(*index))
            .collect()
    }

    /// Depth-first list of the surviving compounds below `from`.
    pub fn to_filtered_array(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([from]);
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Surviving members of `from` and of its surviving descendants.
    pub fn filtered_members_array(&self, from: NodeId) -> Vec<MemberRef> {
        let mut compounds = vec![from];
        compounds.extend(self.to_filtered_array(from));

        compounds
            .into_iter()
            .flat_map(|node| {
                self.member_indices(node)
                    .iter()
                    .map(move |index| MemberRef {
                        compound: node,
                        index: *index,
                    })
            })
            .collect()
    }
}

/// Compute the filtered view of the subtree rooted at `root`.
///
/// Child compounds whose kind is not allowed are dropped together with their
/// subtree. `exclude_id` drops one immediate child of `root` by id; it does not
/// apply further down.
pub fn filter_children(
    tree: &CompoundTree,
    root: NodeId,
    rules: &FilterRules,
    exclude_id: Option<&str>,
) -> FilteredView {
    let mut view = FilteredView {
        root,
        children: HashMap::new(),
        members: HashMap::new(),
    };
    visit(tree, rules, &mut view, root, exclude_id);
    view
}

fn visit(
    tree: &CompoundTree,
    rules: &FilterRules,
    view: &mut FilteredView,
    node: NodeId,
    exclude_id: Option<&str>,
) {
    if view.children.contains_key(&node) {
        return;
    }
    // Mark before recursing so a node reached twice is only filtered once.
    view.children.insert(node, Vec::new());

    let mut survivors = Vec::new();
    for child in tree.children(node) {
        let compound = &tree[child];
        if !rules.admits_compound(&compound.kind) {
            continue;
        }
        if exclude_id.is_some_and(|excluded| excluded == compound.id) {
            continue;
        }

        visit(tree, rules, view, child, None);

        if rules.skip_empty_namespaces
            && compound.kind == CompoundKind::Namespace
            && view.children(child).is_empty()
            && view.member_indices(child).is_empty()
        {
            log::debug!("skipping empty namespace {}", compound.fullname);
            continue;
        }
        survivors.push(child);
    }

    let members = tree[node]
        .members()
        .iter()
        .enumerate()
        .filter(|(_, member)| rules.admits_member(member))
        .map(|(index, _)| index)
        .collect();

    view.children.insert(node, survivors);
    view.members.insert(node, members);
}
