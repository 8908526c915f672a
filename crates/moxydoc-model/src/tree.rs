use std::collections::{HashMap, HashSet};
use std::ops::Index;

use thiserror::Error;

use crate::compound::{Compound, Member};
use crate::kind::CompoundKind;

/// Handle to a compound stored in a [`CompoundTree`].
///
/// Handles are only meaningful for the tree that produced them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a member inside its compound.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MemberRef {
    pub compound: NodeId,
    pub index: usize,
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TreeError {
    #[error("duplicate compound id '{id}'")]
    DuplicateId { id: String },
    #[error("linking '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },
    #[error("node {0} does not belong to this tree")]
    UnknownNode(usize),
}

/// Arena holding every compound of one run.
///
/// Each compound except the root has exactly one owner, set by [`CompoundTree::insert`].
/// [`CompoundTree::link`] adds non-owning edges (a group listing a class) and refuses
/// any edge that would close a cycle, so traversals always terminate.
#[derive(Clone, Debug)]
pub struct CompoundTree {
    nodes: Vec<Compound>,
    owners: Vec<Option<NodeId>>,
    by_id: HashMap<String, NodeId>,
}

impl CompoundTree {
    pub fn new(mut root: Compound) -> Self {
        let mut by_id = HashMap::new();
        by_id.insert(root.id.clone(), NodeId(0));
        root.compounds.clear();
        CompoundTree {
            nodes: vec![root],
            owners: vec![None],
            by_id,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Compound> {
        self.nodes.get(id.0)
    }

    /// Mutable access to a compound's own fields and members. Child edges can
    /// only be changed through [`CompoundTree::insert`] and [`CompoundTree::link`].
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Compound> {
        self.nodes.get_mut(id.0)
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// Owner of `id` in the ownership tree; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.owners.get(id.0).copied().flatten()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(id.0)
            .into_iter()
            .flat_map(|compound| compound.compounds.values().copied())
    }

    pub fn member(&self, member: MemberRef) -> Option<&Member> {
        self.nodes
            .get(member.compound.0)
            .and_then(|compound| compound.members.get(member.index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Compound)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, compound)| (NodeId(idx), compound))
    }

    /// Add `compound` as an owned child of `parent`.
    pub fn insert(&mut self, parent: NodeId, mut compound: Compound) -> Result<NodeId, TreeError> {
        self.check(parent)?;
        if self.by_id.contains_key(&compound.id) {
            return Err(TreeError::DuplicateId { id: compound.id });
        }

        compound.compounds.clear();
        let node = NodeId(self.nodes.len());
        self.by_id.insert(compound.id.clone(), node);
        self.nodes[parent.0]
            .compounds
            .insert(compound.id.clone(), node);
        self.nodes.push(compound);
        self.owners.push(Some(parent));
        Ok(node)
    }

    /// Add a non-owning edge `parent -> child`. Linking an existing edge is a no-op.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;

        if parent == child || self.reaches(child, parent) {
            return Err(TreeError::Cycle {
                parent: self.nodes[parent.0].id.clone(),
                child: self.nodes[child.0].id.clone(),
            });
        }

        let child_id = self.nodes[child.0].id.clone();
        self.nodes[parent.0].compounds.entry(child_id).or_insert(child);
        Ok(())
    }

    /// Re-home an owned compound under a new owner, dropping the old owning edge.
    pub fn reparent(&mut self, child: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.check(child)?;
        if self.owners[child.0] == Some(parent) {
            return Ok(());
        }
        self.link(parent, child)?;

        if let Some(previous) = self.owners[child.0] {
            let child_id = self.nodes[child.0].id.clone();
            self.nodes[previous.0].compounds.shift_remove(&child_id);
        }
        self.owners[child.0] = Some(parent);
        Ok(())
    }

    /// Depth-first, pre-order list of every compound below `from`, optionally
    /// restricted to one kind. Nodes reachable through several edges appear once.
    pub fn to_array(&self, from: NodeId, kind: Option<&CompoundKind>) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(from, |node| {
            if kind.map_or(true, |kind| &self.nodes[node.0].kind == kind) {
                out.push(node);
            }
            true
        });
        out
    }

    /// Members of `from` followed by those of every descendant, in traversal order.
    pub fn members_to_array(&self, from: NodeId, kind: Option<&str>) -> Vec<MemberRef> {
        let mut compounds = vec![from];
        compounds.extend(self.to_array(from, None));

        compounds
            .into_iter()
            .flat_map(|node| {
                self.nodes[node.0]
                    .members
                    .iter()
                    .enumerate()
                    .filter(move |(_, member)| kind.map_or(true, |kind| member.kind == kind))
                    .map(move |(index, _)| MemberRef {
                        compound: node,
                        index,
                    })
            })
            .collect()
    }

    /// Outermost compounds of `kind` below the root: the walk does not descend
    /// into a match, so a class nested in another class is not reported.
    pub fn top_level(&self, kind: &CompoundKind) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root(), |node| {
            if &self.nodes[node.0].kind == kind {
                out.push(node);
                return false;
            }
            true
        });
        out
    }

    /// Pre-order walk below `from`; `visit` returns whether to descend.
    fn walk(&self, from: NodeId, mut visit: impl FnMut(NodeId) -> bool) {
        let mut seen = HashSet::new();
        seen.insert(from);
        let mut stack: Vec<NodeId> = self.children(from).collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            if visit(node) {
                let before = stack.len();
                stack.extend(self.children(node));
                stack[before..].reverse();
            }
        }
    }

    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut found = false;
        self.walk(from, |node| {
            if node == target {
                found = true;
            }
            !found
        });
        found
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id.0))
        }
    }
}

impl Index<NodeId> for CompoundTree {
    type Output = Compound;

    fn index(&self, id: NodeId) -> &Compound {
        &self.nodes[id.0]
    }
}
