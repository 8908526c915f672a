//! In-memory model of a documentation run.
//!
//! A [`CompoundTree`] holds every compound (namespace, class, group, page, ...)
//! reachable from a synthetic `index` root, together with their members.
//! [`filter_children`] prunes a subtree to the kinds and access levels a caller
//! wants documented, producing a [`FilteredView`] instead of editing the tree.

mod compound;
mod filter;
mod kind;
mod source;
mod tree;

pub use compound::{Compound, EnumValue, Location, Member, Reference};
pub use filter::{filter_children, FilterRules, FilteredView};
pub use kind::{Access, CompoundKind, ParseAccessError};
pub use source::TreeSource;
pub use tree::{CompoundTree, MemberRef, NodeId, TreeError};
