use indexmap::IndexMap;
use serde::Serialize;

use crate::kind::{Access, CompoundKind};
use crate::tree::NodeId;

/// A documentation entity owning child compounds and members.
///
/// Child edges live in `compounds`, keyed by child id in insertion order.
/// Only [`crate::CompoundTree`] can add edges, which keeps the graph acyclic.
#[derive(Clone, Debug)]
pub struct Compound {
    pub id: String,
    pub kind: CompoundKind,
    pub name: String,
    pub fullname: String,
    pub title: String,
    pub brief: String,
    pub detailed: String,
    pub includes: Option<String>,
    pub language: Option<String>,
    pub bases: Vec<Reference>,
    pub derived: Vec<Reference>,
    pub location: Option<Location>,
    pub(crate) compounds: IndexMap<String, NodeId>,
    pub(crate) members: Vec<Member>,
}

impl Compound {
    pub fn new(id: impl Into<String>, kind: CompoundKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Compound {
            id: id.into(),
            kind,
            fullname: name.clone(),
            name,
            title: String::new(),
            brief: String::new(),
            detailed: String::new(),
            includes: None,
            language: None,
            bases: Vec::new(),
            derived: Vec::new(),
            location: None,
            compounds: IndexMap::new(),
            members: Vec::new(),
        }
    }

    /// The synthetic root every tree hangs from.
    pub fn index() -> Self {
        Compound::new("index", CompoundKind::Index, "index")
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = fullname.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Child ids mapped to their nodes, in insertion order.
    pub fn compounds(&self) -> &IndexMap<String, NodeId> {
        &self.compounds
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn push_member(&mut self, member: Member) {
        self.members.push(member);
    }
}

/// A leaf documentation item such as a function, variable or enum.
#[derive(Clone, Debug, Serialize)]
pub struct Member {
    pub id: String,
    /// Section kind the member was declared in (`public-func`, `define`, ...).
    pub kind: String,
    /// Declaration kind (`function`, `variable`, `enum`, ...).
    pub declaration: String,
    pub name: String,
    pub access: Access,
    pub prototype: String,
    pub type_name: String,
    pub args: String,
    pub is_static: bool,
    pub brief: String,
    pub detailed: String,
    pub enum_values: Vec<EnumValue>,
    pub location: Option<Location>,
}

impl Member {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, access: Access) -> Self {
        let name = name.into();
        Member {
            id: name.clone(),
            kind: kind.into(),
            declaration: String::new(),
            prototype: name.clone(),
            name,
            access,
            type_name: String::new(),
            args: String::new(),
            is_static: false,
            brief: String::new(),
            detailed: String::new(),
            enum_values: Vec::new(),
            location: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_prototype(mut self, prototype: impl Into<String>) -> Self {
        self.prototype = prototype.into();
        self
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumValue {
    pub id: String,
    pub name: String,
    pub initializer: String,
    pub brief: String,
}

/// Link from one compound to another, e.g. a base class.
#[derive(Clone, Debug, Serialize)]
pub struct Reference {
    pub id: Option<String>,
    pub name: String,
    pub access: Access,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}
