use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Kind tag of a documentation compound.
///
/// Doxygen emits a fixed vocabulary; anything outside it is preserved in
/// [`CompoundKind::Other`] so ingestion never has to reject a compound.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum CompoundKind {
    Index,
    Page,
    Group,
    Namespace,
    Class,
    Struct,
    Union,
    Interface,
    Typedef,
    File,
    Dir,
    Other(String),
}

impl CompoundKind {
    pub fn as_str(&self) -> &str {
        match self {
            CompoundKind::Index => "index",
            CompoundKind::Page => "page",
            CompoundKind::Group => "group",
            CompoundKind::Namespace => "namespace",
            CompoundKind::Class => "class",
            CompoundKind::Struct => "struct",
            CompoundKind::Union => "union",
            CompoundKind::Interface => "interface",
            CompoundKind::Typedef => "typedef",
            CompoundKind::File => "file",
            CompoundKind::Dir => "dir",
            CompoundKind::Other(kind) => kind,
        }
    }

    /// Parse a kind name. Unknown names map to [`CompoundKind::Other`].
    pub fn parse(value: &str) -> Self {
        match value {
            "index" => CompoundKind::Index,
            "page" => CompoundKind::Page,
            "group" => CompoundKind::Group,
            "namespace" => CompoundKind::Namespace,
            "class" => CompoundKind::Class,
            "struct" => CompoundKind::Struct,
            "union" => CompoundKind::Union,
            "interface" => CompoundKind::Interface,
            "typedef" => CompoundKind::Typedef,
            "file" => CompoundKind::File,
            "dir" => CompoundKind::Dir,
            other => CompoundKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundKind {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(CompoundKind::parse(value))
    }
}

impl Serialize for CompoundKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Member visibility, ordered from least to most visible.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Access {
    Private,
    Protected,
    Public,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::Protected => "protected",
            Access::Public => "public",
        }
    }

    /// Whether an entry with this access passes a `threshold`.
    pub fn admits(self, threshold: Access) -> bool {
        self >= threshold
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown access level '{0}' (expected one of 'private', 'protected', or 'public')")]
pub struct ParseAccessError(pub String);

impl FromStr for Access {
    type Err = ParseAccessError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "private" => Ok(Access::Private),
            "protected" => Ok(Access::Protected),
            "public" => Ok(Access::Public),
            other => Err(ParseAccessError(other.to_string())),
        }
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
