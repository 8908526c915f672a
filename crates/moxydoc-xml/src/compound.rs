//! Extraction of one `<compounddef>` into model values.

use std::path::Path;

use moxydoc_model::{Access, Compound, CompoundKind, EnumValue, Location, Member, Reference};
use roxmltree::{Document, Node};

use crate::description::{plain_text, to_markdown};
use crate::error::IngestError;

const SCOPE_CHILDREN: &[&str] = &["innernamespace", "innerclass"];
const GROUP_CHILDREN: &[&str] = &["innergroup"];
const GROUP_LINKS: &[&str] = &["innerclass", "innernamespace", "innerfile"];
const PAGE_CHILDREN: &[&str] = &["innerpage"];
const DIR_CHILDREN: &[&str] = &["innerdir", "innerfile"];
const NO_CHILDREN: &[&str] = &[];

/// A compound plus the refids it lists as children.
#[derive(Debug)]
pub(crate) struct ParsedCompound {
    pub compound: Compound,
    /// Children this compound owns in the tree.
    pub owned: Vec<String>,
    /// Children a group lists without owning.
    pub linked: Vec<String>,
}

pub(crate) fn parse_compound(
    path: &Path,
    text: &str,
    refid: &str,
) -> Result<ParsedCompound, IngestError> {
    let document = Document::parse(text).map_err(|source| IngestError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let definitions: Vec<Node<'_, '_>> = document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("compounddef"))
        .collect();
    let def = definitions
        .iter()
        .find(|node| node.attribute("id") == Some(refid))
        .or_else(|| definitions.first())
        .copied()
        .ok_or_else(|| IngestError::Malformed {
            path: path.to_path_buf(),
            message: format!("no <compounddef> for '{refid}'"),
        })?;

    let id = def.attribute("id").unwrap_or(refid);
    let kind = CompoundKind::parse(def.attribute("kind").unwrap_or_default());
    let fullname = child_text(def, "compoundname");
    if fullname.is_empty() {
        return Err(IngestError::Malformed {
            path: path.to_path_buf(),
            message: format!("compound '{id}' has no <compoundname>"),
        });
    }

    let name = match kind {
        CompoundKind::Namespace
        | CompoundKind::Class
        | CompoundKind::Struct
        | CompoundKind::Union
        | CompoundKind::Interface => fullname
            .rsplit("::")
            .next()
            .unwrap_or(&fullname)
            .to_string(),
        _ => fullname.clone(),
    };

    let mut compound = Compound::new(id, kind.clone(), name).with_fullname(fullname);
    compound.title = child_text(def, "title");
    compound.brief = to_markdown(child(def, "briefdescription"));
    compound.detailed = to_markdown(child(def, "detaileddescription"));
    compound.includes = child(def, "includes").map(|node| plain_text(Some(node)));
    compound.language = def.attribute("language").map(str::to_string);
    compound.bases = references(def, "basecompoundref");
    compound.derived = references(def, "derivedcompoundref");
    compound.location = child(def, "location").map(location);

    for section in def.children().filter(|node| node.has_tag_name("sectiondef")) {
        let section_kind = section.attribute("kind").unwrap_or_default();
        for memberdef in section.children().filter(|node| node.has_tag_name("memberdef")) {
            compound.push_member(member(section_kind, memberdef));
        }
    }

    let (owned_tags, linked_tags) = match kind {
        CompoundKind::Namespace
        | CompoundKind::Class
        | CompoundKind::Struct
        | CompoundKind::Union
        | CompoundKind::Interface => (SCOPE_CHILDREN, NO_CHILDREN),
        CompoundKind::Group => (GROUP_CHILDREN, GROUP_LINKS),
        CompoundKind::Page => (PAGE_CHILDREN, NO_CHILDREN),
        CompoundKind::Dir => (DIR_CHILDREN, NO_CHILDREN),
        _ => (NO_CHILDREN, NO_CHILDREN),
    };

    Ok(ParsedCompound {
        compound,
        owned: refids(def, owned_tags),
        linked: refids(def, linked_tags),
    })
}

fn member(section_kind: &str, node: Node<'_, '_>) -> Member {
    let name = child_text(node, "name");
    let access = match node.attribute("prot") {
        Some("public") | None => Access::Public,
        Some("protected") => Access::Protected,
        // `package` and anything else narrower than protected
        Some(_) => Access::Private,
    };
    let declaration = node.attribute("kind").unwrap_or_default().to_string();

    let mut member = Member::new(section_kind, name.clone(), access);
    if let Some(id) = node.attribute("id") {
        member.id = id.to_string();
    }
    member.type_name = plain_text(child(node, "type"));
    member.args = child_text(node, "argsstring");
    member.is_static = node.attribute("static") == Some("yes");
    member.brief = to_markdown(child(node, "briefdescription"));
    member.detailed = to_markdown(child(node, "detaileddescription"));
    member.location = child(node, "location").map(location);
    member.enum_values = node
        .children()
        .filter(|value| value.has_tag_name("enumvalue"))
        .map(|value| EnumValue {
            id: value.attribute("id").unwrap_or_default().to_string(),
            name: child_text(value, "name"),
            initializer: child_text(value, "initializer"),
            brief: to_markdown(child(value, "briefdescription")),
        })
        .collect();

    member.prototype = match declaration.as_str() {
        "enum" => format!("enum {name}"),
        "define" => {
            let params: Vec<String> = node
                .children()
                .filter(|param| param.has_tag_name("param"))
                .map(|param| child_text(param, "defname"))
                .collect();
            if params.is_empty() {
                format!("#define {name}")
            } else {
                format!("#define {name}({})", params.join(", "))
            }
        }
        _ => {
            let prototype = format!("{}{}", child_text(node, "definition"), member.args);
            if prototype.trim().is_empty() {
                name
            } else {
                prototype.trim().to_string()
            }
        }
    };
    member.declaration = declaration;
    member
}

fn references(node: Node<'_, '_>, tag: &str) -> Vec<Reference> {
    node.children()
        .filter(|child| child.has_tag_name(tag))
        .map(|child| Reference {
            id: child.attribute("refid").map(str::to_string),
            name: plain_text(Some(child)),
            access: match child.attribute("prot") {
                Some("protected") => Access::Protected,
                Some("private") => Access::Private,
                _ => Access::Public,
            },
        })
        .collect()
}

fn refids(node: Node<'_, '_>, tags: &[&str]) -> Vec<String> {
    node.children()
        .filter(|child| tags.contains(&child.tag_name().name()))
        .filter_map(|child| child.attribute("refid"))
        .map(str::to_string)
        .collect()
}

fn location(node: Node<'_, '_>) -> Location {
    Location {
        file: node.attribute("file").unwrap_or_default().to_string(),
        line: node.attribute("line").and_then(|line| line.parse().ok()),
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn child_text(node: Node<'_, '_>, tag: &str) -> String {
    plain_text(child(node, tag))
}
