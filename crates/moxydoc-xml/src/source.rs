use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use moxydoc_model::{Compound, CompoundTree, NodeId, TreeError, TreeSource};
use roxmltree::Document;

use crate::compound::{parse_compound, ParsedCompound};
use crate::error::IngestError;

/// Reads the compound tree from a Doxygen XML output directory.
#[derive(Clone, Debug)]
pub struct DoxygenXmlSource {
    dir: PathBuf,
}

impl DoxygenXmlSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, name: &str) -> Result<(PathBuf, String), IngestError> {
        let path = self.dir.join(name);
        let text = fs::read_to_string(&path).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("read {}", path.display());
        Ok((path, text))
    }

    /// Refids listed by `index.xml`, in file order and without repeats.
    fn index_entries(&self) -> Result<Vec<String>, IngestError> {
        if !self.dir.join("index.xml").is_file() {
            return Err(IngestError::MissingIndex(self.dir.clone()));
        }
        let (path, text) = self.read("index.xml")?;
        let document = Document::parse(&text).map_err(|source| IngestError::Xml {
            path: path.clone(),
            source,
        })?;

        let root = document.root_element();
        if !root.has_tag_name("doxygenindex") {
            return Err(IngestError::Malformed {
                path,
                message: format!("expected <doxygenindex>, found <{}>", root.tag_name().name()),
            });
        }

        let mut refids: Vec<String> = Vec::new();
        for entry in root.children().filter(|node| node.has_tag_name("compound")) {
            let Some(refid) = entry.attribute("refid") else {
                log::debug!("skipping index entry without refid");
                continue;
            };
            if !refids.iter().any(|seen| seen == refid) {
                refids.push(refid.to_string());
            }
        }
        Ok(refids)
    }
}

impl TreeSource for DoxygenXmlSource {
    type Error = IngestError;

    fn load(&self) -> Result<CompoundTree, IngestError> {
        let refids = self.index_entries()?;

        let mut parsed = Vec::with_capacity(refids.len());
        for refid in &refids {
            let (path, text) = self.read(&format!("{refid}.xml"))?;
            parsed.push(parse_compound(&path, &text, refid)?);
        }

        assemble(parsed)
    }
}

/// Build the tree from parsed compounds in index order.
///
/// A compound belongs to the first compound that lists it as owned; the
/// rest hang from the root. Group links are added once every compound is
/// placed.
fn assemble(parsed: Vec<ParsedCompound>) -> Result<CompoundTree, IngestError> {
    let positions: HashMap<String, usize> = parsed
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.compound.id.clone(), idx))
        .collect();

    let mut owners: Vec<Option<usize>> = vec![None; parsed.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); parsed.len()];
    for (idx, item) in parsed.iter().enumerate() {
        for refid in &item.owned {
            let Some(&child) = positions.get(refid) else {
                log::debug!("{} lists unknown compound {refid}", item.compound.id);
                continue;
            };
            if child == idx || owners[child].is_some() {
                continue;
            }
            owners[child] = Some(idx);
            children[idx].push(child);
        }
    }

    let mut links: Vec<(String, Vec<String>)> = Vec::new();
    let mut slots: Vec<Option<Compound>> = Vec::with_capacity(parsed.len());
    for item in parsed {
        if !item.linked.is_empty() {
            links.push((item.compound.id.clone(), item.linked));
        }
        slots.push(Some(item.compound));
    }

    let mut tree = CompoundTree::new(Compound::index());
    let root = tree.root();
    for idx in 0..slots.len() {
        if owners[idx].is_none() {
            insert_subtree(&mut tree, root, idx, &mut slots, &children)?;
        }
    }
    // Ownership cycles leave compounds unreachable from any unowned one.
    for idx in 0..slots.len() {
        if let Some(compound) = &slots[idx] {
            log::warn!("compound {} has a circular owner; attaching it to the index", compound.id);
            insert_subtree(&mut tree, root, idx, &mut slots, &children)?;
        }
    }

    for (group, members) in links {
        let Some(group_node) = tree.lookup(&group) else {
            continue;
        };
        for refid in members {
            let Some(child) = tree.lookup(&refid) else {
                log::debug!("{group} lists unknown compound {refid}");
                continue;
            };
            if tree.parent(child) == Some(group_node) {
                continue;
            }
            match tree.link(group_node, child) {
                Ok(()) => {}
                Err(TreeError::Cycle { .. }) => {
                    log::warn!("skipping {refid} in group {group}: it would create a cycle");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(tree)
}

fn insert_subtree(
    tree: &mut CompoundTree,
    parent: NodeId,
    start: usize,
    slots: &mut [Option<Compound>],
    children: &[Vec<usize>],
) -> Result<(), IngestError> {
    let mut stack = vec![(parent, start)];
    while let Some((parent, idx)) = stack.pop() {
        let Some(compound) = slots[idx].take() else {
            continue;
        };
        let node = tree.insert(parent, compound)?;
        for &child in children[idx].iter().rev() {
            stack.push((node, child));
        }
    }
    Ok(())
}
