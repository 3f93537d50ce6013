//! Computed tags per generated file, struct and field

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationSet;

/// Tags for the fields of one generated struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStructure {
    name: String,
    fields: BTreeMap<String, AnnotationSet>,
}

impl TargetStructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Go struct name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record tags for a Go field; empty sets are not recorded
    pub fn insert_field(&mut self, label: impl Into<String>, tags: AnnotationSet) {
        if !tags.is_empty() {
            self.fields.insert(label.into(), tags);
        }
    }

    pub fn field(&self, label: &str) -> Option<&AnnotationSet> {
        self.fields.get(label)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &AnnotationSet)> {
        self.fields.iter().map(|(label, tags)| (label.as_str(), tags))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Structures to tag in one generated Go file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFile {
    structures: BTreeMap<String, TargetStructure>,
}

impl TargetFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structure; a later structure with the same name replaces the
    /// earlier one
    pub fn insert(&mut self, structure: TargetStructure) -> Option<TargetStructure> {
        self.structures
            .insert(structure.name.clone(), structure)
    }

    pub fn structure(&self, name: &str) -> Option<&TargetStructure> {
        self.structures.get(name)
    }

    pub fn structures(&self) -> impl Iterator<Item = &TargetStructure> {
        self.structures.values()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

/// Everything a walk computed, keyed by generated file name
///
/// Built once by the walker and read by the rewriter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMap {
    files: BTreeMap<String, TargetFile>,
}

impl TargetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a generated file, created on first use
    pub fn file_mut(&mut self, name: impl Into<String>) -> &mut TargetFile {
        self.files.entry(name.into()).or_default()
    }

    pub fn file(&self, name: &str) -> Option<&TargetFile> {
        self.files.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TargetFile)> {
        self.files.iter().map(|(name, file)| (name.as_str(), file))
    }

    /// Drop files that ended up without any structure
    pub fn prune(&mut self) {
        self.files.retain(|_, file| !file.is_empty());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a TargetMap {
    type Item = (&'a String, &'a TargetFile);
    type IntoIter = btree_map::Iter<'a, String, TargetFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// A rewritten generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Name relative to the output directory
    pub name: String,
    pub content: String,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
