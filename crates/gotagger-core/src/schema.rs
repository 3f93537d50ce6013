//! Schema model walked to compute tags
//!
//! A language-neutral view of the protobuf descriptors in a plugin request:
//! files, messages (records), fields and oneofs (exclusive groups). Tag
//! directives are carried as already-extracted raw strings.

use serde::{Deserialize, Serialize};

/// Schema syntax accepted by the walker
pub const SUPPORTED_SYNTAX: &str = "proto3";

/// A schema source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// File name relative to the protoc include path, e.g. `api/user.proto`
    pub name: String,

    /// Declared syntax; absent means the compiler did not record one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// `go_package` file option, used for import-path output layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package: Option<String>,

    /// Top-level message types in declaration order
    #[serde(default)]
    pub records: Vec<SchemaRecord>,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            syntax: Some(SUPPORTED_SYNTAX.to_string()),
            ..Default::default()
        }
    }

    pub fn with_record(mut self, record: SchemaRecord) -> Self {
        self.records.push(record);
        self
    }
}

/// A message type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<SchemaField>,

    /// Oneof declarations; fields refer to them by index
    #[serde(default)]
    pub groups: Vec<ExclusiveGroup>,

    #[serde(default)]
    pub nested: Vec<SchemaRecord>,

    /// Compiler-synthesized map entry type; no Go struct is generated for it
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub map_entry: bool,
}

impl SchemaRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_group(mut self, group: ExclusiveGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_nested(mut self, record: SchemaRecord) -> Self {
        self.nested.push(record);
        self
    }

    /// The group a field belongs to, if it names a real (non-synthetic) one
    pub fn real_group(&self, field: &SchemaField) -> Option<&ExclusiveGroup> {
        field
            .group
            .and_then(|index| self.groups.get(index))
            .filter(|group| !group.synthetic)
    }
}

/// A message field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,

    /// Index into the owning record's `groups`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,

    /// Raw tag directive from the field's extension option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, raw: impl Into<String>) -> Self {
        self.annotation = Some(raw.into());
        self
    }

    pub fn in_group(mut self, index: usize) -> Self {
        self.group = Some(index);
        self
    }
}

/// A oneof declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    pub name: String,

    /// Raw tag directive from the oneof's extension option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    /// Compiler-generated wrapper around a proto3 `optional` field
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl ExclusiveGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_annotation(mut self, raw: impl Into<String>) -> Self {
        self.annotation = Some(raw.into());
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}
