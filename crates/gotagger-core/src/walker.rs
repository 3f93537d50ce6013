//! Schema walk computing the tags of every generated struct
//!
//! The walk visits each requested file's messages depth-first, names the
//! Go struct each one becomes, and records the tags resolved for its fields:
//!
//! - explicit tags come from the field (or oneof) extension option;
//! - default tags come from configuration and apply only to the reserved
//!   `XXX_` fields;
//! - explicit tags win, defaults fill the gaps.

use tracing::{debug, trace};

use crate::annotation::AnnotationSet;
use crate::config::{RESERVED_FIELDS, TaggerConfig};
use crate::error::{TaggerError, TaggerResult};
use crate::naming::{go_field_name, go_struct_name, message_path};
use crate::schema::{SUPPORTED_SYNTAX, SchemaFile, SchemaRecord};
use crate::target::{TargetFile, TargetMap, TargetStructure};

/// Compute the target map for the files listed in `files_to_generate`
///
/// Files are walked in `files_to_generate` order; a generated file that ends
/// up without any structure is left out of the map.
pub fn walk(
    files: &[SchemaFile],
    files_to_generate: &[String],
    config: &TaggerConfig,
) -> TaggerResult<TargetMap> {
    let mut map = TargetMap::new();

    for name in files_to_generate {
        let file = files.iter().find(|f| &f.name == name).ok_or_else(|| {
            TaggerError::SchemaError(format!(
                "file to generate '{name}' is missing from the request"
            ))
        })?;

        let target_name = config.target_file_name(file);
        debug!(proto = %file.name, target = %target_name, "analyzing proto file");

        let mut walker = Walker {
            config,
            target: map.file_mut(target_name),
        };
        walker.walk_file(file).map_err(|e| {
            e.with_context(format!("failed to analyze proto file '{}'", file.name))
        })?;
    }

    map.prune();
    Ok(map)
}

/// Resolve the tags of one Go field: explicit directive merged with the
/// configured default for that field
pub fn resolve_field(
    label: &str,
    explicit: Option<&str>,
    config: &TaggerConfig,
) -> TaggerResult<AnnotationSet> {
    let explicit = match explicit {
        Some(raw) => AnnotationSet::parse(raw)?,
        None => AnnotationSet::new(),
    };
    Ok(explicit.merge(&default_tags(label, config)))
}

/// Default tags for a Go field; only reserved fields have any
fn default_tags(label: &str, config: &TaggerConfig) -> AnnotationSet {
    if RESERVED_FIELDS.contains(&label) {
        config.reserved_field_tags.clone()
    } else {
        AnnotationSet::new()
    }
}

struct Walker<'a> {
    config: &'a TaggerConfig,
    target: &'a mut TargetFile,
}

impl Walker<'_> {
    fn walk_file(&mut self, file: &SchemaFile) -> TaggerResult<()> {
        if let Some(syntax) = file.syntax.as_deref() {
            if syntax != SUPPORTED_SYNTAX {
                return Err(TaggerError::SchemaError(format!(
                    "unsupported syntax '{syntax}', must be '{SUPPORTED_SYNTAX}'"
                )));
            }
        }

        for record in &file.records {
            self.walk_record(&[], record).map_err(|e| {
                e.with_context(format!("failed to analyze message type '{}'", record.name))
            })?;
        }
        Ok(())
    }

    fn walk_record(&mut self, parents: &[String], record: &SchemaRecord) -> TaggerResult<()> {
        if record.map_entry {
            trace!(message = %message_path(parents, &record.name), "skipping map entry");
            return Ok(());
        }
        debug!(message = %message_path(parents, &record.name), "analyzing message type");

        let struct_name = go_struct_name(parents, &record.name);
        let mut structure = TargetStructure::new(&struct_name);
        let mut wrappers = Vec::new();

        for label in RESERVED_FIELDS {
            structure.insert_field(label, resolve_field(label, None, self.config)?);
        }

        for field in &record.fields {
            let label = go_field_name(&field.name);
            let tags = resolve_field(&label, field.annotation.as_deref(), self.config)
                .map_err(|e| e.with_context(format!("field '{}'", field.name)))?;
            if tags.is_empty() {
                continue;
            }

            // oneof members live in their own wrapper struct
            match record.real_group(field) {
                Some(group) => {
                    trace!(field = %field.name, oneof = %group.name, "oneof member");
                    wrappers.push(wrapper(&struct_name, &label, tags));
                }
                None => structure.insert_field(label, tags),
            }
        }

        for group in record.groups.iter().filter(|g| !g.synthetic) {
            let label = go_field_name(&group.name);
            let tags = resolve_field(&label, group.annotation.as_deref(), self.config)
                .map_err(|e| e.with_context(format!("oneof '{}'", group.name)))?;
            if !tags.is_empty() {
                wrappers.push(wrapper(&struct_name, &label, tags));
            }
        }

        let mut chain = parents.to_vec();
        chain.push(record.name.clone());
        for nested in &record.nested {
            self.walk_record(&chain, nested).map_err(|e| {
                e.with_context(format!(
                    "failed to analyze message type '{}'",
                    message_path(&chain, &nested.name)
                ))
            })?;
        }

        if !structure.is_empty() {
            debug!(target = %struct_name, fields = structure.len(), "tagged struct");
            self.target.insert(structure);
        }
        for wrapper in wrappers {
            debug!(target = %wrapper.name(), "tagged wrapper struct");
            self.target.insert(wrapper);
        }
        Ok(())
    }
}

/// Single-field struct `<Parent>_<Label>` generated for a oneof
fn wrapper(parent: &str, label: &str, tags: AnnotationSet) -> TargetStructure {
    let mut structure = TargetStructure::new(format!("{parent}_{label}"));
    structure.insert_field(label, tags);
    structure
}
