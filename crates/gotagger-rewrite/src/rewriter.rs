//! Struct tag rewriting
//!
//! Matches the structs of a parsed Go file against a [`TargetFile`] and
//! splices merged or new tag literals into the original text. The field
//! lines of each edited struct are then re-aligned into gofmt's column
//! layout. Everything else is left exactly as it was, and the result is
//! parsed again before it is returned.

use std::collections::BTreeMap;

use gotagger_core::{
    AnnotationSet, OutputFile, TaggerError, TaggerResult, TargetFile, TargetMap,
};
use tracing::{debug, info, trace, warn};

use crate::align::align_struct;
use crate::parser::{FieldDecl, SourceFile, StructDecl, parse_file};

/// Rewrite every file of a target map
///
/// `sources` maps generated file names to their current text. Files are
/// processed in name order; a file with no source text is skipped.
pub fn rewrite(
    sources: &BTreeMap<String, String>,
    map: &TargetMap,
) -> TaggerResult<Vec<OutputFile>> {
    let mut outputs = Vec::with_capacity(map.len());

    for (name, target) in map.iter() {
        let Some(source) = sources.get(name) else {
            warn!(file = %name, "no source text for generated file, skipping");
            continue;
        };

        let content = rewrite_source(name, source, target)?;
        info!(file = %name, structs = target.len(), "rewrote generated file");
        outputs.push(OutputFile::new(name, content));
    }

    Ok(outputs)
}

/// Rewrite the struct tags of one Go source file
pub fn rewrite_source(file_name: &str, source: &str, target: &TargetFile) -> TaggerResult<String> {
    let file = parse_file(file_name, source)?;

    let mut edits = Vec::new();
    let mut edited = Vec::new();
    for (index, decl) in file.structs.iter().enumerate() {
        let Some(structure) = target.structure(&decl.name) else {
            continue;
        };
        trace!(file = %file_name, target = %decl.name, "matched struct");

        let before = edits.len();
        for field in &decl.fields {
            let Some(label) = field.names.first() else {
                continue;
            };
            let Some(computed) = structure.field(label) else {
                continue;
            };
            if let Some(edit) = field_edit(file_name, decl, field, computed)? {
                edits.push(edit);
            }
        }
        if edits.len() > before {
            edited.push(index);
        }
    }

    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let output = splice(source, edits);
    // splicing tags leaves the struct order unchanged
    let spliced = reparse(file_name, &output)?;
    let layout: Vec<Edit> = edited
        .iter()
        .filter_map(|&index| spliced.structs.get(index))
        .flat_map(|decl| align_struct(&output, decl))
        .collect();
    if layout.is_empty() {
        return Ok(output);
    }

    debug!(file = %file_name, lines = layout.len(), "re-aligned struct fields");
    let output = splice(&output, layout);
    reparse(file_name, &output)?;
    Ok(output)
}

fn reparse(file_name: &str, output: &str) -> TaggerResult<SourceFile> {
    parse_file(file_name, output)
        .map_err(|e| e.with_context(format!("rewritten '{file_name}' does not parse")))
}

/// Replace `start..end` with `text`; an empty range is an insertion
#[derive(Debug)]
pub(crate) struct Edit {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) text: String,
}

fn field_edit(
    file_name: &str,
    decl: &StructDecl,
    field: &FieldDecl,
    computed: &AnnotationSet,
) -> TaggerResult<Option<Edit>> {
    let label = field.names.join(", ");

    let Some(tag) = &field.tag else {
        debug!(target = %decl.name, field = %label, "inserting tag");
        return Ok(Some(Edit {
            start: field.type_end,
            end: field.type_end,
            text: format!(" {}", tag_literal(computed)),
        }));
    };

    let location = || format!("{file_name}:{}: field '{label}' of '{}'", field.line, decl.name);
    let Some(value) = &tag.value else {
        return Err(TaggerError::AnnotationParseError(format!(
            "{}: tag is not valid UTF-8",
            location()
        )));
    };
    let existing = AnnotationSet::parse(value).map_err(|e| e.with_context(location()))?;
    let merged = existing.merge(computed);
    if merged == existing {
        trace!(target = %decl.name, field = %label, "tag already up to date");
        return Ok(None);
    }

    debug!(target = %decl.name, field = %label, "merging tag");
    Ok(Some(Edit {
        start: tag.start,
        end: tag.end,
        text: tag_literal(&merged),
    }))
}

fn splice(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.start);

    let extra: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut pos = 0;
    for edit in edits {
        out.push_str(&source[pos..edit.start]);
        out.push_str(&edit.text);
        pos = edit.end;
    }
    out.push_str(&source[pos..]);
    out
}

/// Go literal for a tag set: backquoted unless the content needs escaping
pub fn tag_literal(tags: &AnnotationSet) -> String {
    let content = tags.to_string();
    if !content.contains(['`', '\r', '\n']) {
        return format!("`{content}`");
    }

    let mut literal = String::with_capacity(content.len() + 2);
    literal.push('"');
    for c in content.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => literal.push_str(&format!("\\u{:04x}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}


#[cfg(test)]
#[path = "rewriter/rewriter_parameterized_tests.rs"]
mod rewriter_parameterized_tests;
