//! Plugin configuration
//!
//! Settings come from the protoc parameter string
//! (`--gotagger_out=xxx=bson+"-",output_path=gen:.`) and, optionally, from a
//! config file deserialized into the same [`TaggerConfig`]. Parameter values
//! override file values.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationSet;
use crate::error::{TaggerError, TaggerResult};
use crate::schema::SchemaFile;

/// Fields protoc-gen-go adds to every message struct
pub const RESERVED_FIELDS: [&str; 3] = [
    "XXX_NoUnkeyedLiteral",
    "XXX_unrecognized",
    "XXX_sizecache",
];

/// Where generated files live relative to the output directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathsMode {
    /// Next to the `.proto` file: `api/user.proto` -> `api/user.pb.go`
    #[default]
    SourceRelative,
    /// Under the `go_package` import path
    Import,
}

impl FromStr for PathsMode {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source_relative" => Ok(PathsMode::SourceRelative),
            "import" => Ok(PathsMode::Import),
            other => Err(TaggerError::ConfigError(format!(
                "invalid value '{other}' for 'paths', expected 'source_relative' or 'import'"
            ))),
        }
    }
}

impl fmt::Display for PathsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathsMode::SourceRelative => write!(f, "source_relative"),
            PathsMode::Import => write!(f, "import"),
        }
    }
}

/// Plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaggerConfig {
    /// Tags applied to the [`RESERVED_FIELDS`] of every generated struct
    #[serde(alias = "xxx")]
    pub reserved_field_tags: AnnotationSet,

    /// Directory holding the generated Go files
    pub output_path: PathBuf,

    /// Layout of generated files under `output_path`
    pub paths: PathsMode,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            reserved_field_tags: AnnotationSet::new(),
            output_path: PathBuf::from("."),
            paths: PathsMode::default(),
        }
    }
}

impl TaggerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from a protoc parameter string
    pub fn from_parameter(parameter: &str) -> TaggerResult<Self> {
        Self::default().with_parameter(parameter)
    }

    /// Apply a protoc parameter string on top of this configuration
    ///
    /// The parameter is a comma-separated list of `key=value` options; commas
    /// inside double quotes do not split. Recognized keys are `xxx` (alias
    /// `reserved_field_tags`), `output_path` and `paths`. Since protoc
    /// reserves `:` in the parameter, tag values spell it `+`.
    pub fn with_parameter(mut self, parameter: &str) -> TaggerResult<Self> {
        for (key, value) in split_parameter(parameter)? {
            match key.as_str() {
                "xxx" | "reserved_field_tags" => {
                    self.reserved_field_tags =
                        AnnotationSet::parse(&decode_tag_parameter(&value)).map_err(|e| {
                            TaggerError::ConfigError(format!(
                                "invalid tags for '{key}': {}",
                                e.message()
                            ))
                        })?;
                }
                "output_path" => {
                    if value.is_empty() {
                        return Err(TaggerError::ConfigError(
                            "'output_path' must not be empty".to_string(),
                        ));
                    }
                    self.output_path = PathBuf::from(value);
                }
                "paths" => self.paths = value.parse()?,
                other => {
                    return Err(TaggerError::ConfigError(format!(
                        "unknown option '{other}'"
                    )));
                }
            }
        }
        Ok(self)
    }

    /// Name of the generated Go file for a schema file, relative to
    /// `output_path`
    pub fn target_file_name(&self, file: &SchemaFile) -> String {
        let stem = file.name.strip_suffix(".proto").unwrap_or(&file.name);

        match self.paths {
            PathsMode::SourceRelative => format!("{stem}.pb.go"),
            PathsMode::Import => {
                let base = stem.rsplit('/').next().unwrap_or(stem);
                match go_import_path(file.go_package.as_deref()) {
                    Some(import_path) => format!("{import_path}/{base}.pb.go"),
                    None => format!("{stem}.pb.go"),
                }
            }
        }
    }
}

/// Import path part of a `go_package` option (`path;name` -> `path`)
fn go_import_path(go_package: Option<&str>) -> Option<&str> {
    let path = go_package?.split(';').next()?.trim().trim_end_matches('/');
    (!path.is_empty()).then_some(path)
}

/// Split `k1=v1,k2="a,b"` into pairs, honoring double quotes
fn split_parameter(parameter: &str) -> TaggerResult<Vec<(String, String)>> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in parameter.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if in_quotes {
        return Err(TaggerError::ConfigError(format!(
            "unbalanced quotes in parameter '{parameter}'"
        )));
    }
    items.push(current);

    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(TaggerError::ConfigError(format!(
                "malformed option '{item}', expected key=value"
            ))),
        })
        .collect()
}

/// Turn `bson+"-" json+"a+b"` into `bson:"-" json:"a+b"`
fn decode_tag_parameter(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut in_quotes = false;
    let mut escaped = false;

    for c in value.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '+' if !in_quotes => {
                decoded.push(':');
                continue;
            }
            _ => {}
        }
        decoded.push(c);
    }
    decoded
}


#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
