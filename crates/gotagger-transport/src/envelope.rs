//! Plugin request and response types
//!
//! [`PluginRequest`] is the decoded request in schema-model form;
//! [`PluginResponse`] is either a set of files or an error, never both.

use gotagger_core::{ExclusiveGroup, OutputFile, SchemaField, SchemaFile, SchemaRecord, TaggerError};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::CodecError;
use crate::descriptor::{
    CodeGeneratorRequest, CodeGeneratorResponse, DescriptorProto, FileDescriptorProto,
    GeneratedFile,
};
use crate::extension::{TAGS_EXTENSION, extension_string};

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`
pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// A decoded plugin request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRequest {
    /// Raw protoc parameter string
    #[serde(default)]
    pub parameter: String,

    /// Files protoc asked the plugin to process
    #[serde(default)]
    pub files_to_generate: Vec<String>,

    /// Every file in the compilation
    #[serde(default)]
    pub files: Vec<SchemaFile>,
}

impl PluginRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter string
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = parameter.into();
        self
    }

    /// Add a schema file and request generation for it
    pub fn with_generated_file(mut self, file: SchemaFile) -> Self {
        self.files_to_generate.push(file.name.clone());
        self.files.push(file);
        self
    }

    /// Add a schema file that is only a dependency
    pub fn with_dependency(mut self, file: SchemaFile) -> Self {
        self.files.push(file);
        self
    }

    /// Convert a wire request, reading tag extensions from field and oneof
    /// options
    pub fn from_descriptor(request: CodeGeneratorRequest) -> Result<Self, CodecError> {
        let files = request
            .proto_file
            .iter()
            .map(schema_file)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            parameter: request.parameter.unwrap_or_default(),
            files_to_generate: request.file_to_generate,
            files,
        })
    }
}

fn schema_file(file: &FileDescriptorProto) -> Result<SchemaFile, CodecError> {
    let name = file.name.clone().unwrap_or_default();
    let records = file
        .message_type
        .iter()
        .map(|message| schema_record(&[], message))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| in_file(&name, e))?;

    Ok(SchemaFile {
        syntax: file.syntax.clone().filter(|s| !s.is_empty()),
        package: file.package.clone(),
        go_package: file.options.as_ref().and_then(|o| o.go_package.clone()),
        name,
        records,
    })
}

fn schema_record(parents: &[&str], message: &DescriptorProto) -> Result<SchemaRecord, CodecError> {
    let name = message.name.clone().unwrap_or_default();
    let path = parents
        .iter()
        .copied()
        .chain(std::iter::once(name.as_str()))
        .collect::<Vec<_>>();
    let qualified = path.join(".");

    let mut groups = message
        .oneof_decl
        .iter()
        .map(|oneof| {
            let oneof_name = oneof.name.clone().unwrap_or_default();
            let annotation = options_extension(oneof.options.as_deref()).map_err(|e| {
                in_element(&format!("oneof '{qualified}.{oneof_name}'"), e)
            })?;
            Ok(ExclusiveGroup {
                name: oneof_name,
                annotation,
                synthetic: false,
            })
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    let mut fields = Vec::with_capacity(message.field.len());
    for field in &message.field {
        let field_name = field.name.clone().unwrap_or_default();
        let annotation = options_extension(field.options.as_deref())
            .map_err(|e| in_element(&format!("field '{qualified}.{field_name}'"), e))?;
        let group = field.oneof_index.and_then(|i| usize::try_from(i).ok());

        if field.proto3_optional.unwrap_or(false) {
            if let Some(group) = group.and_then(|i| groups.get_mut(i)) {
                group.synthetic = true;
            }
        }
        if annotation.is_some() {
            trace!(field = %field_name, message = %qualified, "found tags option");
        }

        fields.push(SchemaField {
            name: field_name,
            group,
            annotation,
        });
    }

    let nested = message
        .nested_type
        .iter()
        .map(|nested| schema_record(&path, nested))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SchemaRecord {
        name,
        fields,
        groups,
        nested,
        map_entry: message
            .options
            .as_ref()
            .and_then(|o| o.map_entry)
            .unwrap_or(false),
    })
}

fn options_extension(options: Option<&[u8]>) -> Result<Option<String>, CodecError> {
    match options {
        Some(bytes) => extension_string(bytes, TAGS_EXTENSION),
        None => Ok(None),
    }
}

fn in_element(element: &str, err: CodecError) -> CodecError {
    match err {
        CodecError::InvalidExtension(msg) => {
            CodecError::InvalidExtension(format!("{element}: {msg}"))
        }
        other => other,
    }
}

fn in_file(name: &str, err: CodecError) -> CodecError {
    in_element(&format!("proto file '{name}'"), err)
}

/// Outcome of a plugin run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginResponse {
    /// Rewritten files, named relative to the output directory
    Files(Vec<OutputFile>),
    /// The run failed; no files are emitted
    Error(String),
}

impl PluginResponse {
    /// Create a success response
    pub fn files(files: Vec<OutputFile>) -> Self {
        PluginResponse::Files(files)
    }

    /// Create an error response from a tagger error
    pub fn from_error(error: &TaggerError) -> Self {
        PluginResponse::Error(error.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PluginResponse::Error(_))
    }

    /// Wire form of this response
    pub fn into_descriptor(self) -> CodeGeneratorResponse {
        let (error, file) = match self {
            PluginResponse::Files(files) => (
                None,
                files
                    .into_iter()
                    .map(|f| GeneratedFile {
                        name: Some(f.name),
                        insertion_point: None,
                        content: Some(f.content),
                    })
                    .collect(),
            ),
            PluginResponse::Error(msg) => (Some(msg), Vec::new()),
        };

        CodeGeneratorResponse {
            error,
            supported_features: Some(FEATURE_PROTO3_OPTIONAL),
            file,
        }
    }
}

impl From<TaggerError> for PluginResponse {
    fn from(error: TaggerError) -> Self {
        PluginResponse::from_error(&error)
    }
}
