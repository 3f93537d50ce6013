//! Codec trait with protobuf and JSON implementations

use gotagger_core::TaggerError;
use prost::Message;
use thiserror::Error;

use crate::descriptor::CodeGeneratorRequest;
use crate::envelope::{PluginRequest, PluginResponse};

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A custom option extension could not be read
    #[error("invalid extension: {0}")]
    InvalidExtension(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

impl From<prost::DecodeError> for CodecError {
    fn from(err: prost::DecodeError) -> Self {
        CodecError::Deserialization(err.to_string())
    }
}

impl From<CodecError> for TaggerError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidExtension(msg) => TaggerError::SchemaError(msg),
            other => TaggerError::SerializationError(other.to_string()),
        }
    }
}

/// Trait for plugin message encoding and decoding
pub trait Codec {
    /// Decode a plugin request
    fn decode_request(&self, data: &[u8]) -> Result<PluginRequest, CodecError>;

    /// Encode a plugin response
    fn encode_response(&self, response: &PluginResponse) -> Result<Vec<u8>, CodecError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &'static str;
}

/// The protobuf wire format protoc speaks
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl ProtobufCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for ProtobufCodec {
    fn decode_request(&self, data: &[u8]) -> Result<PluginRequest, CodecError> {
        let request = CodeGeneratorRequest::decode(data)?;
        PluginRequest::from_descriptor(request)
    }

    fn encode_response(&self, response: &PluginResponse) -> Result<Vec<u8>, CodecError> {
        Ok(response.clone().into_descriptor().encode_to_vec())
    }

    fn content_type(&self) -> &'static str {
        "application/x-protobuf"
    }
}

/// JSON codec implementation using serde_json
///
/// Requests are read in the schema-model shape of [`PluginRequest`], which
/// makes hand-written fixtures practical.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    /// Whether to pretty-print output (default: false for efficiency)
    pretty: bool,
}

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a JSON codec that pretty-prints output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn decode_request(&self, data: &[u8]) -> Result<PluginRequest, CodecError> {
        serde_json::from_slice(data).map_err(Into::into)
    }

    fn encode_response(&self, response: &PluginResponse) -> Result<Vec<u8>, CodecError> {
        if self.pretty {
            serde_json::to_vec_pretty(response).map_err(Into::into)
        } else {
            serde_json::to_vec(response).map_err(Into::into)
        }
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
