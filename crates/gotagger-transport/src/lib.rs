//! gotagger-transport - protoc plugin protocol and codecs
//!
//! This crate provides:
//! - [`descriptor`], the prost mirror of the plugin request and response
//! - [`extension_string`] for reading custom option extensions
//! - [`PluginRequest`] and [`PluginResponse`] in schema-model form
//! - [`Codec`] with [`ProtobufCodec`] and [`JsonCodec`] implementations

mod codec;
pub mod descriptor;
mod envelope;
mod extension;

pub use codec::{Codec, CodecError, JsonCodec, ProtobufCodec};
pub use envelope::{FEATURE_PROTO3_OPTIONAL, PluginRequest, PluginResponse};
pub use extension::{TAGS_EXTENSION, extension_string};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Codec, CodecError, JsonCodec, PluginRequest, PluginResponse, ProtobufCodec};
}
