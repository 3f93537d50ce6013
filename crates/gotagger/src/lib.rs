//! # gotagger
//!
//! Injects Go struct tags into files generated by `protoc-gen-go`, driven by
//! a custom option on proto fields and oneofs:
//!
//! ```protobuf
//! import "tagger/tagger.proto";
//!
//! message User {
//!   string id = 1 [(tagger.tags) = "db:\"user_id\" bson:\"_id\""];
//!   oneof contact {
//!     option (tagger.oneof_tags) = "graphql:\"contact\"";
//!     string email = 2;
//!   }
//! }
//! ```
//!
//! Run it after `protoc-gen-go`, pointing it at the same output:
//!
//! ```text
//! protoc --go_out=. --gotagger_out=xxx=bson+"-",output_path=.:. user.proto
//! ```
//!
//! Existing tags win over computed ones; computed entries fill what is
//! missing. `xxx` sets tags for the `XXX_` fields of every message.
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`gotagger_core`] - Tag model, schema walk and configuration
//! - [`gotagger_rewrite`] - Go source parsing and tag splicing
//! - [`gotagger_transport`] - protoc plugin protocol and codecs

mod loader;
mod pipeline;

pub use loader::{FsSourceLoader, SourceLoader};
pub use pipeline::{handle, process};

// Re-export core types
pub use gotagger_core::{
    AnnotationEntry, AnnotationSet, OutputFile, PathsMode, SchemaFile, SchemaRecord, TaggerConfig,
    TaggerError, TaggerResult, TargetMap, walk,
};

// Re-export rewriting
pub use gotagger_rewrite::{rewrite, rewrite_source};

// Re-export transport
pub use gotagger_transport::{
    Codec, CodecError, JsonCodec, PluginRequest, PluginResponse, ProtobufCodec,
};

/// Prelude module for convenient imports.
///
/// Use `use gotagger::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        Codec, FsSourceLoader, JsonCodec, PluginRequest, PluginResponse, ProtobufCodec,
        SourceLoader, TaggerConfig, TaggerError, TaggerResult, handle, process,
    };
}
