//! gotagger-core - Tag model, schema walk and target map
//!
//! This crate computes what a tagging run should write, without touching any
//! Go source:
//! - [`AnnotationSet`] for parsing, merging and printing struct tags
//! - [`walk`] for turning a schema into a [`TargetMap`]
//! - [`TaggerConfig`] for plugin options
//! - [`TaggerError`] for error handling

mod annotation;
mod config;
mod error;
pub mod naming;
mod schema;
mod target;
mod walker;

pub use annotation::{AnnotationEntry, AnnotationSet};
pub use config::{PathsMode, RESERVED_FIELDS, TaggerConfig};
pub use error::{TaggerError, TaggerResult};
pub use schema::{ExclusiveGroup, SUPPORTED_SYNTAX, SchemaField, SchemaFile, SchemaRecord};
pub use target::{OutputFile, TargetFile, TargetMap, TargetStructure};
pub use walker::{resolve_field, walk};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnnotationEntry, AnnotationSet, OutputFile, SchemaField, SchemaFile, SchemaRecord,
        TaggerConfig, TaggerError, TaggerResult, TargetMap, walk,
    };
}
