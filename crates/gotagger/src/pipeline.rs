//! Walk-then-rewrite driver

use std::collections::BTreeMap;

use gotagger_core::{OutputFile, TaggerConfig, TaggerResult, walk};
use gotagger_rewrite::rewrite;
use gotagger_transport::{PluginRequest, PluginResponse};
use tracing::{debug, error, info};

use crate::loader::SourceLoader;

/// Run the tagger over a request
///
/// `base` supplies configuration defaults; the request parameter overrides
/// them. Generated files are read through `loader` from the configured
/// output path. The first error aborts the run.
pub fn process(
    request: &PluginRequest,
    base: &TaggerConfig,
    loader: &dyn SourceLoader,
) -> TaggerResult<Vec<OutputFile>> {
    let config = base.clone().with_parameter(&request.parameter)?;
    debug!(
        output_path = %config.output_path.display(),
        paths = %config.paths,
        reserved_field_tags = %config.reserved_field_tags,
        "resolved configuration"
    );

    let map = walk(&request.files, &request.files_to_generate, &config)?;
    info!(files = map.len(), "computed struct tags");

    let mut sources = BTreeMap::new();
    for (name, _) in map.iter() {
        let path = config.output_path.join(name);
        match loader.load(&path)? {
            Some(text) => {
                sources.insert(name.to_string(), text);
            }
            None => debug!(path = %path.display(), "generated file not found"),
        }
    }

    rewrite(&sources, &map)
}

/// Run the tagger and package the outcome as a plugin response
pub fn handle(
    request: &PluginRequest,
    base: &TaggerConfig,
    loader: &dyn SourceLoader,
) -> PluginResponse {
    match process(request, base, loader) {
        Ok(files) => PluginResponse::files(files),
        Err(e) => {
            error!(code = e.error_code(), error = %e, "tagging failed");
            PluginResponse::from_error(&e)
        }
    }
}
