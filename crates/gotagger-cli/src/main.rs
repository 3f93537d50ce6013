//! protoc-gen-gotagger - protoc plugin injecting Go struct tags
//!
//! protoc runs it with a `CodeGeneratorRequest` on stdin and reads the
//! `CodeGeneratorResponse` from stdout:
//!
//! ```text
//! protoc --go_out=. --gotagger_out=xxx=bson+"-",output_path=.:. api/*.proto
//! ```
//!
//! Failures inside the run are reported through the response; the process
//! exits non-zero only when no response can be written.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gotagger::{
    Codec, FsSourceLoader, JsonCodec, PluginRequest, PluginResponse, ProtobufCodec, TaggerConfig,
    TaggerResult, handle,
};
use tracing::{debug, error};

mod logging;
mod settings;

#[derive(Parser)]
#[command(name = "protoc-gen-gotagger")]
#[command(author, version, about = "protoc plugin injecting Go struct tags", long_about = None)]
struct Cli {
    /// Read the request from this file instead of stdin
    #[arg(long, value_name = "FILE")]
    debug: Option<PathBuf>,

    /// Save the raw request to this file before processing it
    #[arg(long, value_name = "FILE")]
    dump_request: Option<PathBuf>,

    /// Encoding of the request and the response
    #[arg(long, value_enum, default_value_t = Format::Protobuf)]
    format: Format,

    /// TOML file with configuration defaults (the protoc parameter overrides it)
    #[arg(long, value_name = "FILE", env = "GOTAGGER_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter written to stderr (e.g. `info`, `gotagger_rewrite=debug`)
    #[arg(long, value_name = "FILTER", env = "GOTAGGER_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Protobuf wire format, as protoc sends it
    Protobuf,
    /// JSON in schema-model shape, for fixtures
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let input = read_input(cli.debug.as_deref())?;
    if let Some(path) = &cli.dump_request {
        fs::write(path, &input)
            .with_context(|| format!("Failed to write request dump: {}", path.display()))?;
        debug!(path = %path.display(), bytes = input.len(), "dumped request");
    }

    let codec: Box<dyn Codec> = match cli.format {
        Format::Protobuf => Box::new(ProtobufCodec::new()),
        Format::Json => Box::new(JsonCodec::pretty()),
    };

    let response = match prepare(codec.as_ref(), &input, cli.config.as_deref()) {
        Ok((request, base)) => handle(&request, &base, &FsSourceLoader::new()),
        Err(e) => {
            error!(code = e.error_code(), error = %e, "cannot start tagging");
            PluginResponse::from_error(&e)
        }
    };

    let bytes = codec
        .encode_response(&response)
        .context("Failed to encode response")?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .context("Failed to write response")?;

    Ok(())
}

fn read_input(debug: Option<&Path>) -> Result<Vec<u8>> {
    match debug {
        Some(path) => fs::read(path)
            .with_context(|| format!("Failed to open debug file: {}", path.display())),
        None => {
            let mut input = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut input)
                .context("Failed to read request from stdin")?;
            Ok(input)
        }
    }
}

/// Decode the request and load configuration defaults
fn prepare(
    codec: &dyn Codec,
    input: &[u8],
    config: Option<&Path>,
) -> TaggerResult<(PluginRequest, TaggerConfig)> {
    let base = match config {
        Some(path) => settings::load(path)?,
        None => TaggerConfig::new(),
    };
    let request = codec.decode_request(input)?;
    debug!(
        format = codec.content_type(),
        files = request.files.len(),
        generate = request.files_to_generate.len(),
        "decoded request"
    );
    Ok((request, base))
}
