//! Runs the plugin binary the way protoc does

#![allow(non_snake_case)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use gotagger_transport::descriptor::{
    CodeGeneratorRequest, CodeGeneratorResponse, DescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};
use prost::Message;
use tempfile::TempDir;

const USER_PB: &str = "package userpb

type User struct {
\tId            string `json:\"id,omitempty\"`
\tXXX_sizecache int32
}
";

#[derive(Clone, PartialEq, prost::Message)]
struct TagOptions {
    #[prost(string, optional, tag = "847939")]
    tags: Option<String>,
}

fn request(parameter: &str, syntax: &str) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["user.proto".to_string()],
        parameter: Some(parameter.to_string()),
        proto_file: vec![FileDescriptorProto {
            name: Some("user.proto".to_string()),
            syntax: Some(syntax.to_string()),
            message_type: vec![DescriptorProto {
                name: Some("User".to_string()),
                field: vec![FieldDescriptorProto {
                    name: Some("id".to_string()),
                    options: Some(
                        TagOptions {
                            tags: Some(r#"db:"user_id""#.to_string()),
                        }
                        .encode_to_vec(),
                    ),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }],
    }
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("user.pb.go"), USER_PB).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_protoc-gen-gotagger"))
        .args(args)
        .current_dir(dir)
        .env_remove("GOTAGGER_CONFIG")
        .env_remove("GOTAGGER_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

fn decode(output: &Output) -> CodeGeneratorResponse {
    assert!(
        output.status.success(),
        "plugin failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    CodeGeneratorResponse::decode(output.stdout.as_slice()).unwrap()
}

#[test]
fn protoc_gen_gotagger___stdin_request___rewritten_file_on_stdout() {
    let dir = workspace();

    let output = run(
        dir.path(),
        &[],
        &request(r#"xxx=bson+"-""#, "proto3").encode_to_vec(),
    );
    let response = decode(&output);

    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(1));
    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name.as_deref(), Some("user.pb.go"));
    let content = response.file[0].content.as_deref().unwrap();
    assert!(content.contains(r#"`json:"id,omitempty" db:"user_id"`"#));
    assert!(content.contains("XXX_sizecache int32  `bson:\"-\"`"));
    assert_eq!(fs::read_to_string(dir.path().join("user.pb.go")).unwrap(), USER_PB);
}

#[test]
fn protoc_gen_gotagger___debug_file___read_instead_of_stdin() {
    let dir = workspace();
    let saved = dir.path().join("request.bin");
    fs::write(&saved, request("", "proto3").encode_to_vec()).unwrap();

    let output = run(dir.path(), &["--debug", saved.to_str().unwrap()], b"");
    let response = decode(&output);

    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 1);
}

#[test]
fn protoc_gen_gotagger___dump_request___raw_bytes_saved() {
    let dir = workspace();
    let dump = dir.path().join("dump.bin");
    let bytes = request("", "proto3").encode_to_vec();

    let output = run(dir.path(), &["--dump-request", dump.to_str().unwrap()], &bytes);
    decode(&output);

    assert_eq!(fs::read(&dump).unwrap(), bytes);
}

#[test]
fn protoc_gen_gotagger___tagging_error___reported_in_response_with_success_exit() {
    let dir = workspace();

    let output = run(dir.path(), &[], &request("", "proto2").encode_to_vec());
    let response = decode(&output);

    assert!(response.file.is_empty());
    assert!(response.error.unwrap().starts_with("schema error: "));
}

#[test]
fn protoc_gen_gotagger___undecodable_request___error_response() {
    let dir = workspace();

    let output = run(dir.path(), &[], &[0xff, 0xff, 0xff]);
    let response = decode(&output);

    assert!(response.error.unwrap().starts_with("serialization error: "));
}

#[test]
fn protoc_gen_gotagger___config_file___defaults_overridden_by_parameter() {
    let dir = workspace();
    let config = dir.path().join("gotagger.toml");
    fs::write(&config, "xxx = 'bson:\"-\"'\noutput_path = \"missing\"\n").unwrap();

    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap()],
        &request("output_path=.", "proto3").encode_to_vec(),
    );
    let response = decode(&output);

    let content = response.file[0].content.as_deref().unwrap();
    assert!(content.contains("XXX_sizecache int32  `bson:\"-\"`"));
}

#[test]
fn protoc_gen_gotagger___bad_config_file___error_response() {
    let dir = workspace();
    let config = dir.path().join("gotagger.toml");
    fs::write(&config, "unknown = 1\n").unwrap();

    let output = run(
        dir.path(),
        &["--config", config.to_str().unwrap()],
        &request("", "proto3").encode_to_vec(),
    );
    let response = decode(&output);

    assert!(response.error.unwrap().starts_with("configuration error: config file '"));
}

#[test]
fn protoc_gen_gotagger___json_format___json_response() {
    let dir = workspace();
    let request = r#"{
        "parameter": "",
        "files_to_generate": ["user.proto"],
        "files": [{
            "name": "user.proto",
            "syntax": "proto3",
            "records": [{"name": "User", "fields": [{"name": "id", "annotation": "db:\"user_id\""}]}]
        }]
    }"#;

    let output = run(dir.path(), &["--format", "json"], request.as_bytes());

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["files"][0]["name"], "user.pb.go");
    let content = response["files"][0]["content"].as_str().unwrap();
    assert!(content.contains(r#"db:"user_id""#));
}

#[test]
fn protoc_gen_gotagger___missing_debug_file___nonzero_exit() {
    let dir = workspace();

    let output = run(dir.path(), &["--debug", "absent.bin"], b"");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
