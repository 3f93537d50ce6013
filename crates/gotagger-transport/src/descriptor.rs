//! Wire mirror of the protoc plugin protocol
//!
//! Only the fields the tagger reads are declared; prost skips the rest.
//! Field and oneof options are kept as raw bytes so custom extensions can
//! be read from them with [`extension_string`](crate::extension_string).

/// `google.protobuf.compiler.CodeGeneratorRequest`
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,

    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,

    /// Every file in the compilation, dependencies first
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

/// `google.protobuf.FileDescriptorProto`
#[derive(Clone, PartialEq, prost::Message)]
pub struct FileDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,

    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,

    #[prost(message, optional, tag = "8")]
    pub options: Option<FileOptions>,

    #[prost(string, optional, tag = "12")]
    pub syntax: Option<String>,
}

/// `google.protobuf.FileOptions`
#[derive(Clone, PartialEq, prost::Message)]
pub struct FileOptions {
    #[prost(string, optional, tag = "11")]
    pub go_package: Option<String>,
}

/// `google.protobuf.DescriptorProto`
#[derive(Clone, PartialEq, prost::Message)]
pub struct DescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(message, repeated, tag = "2")]
    pub field: Vec<FieldDescriptorProto>,

    #[prost(message, repeated, tag = "3")]
    pub nested_type: Vec<DescriptorProto>,

    #[prost(message, optional, tag = "7")]
    pub options: Option<MessageOptions>,

    #[prost(message, repeated, tag = "8")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
}

/// `google.protobuf.MessageOptions`
#[derive(Clone, PartialEq, prost::Message)]
pub struct MessageOptions {
    #[prost(bool, optional, tag = "7")]
    pub map_entry: Option<bool>,
}

/// `google.protobuf.FieldDescriptorProto`
#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    /// Encoded `FieldOptions`
    #[prost(bytes = "vec", optional, tag = "8")]
    pub options: Option<Vec<u8>>,

    #[prost(int32, optional, tag = "9")]
    pub oneof_index: Option<i32>,

    #[prost(bool, optional, tag = "17")]
    pub proto3_optional: Option<bool>,
}

/// `google.protobuf.OneofDescriptorProto`
#[derive(Clone, PartialEq, prost::Message)]
pub struct OneofDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    /// Encoded `OneofOptions`
    #[prost(bytes = "vec", optional, tag = "2")]
    pub options: Option<Vec<u8>>,
}

/// `google.protobuf.compiler.CodeGeneratorResponse`
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorResponse {
    #[prost(string, optional, tag = "1")]
    pub error: Option<String>,

    #[prost(uint64, optional, tag = "2")]
    pub supported_features: Option<u64>,

    #[prost(message, repeated, tag = "15")]
    pub file: Vec<GeneratedFile>,
}

/// `google.protobuf.compiler.CodeGeneratorResponse.File`
#[derive(Clone, PartialEq, prost::Message)]
pub struct GeneratedFile {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,

    #[prost(string, optional, tag = "2")]
    pub insertion_point: Option<String>,

    #[prost(string, optional, tag = "15")]
    pub content: Option<String>,
}
