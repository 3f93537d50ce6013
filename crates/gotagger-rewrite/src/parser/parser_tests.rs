#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

const GENERATED: &str = r#"// Code generated by protoc-gen-go. DO NOT EDIT.

package userpb

import (
	protoreflect "google.golang.org/protobuf/reflect/protoreflect"
	protoimpl "google.golang.org/protobuf/runtime/protoimpl"
)

type User struct {
	state         protoimpl.MessageState
	sizeCache     protoimpl.SizeCache
	unknownFields protoimpl.UnknownFields

	Id    string `protobuf:"bytes,1,opt,name=id,proto3" json:"id,omitempty"`
	Email string `protobuf:"bytes,2,opt,name=email,proto3" json:"email,omitempty"`
}

func (x *User) GetId() string {
	if x != nil {
		return x.Id
	}
	return ""
}
"#;

fn parse(source: &str) -> SourceFile {
    parse_file("user.pb.go", source).unwrap()
}

fn field<'a>(decl: &'a StructDecl, name: &str) -> &'a FieldDecl {
    decl.fields
        .iter()
        .find(|f| f.names.first().map(String::as_str) == Some(name))
        .unwrap()
}

// ============================================================================
// Package clause and declarations
// ============================================================================

#[test]
fn parse_file___generated_file___package_and_struct_found() {
    let file = parse(GENERATED);

    assert_eq!(file.package, "userpb");
    assert_eq!(file.structs.len(), 1);
    assert_eq!(file.structs[0].name, "User");
    assert_eq!(file.structs[0].line, 10);
}

#[test]
fn parse_file___generated_file___all_direct_fields_listed() {
    let file = parse(GENERATED);

    let names: Vec<_> = file.structs[0]
        .fields
        .iter()
        .map(|f| f.names.join(","))
        .collect();

    assert_eq!(names, vec!["state", "sizeCache", "unknownFields", "Id", "Email"]);
}

#[test]
fn parse_file___field_with_tag___tag_span_covers_literal() {
    let file = parse(GENERATED);
    let id = field(&file.structs[0], "Id");

    let tag = id.tag.as_ref().unwrap();

    assert!(tag.raw);
    assert_eq!(
        &GENERATED[tag.start..tag.end],
        r#"`protobuf:"bytes,1,opt,name=id,proto3" json:"id,omitempty"`"#
    );
    assert_eq!(
        tag.value.as_deref(),
        Some(r#"protobuf:"bytes,1,opt,name=id,proto3" json:"id,omitempty""#)
    );
}

#[test]
fn parse_file___field_without_tag___type_end_after_type() {
    let file = parse(GENERATED);
    let state = field(&file.structs[0], "state");

    assert!(state.tag.is_none());
    assert!(GENERATED[..state.type_end].ends_with("protoimpl.MessageState"));
}

#[test]
fn parse_file___grouped_type_specs___structs_found() {
    let source = "package p\n\ntype (\n\tA struct{ X int }\n\tN int\n\tB struct {\n\t\tY string\n\t}\n)\n";

    let names: Vec<_> = parse(source).structs.into_iter().map(|s| s.name).collect();

    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn parse_file___struct_inside_function___found() {
    let source = "package p\n\nfunc f() {\n\ttype local struct {\n\t\tV int\n\t}\n\t_ = local{}\n}\n";

    let file = parse(source);

    assert_eq!(file.structs.len(), 1);
    assert_eq!(file.structs[0].name, "local");
}

#[test]
fn parse_file___type_switch___not_taken_for_declaration() {
    let source = "package p\n\nfunc f(x any) {\n\tswitch x.(type) {\n\t}\n}\n\ntype T struct{ A int }\n";

    let names: Vec<_> = parse(source).structs.into_iter().map(|s| s.name).collect();

    assert_eq!(names, vec!["T"]);
}

#[test]
fn parse_file___generic_struct___type_parameters_skipped() {
    let source = "package p\n\ntype Pair[K comparable, V any] struct {\n\tKey K\n\tVal V\n}\n";

    let file = parse(source);

    assert_eq!(file.structs[0].name, "Pair");
    assert_eq!(file.structs[0].fields.len(), 2);
}

#[test]
fn parse_file___array_of_struct_type___not_a_struct_decl() {
    let source = "package p\n\ntype Grid [N]struct{ A int }\n\ntype T struct{ B int }\n";

    let names: Vec<_> = parse(source).structs.into_iter().map(|s| s.name).collect();

    assert_eq!(names, vec!["T"]);
}

#[test]
fn parse_file___non_struct_types___skipped() {
    let source = "package p\n\ntype F func(a int) (b, c int)\ntype I interface {\n\tM()\n}\ntype S struct{}\n";

    let file = parse(source);

    assert_eq!(file.structs.len(), 1);
    assert!(file.structs[0].fields.is_empty());
}

// ============================================================================
// Field shapes
// ============================================================================

#[test_case("Base", &[] ; "embedded type")]
#[test_case("*Base", &[] ; "embedded pointer")]
#[test_case("sync.Mutex", &[] ; "embedded qualified type")]
#[test_case("List[int]", &[] ; "embedded generic")]
#[test_case("Name string", &["Name"] ; "single name")]
#[test_case("A, B int", &["A", "B"] ; "name list")]
#[test_case("Grid [3]int", &["Grid"] ; "array field")]
#[test_case("Fn func(int) error", &["Fn"] ; "func field")]
#[test_case("M map[string]int", &["M"] ; "map field")]
#[test_case("Base `json:\"base\"`", &[] ; "embedded with tag")]
fn parse_file___field_shapes___names_extracted(decl: &str, expected: &[&str]) {
    let source = format!("package p\n\ntype T struct {{\n\t{decl}\n}}\n");

    let file = parse_file("t.go", &source).unwrap();
    let fields = &file.structs[0].fields;

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].names, expected);
    assert_eq!(fields[0].is_embedded(), expected.is_empty());
}

#[test]
fn parse_file___nested_anonymous_struct___inner_fields_not_direct() {
    let source = "package p\n\ntype Outer struct {\n\tInner struct {\n\t\tDeep string `json:\"deep\"`\n\t}\n\tFlat int\n}\n";

    let file = parse(source);
    let fields = &file.structs[0].fields;

    let names: Vec<_> = fields.iter().map(|f| f.names.join(",")).collect();
    assert_eq!(names, vec!["Inner", "Flat"]);
    assert!(fields[0].tag.is_none());
    assert!(source[..fields[0].type_end].ends_with('}'));
}

#[test]
fn parse_file___single_line_struct___fields_split_on_semicolons() {
    let source = "package p\ntype T struct{ A int; B string `x:\"y\"` }\n";

    let file = parse(source);
    let fields = &file.structs[0].fields;

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].tag.as_ref().unwrap().value.as_deref(), Some(r#"x:"y""#));
}

#[test]
fn parse_file___interpreted_string_tag___escapes_decoded() {
    let source = "package p\ntype T struct {\n\tA int \"json:\\\"a\\\"\"\n}\n";

    let file = parse(source);
    let tag = file.structs[0].fields[0].tag.as_ref().unwrap();

    assert!(!tag.raw);
    assert_eq!(tag.value.as_deref(), Some(r#"json:"a""#));
}

#[test]
fn parse_file___raw_tag_with_carriage_return___carriage_return_dropped() {
    let source = "package p\ntype T struct {\n\tA int `json:\"a\"\r`\n}\n";

    let file = parse(source);

    assert_eq!(
        file.structs[0].fields[0].tag.as_ref().unwrap().value.as_deref(),
        Some(r#"json:"a""#)
    );
}

#[test]
fn parse_file___tag_escape_spelling_non_utf8_byte___parsed_without_value() {
    let source = "package p\ntype T struct {\n\tA int \"x:\\\"\\xff\\\"\"\n}\n";

    let file = parse(source);
    let tag = file.structs[0].fields[0].tag.as_ref().unwrap();

    assert!(!tag.raw);
    assert_eq!(tag.value, None);
}

// ============================================================================
// unquote
// ============================================================================

#[test_case(r"plain", "plain" ; "no escapes")]
#[test_case(r#"a\"b"#, "a\"b" ; "quote")]
#[test_case(r"\t\n\\", "\t\n\\" ; "simple escapes")]
#[test_case(r"\x41\101", "AA" ; "hex and octal")]
#[test_case(r"caf\u00e9", "café" ; "unicode")]
#[test_case(r"\U0001F600", "\u{1F600}" ; "long unicode")]
#[test_case(r"\xc3\xa9", "é" ; "utf8 bytes")]
fn unquote___valid_escapes___decoded(body: &str, expected: &str) {
    assert_eq!(unquote(body).unwrap(), expected.as_bytes());
}

#[test_case(r"\xff", &[0xff] ; "hex")]
#[test_case(r"\377", &[0xff] ; "octal")]
#[test_case(r"a\x80b", &[b'a', 0x80, b'b'] ; "between text")]
fn unquote___byte_escape_above_ascii___byte_kept(body: &str, expected: &[u8]) {
    assert_eq!(unquote(body).unwrap(), expected);
}

#[test_case(r"\q" ; "unknown escape")]
#[test_case(r"\x4" ; "short hex")]
#[test_case(r"\777" ; "octal out of range")]
#[test_case(r"\uD800" ; "surrogate")]
fn unquote___invalid_escapes___error(body: &str) {
    assert!(unquote(body).is_err());
}

// ============================================================================
// Errors
// ============================================================================

#[test_case("type T struct{}\n", "t.go:1:1: expected 'package' clause" ; "missing package")]
#[test_case("package\n", "t.go:2:1: expected package name" ; "missing package name")]
#[test_case("package p\ntype T struct {\n", "t.go:2:15: '{' is never closed" ; "unclosed brace")]
#[test_case("package p\nfunc f() {)\n", "t.go:2:11: unexpected ')'" ; "mismatched bracket")]
#[test_case("package p\ntype T struct {\n\tA int \"\\q\"\n}\n", "t.go:3:8: invalid tag: unknown escape sequence '\\q'" ; "bad tag escape")]
fn parse_file___malformed_source___target_parse_error(source: &str, expected: &str) {
    let err = parse_file("t.go", source).unwrap_err();

    assert_eq!(err, TaggerError::TargetParseError(expected.to_string()));
}

#[test]
fn parse_file___lexer_error___propagated() {
    let err = parse_file("t.go", "package p\nvar s = \"open\n").unwrap_err();

    assert_eq!(err.error_code(), 4);
}
