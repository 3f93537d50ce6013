#![allow(non_snake_case)]

use super::*;
use gotagger_core::TargetStructure;
use test_case::test_case;

fn rewrite_field(decl: &str, computed: &str) -> String {
    let source = format!("package p\n\ntype T struct {{\n\t{decl}\n}}\n");
    let mut structure = TargetStructure::new("T");
    structure.insert_field("F", AnnotationSet::parse(computed).unwrap());
    let mut file = TargetFile::new();
    file.insert(structure);

    let out = rewrite_source("t.go", &source, &file).unwrap();
    out.lines().nth(3).unwrap().trim_start().to_string()
}

// ============================================================================
// Merge precedence against an existing literal
// ============================================================================

#[test_case("F int", r#"json:"f""#, r#"F int `json:"f"`"# ; "no tag inserts")]
#[test_case("F int `json:\"f\"`", r#"json:"g""#, r#"F int `json:"f"`"# ; "existing value wins")]
#[test_case("F int `json:\"\"`", r#"json:"g""#, r#"F int `json:"g"`"# ; "empty value filled")]
#[test_case("F int `json:\"f\"`", r#"json:",omitempty""#, r#"F int `json:"f,omitempty"`"# ; "empty options filled")]
#[test_case("F int `json:\"f,string\"`", r#"json:",omitempty""#, r#"F int `json:"f,string"`"# ; "existing options win")]
#[test_case("F int `a:\"1\"`", r#"c:"3" b:"2""#, r#"F int `a:"1" c:"3" b:"2"`"# ; "new namespaces appended in order")]
#[test_case("F *Msg `a:\"1\"`", r#"b:"2""#, r#"F *Msg `a:"1" b:"2"`"# ; "pointer type")]
#[test_case("F []byte", r#"b:"2""#, r#"F []byte `b:"2"`"# ; "slice type")]
#[test_case("F map[string]int32", r#"b:"2""#, r#"F map[string]int32 `b:"2"`"# ; "map type")]
#[test_case("F isEvent_Kind `protobuf_oneof:\"kind\"`", r#"json:"kind""#, r#"F isEvent_Kind `protobuf_oneof:"kind" json:"kind"`"# ; "oneof interface field")]
fn rewrite_source___field_variants___expected_line(decl: &str, computed: &str, expected: &str) {
    assert_eq!(rewrite_field(decl, computed), expected);
}

// ============================================================================
// Literal quoting
// ============================================================================

#[test_case(r#"json:"a""#, r#"`json:"a"`"# ; "plain")]
#[test_case(r#"re:"a\\b""#, r#"`re:"a\\b"`"# ; "backslash stays raw")]
#[test_case(r#"x:"a\nb""#, r#"`x:"a\nb"`"# ; "escaped newline stays raw")]
#[test_case(r#"x:"a`b""#, r#""x:\"a`b\"""# ; "backtick forces quotes")]
fn tag_literal___content___quoted_form(raw: &str, expected: &str) {
    assert_eq!(tag_literal(&AnnotationSet::parse(raw).unwrap()), expected);
}
