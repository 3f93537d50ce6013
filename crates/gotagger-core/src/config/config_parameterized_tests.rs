#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Parameterized paths option tests
// ============================================================================

#[test_case("paths=source_relative", PathsMode::SourceRelative)]
#[test_case("paths=import", PathsMode::Import)]
#[test_case(" paths = import ", PathsMode::Import ; "surrounding whitespace")]
fn TaggerConfig___paths_option___parses_mode(parameter: &str, expected: PathsMode) {
    let config = TaggerConfig::from_parameter(parameter).unwrap();

    assert_eq!(config.paths, expected);
}

#[test_case(PathsMode::SourceRelative, "source_relative")]
#[test_case(PathsMode::Import, "import")]
fn PathsMode___display___matches_parameter_spelling(mode: PathsMode, expected: &str) {
    assert_eq!(mode.to_string(), expected);
    assert_eq!(expected.parse::<PathsMode>().unwrap(), mode);
}

// ============================================================================
// Parameterized malformed parameter tests
// ============================================================================

#[test_case("output_path" ; "missing equals")]
#[test_case("=value" ; "empty key")]
#[test_case("output_path=" ; "empty output path")]
#[test_case("paths=relative" ; "invalid paths value")]
#[test_case("xxx=json+-" ; "unquoted tag value")]
#[test_case("M=foo.proto=bar" ; "unknown key")]
fn TaggerConfig___malformed_parameter___fails_with_config_error(parameter: &str) {
    let err = TaggerConfig::from_parameter(parameter).unwrap_err();

    assert!(matches!(err, TaggerError::ConfigError(_)), "got {err:?}");
}

// ============================================================================
// Parameterized separator tests
// ============================================================================

#[test_case("output_path=a,paths=import" ; "plain")]
#[test_case("output_path=a,,paths=import," ; "empty items")]
#[test_case(" output_path=a , paths=import " ; "padded items")]
fn TaggerConfig___separators___tolerated(parameter: &str) {
    let config = TaggerConfig::from_parameter(parameter).unwrap();

    assert_eq!(config.output_path, PathBuf::from("a"));
    assert_eq!(config.paths, PathsMode::Import);
}
