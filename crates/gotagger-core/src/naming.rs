//! Go identifier naming used by protoc-gen-go.
//!
//! Generated structs and fields are matched by name, so these rules must
//! agree with the generator that produced the `.pb.go` files.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `["Outer"]` + `inner` | [`go_struct_name`] | `OuterInner` |
//! | `["Outer"]` + `Inner` | [`go_struct_name`] | `Outer_Inner` |
//! | `_value_x` | [`go_field_name`] | `XValueX` |
//! | `["Outer"]` + `Inner` | [`message_path`] | `Outer.Inner` |

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use gotagger_core::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize("World"), "World");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Go struct name of a message nested under `parents`.
///
/// A segment starting with a lowercase letter is capitalized and appended
/// directly; a segment that was already capitalized is joined with `_`.
///
/// # Examples
///
/// ```
/// use gotagger_core::naming::go_struct_name;
///
/// assert_eq!(go_struct_name(&[], "Event"), "Event");
/// assert_eq!(go_struct_name(&["Outer".into()], "inner"), "OuterInner");
/// assert_eq!(go_struct_name(&["Outer".into()], "Inner"), "Outer_Inner");
/// ```
pub fn go_struct_name(parents: &[String], name: &str) -> String {
    let mut result = String::new();

    for segment in parents.iter().map(String::as_str).chain([name]) {
        let Some(first) = segment.chars().next() else {
            continue;
        };
        let capitalized = first.is_lowercase();
        if !result.is_empty() && !capitalized {
            result.push('_');
        }
        result.push_str(&capitalize(segment));
    }

    result
}

/// Go field name of a message field.
///
/// # Examples
///
/// ```
/// use gotagger_core::naming::go_field_name;
///
/// assert_eq!(go_field_name("display_name"), "DisplayName");
/// assert_eq!(go_field_name("__val2_value"), "XVal2Value");
/// ```
pub fn go_field_name(name: &str) -> String {
    let mut result = String::new();
    if name.starts_with('_') {
        result.push('X');
    }
    for segment in name.split('_').filter(|s| !s.is_empty()) {
        result.push_str(&capitalize(segment));
    }
    result
}

/// Dotted schema path of a message, for logs and error context.
pub fn message_path(parents: &[String], name: &str) -> String {
    let mut path = String::new();
    for parent in parents {
        path.push_str(parent);
        path.push('.');
    }
    path.push_str(name);
    path
}
