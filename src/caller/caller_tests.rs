//! Tests for caller label resolution.

use super::*;

#[test]
fn no_caller_resolves_to_null() {
    let resolver = CallerResolver::default();
    assert_eq!(resolver.resolve(None, 40), Ok("null".to_string()));
}

#[test]
fn named_function_resolves_to_its_name() {
    let resolver = CallerResolver::default();
    let func = FunctionRef::named("someName");
    assert_eq!(resolver.resolve(Some(&func), 40), Ok("someName".to_string()));
}

#[test]
fn unnamed_function_resolves_to_collapsed_snippet() {
    let resolver = CallerResolver::default();
    let func = FunctionRef::new("|console| {\n        console.debug(foo, \"asdf\");\n    }");

    let full = resolver.resolve(Some(&func), 80).unwrap();
    let clipped = resolver.resolve(Some(&func), 40).unwrap();

    assert_eq!(full, "|console| { console.debug(foo, \"asdf\"); }");
    assert_eq!(clipped, "|console| { console.debug(foo, \"asdf\"); ");
}

#[test]
fn snippet_length_bounds_the_label() {
    let resolver = CallerResolver::default();
    let func = FunctionRef::new("|console| {   console.info(\"function name test\")   }");

    let label = resolver.resolve(Some(&func), 10).unwrap();

    assert_eq!(label, "|console| ");
}

#[test]
fn source_is_scanned_only_up_to_the_limit() {
    let resolver = CallerResolver::default();
    let long_source = "x".repeat(SOURCE_SCAN_LIMIT + 100);
    let func = FunctionRef::new(long_source);

    let label = resolver.resolve(Some(&func), 10_000).unwrap();

    assert_eq!(label.chars().count(), SOURCE_SCAN_LIMIT);
}

#[test]
fn strict_caller_cannot_be_inspected() {
    let resolver = CallerResolver::default();
    let func = FunctionRef::named("locked").strict();
    assert_eq!(
        resolver.resolve(Some(&func), 40),
        Err(IntrospectionError::StrictMode)
    );
}

#[test]
fn legacy_environment_parses_name_from_source() {
    let resolver = CallerResolver::new(LegacyNames);
    let func = FunctionRef::new("function   loadUser (id) { return id; }");
    assert_eq!(resolver.resolve(Some(&func), 40), Ok("loadUser".to_string()));
}

#[test]
fn legacy_environment_ignores_declared_name() {
    let resolver = CallerResolver::new(LegacyNames);
    let func = FunctionRef::new("fn from_source(x) { x }").with_name("declared");
    assert_eq!(
        resolver.resolve(Some(&func), 40),
        Ok("from_source".to_string())
    );
}

#[test]
fn legacy_environment_falls_back_to_snippet_for_anonymous_source() {
    let resolver = CallerResolver::new(LegacyNames);
    let func = FunctionRef::new("function () { go(); }");
    assert_eq!(
        resolver.resolve(Some(&func), 12),
        Ok("function () ".to_string())
    );
}

#[test]
fn collapse_keeps_a_single_space_per_run() {
    assert_eq!(collapse_whitespace("  a \t\n b  "), " a b ");
    assert_eq!(collapse_whitespace("abc"), "abc");
    assert_eq!(collapse_whitespace(""), "");
}

#[test]
fn truncate_counts_characters_not_bytes() {
    assert_eq!(truncate_chars("héllo", 2), "hé");
    assert_eq!(truncate_chars("ab", 5), "ab");
    assert_eq!(truncate_chars("ab", 0), "");
}
