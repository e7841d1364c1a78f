use std::collections::HashMap;

use dipi::error::DipiError;
use dipi::resolver::resolve;

fn scope(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_resolve_is_identity_without_tokens() {
    let vars = scope(&[("x", "1")]);
    assert_eq!(resolve(&vars, "plain text, no tokens").unwrap(), "plain text, no tokens");
}

#[test]
fn test_resolve_substitutes_bound_variables() {
    let vars = scope(&[("version", "1.4"), ("app", "site")]);
    assert_eq!(
        resolve(&vars, "deploying {app} at {version}").unwrap(),
        "deploying site at 1.4"
    );
}

#[test]
fn test_resolve_repeated_token() {
    let vars = scope(&[("name", "web")]);
    assert_eq!(resolve(&vars, "{name}/{name}.log").unwrap(), "web/web.log");
}

#[test]
fn test_resolve_reports_first_unresolved_token() {
    let vars = scope(&[("known", "yes")]);
    match resolve(&vars, "{known} {missing} {also-missing}") {
        Err(DipiError::UnresolvedVariable(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnresolvedVariable, got {:?}", other),
    }
}

#[test]
fn test_resolve_dst_follows_one_alias_and_strips_port() {
    let vars = scope(&[("dst", "alias"), ("alias", "user@host:/a/b -p 2200")]);
    assert_eq!(resolve(&vars, "{dst}").unwrap(), "user@host:/a/b");
}

#[test]
fn test_resolve_dst_name_is_the_raw_value() {
    let vars = scope(&[("dst", "alias"), ("alias", "user@host:/a/b -p 2200")]);
    assert_eq!(resolve(&vars, "{dst.name}").unwrap(), "alias");
}

#[test]
fn test_resolve_dst_without_alias_is_literal() {
    let vars = scope(&[("dst", "user@host:/srv/app -p 2201")]);
    assert_eq!(resolve(&vars, "{dst}").unwrap(), "user@host:/srv/app");
}

#[test]
fn test_resolve_alias_chains_stay_one_level_deep() {
    // a chain of aliases is followed exactly one step
    let vars = scope(&[("dst", "first"), ("first", "second"), ("second", "user@host:/x")]);
    assert_eq!(resolve(&vars, "{dst}").unwrap(), "second");
}

#[test]
fn test_resolve_empty_value_is_not_an_error() {
    let vars = scope(&[("empty", "")]);
    assert_eq!(resolve(&vars, "[{empty}]").unwrap(), "[]");
}
