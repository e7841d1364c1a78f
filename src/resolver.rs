use std::collections::HashMap;

use crate::error::DipiError;

/// substitute `{name}` tokens in a raw argument string
///
/// Two names are reserved:
/// - `{dst}` expands to the destination after alias resolution, with any
///   trailing `" -p <port>"` suffix stripped.
/// - `{dst.name}` expands to the raw `dst` value untouched, for when the
///   literal connection string is wanted.
///
/// Any other name is looked up in the scope; an absent name fails the
/// whole resolution with the first unresolved token, and the caller sees
/// no partially substituted text.
pub fn resolve(vars: &HashMap<String, String>, raw: &str) -> Result<String, DipiError> {
    // the dot is admitted only so the reserved {dst.name} token matches;
    // let bindings cannot contain dots, so other dotted names stay unresolved
    let pattern = regex::Regex::new(r"\{[-A-Za-z0-9_.]*\}")?;

    let mut resolved = raw.to_string();
    for found in pattern.find_iter(raw) {
        let token = found.as_str();
        let name = &token[1..token.len() - 1];
        let value = match name {
            "dst" => destination_of(vars),
            "dst.name" => vars.get("dst").cloned(),
            _ => vars.get(name).cloned(),
        };
        let value = value.ok_or_else(|| DipiError::UnresolvedVariable(name.to_string()))?;
        resolved = resolved.replacen(token, &value, 1);
    }

    Ok(resolved)
}

/// The destination variable can point at another variable, so that
///
/// ```text
/// dipi instructions.dpi myserver
/// ```
///
/// works together with
///
/// ```text
/// let myserver = user@server:/home/dest -p 2200
/// ```
///
/// and `{dst}` expands to `user@server:/home/dest`. Exactly one level of
/// indirection is followed; a chain of aliases does not resolve further.
fn destination_of(vars: &HashMap<String, String>) -> Option<String> {
    let dst = vars.get("dst")?;
    let dst = vars.get(dst).unwrap_or(dst);
    let path = dst.split(" -p ").next().unwrap_or(dst);
    Some(path.to_string())
}
