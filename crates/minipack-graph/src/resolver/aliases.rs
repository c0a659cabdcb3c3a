//! Path alias handling for reference resolution.
//!
//! An alias maps a prefix to a directory under the app root, e.g.
//! `"@components" -> "components"`. Aliased references are rewritten to
//! root-absolute form so the regular root-absolute rules apply.

use indexmap::IndexMap;

/// Rewrite an aliased reference (e.g. `"@components/btn/btn"` ->
/// `"/components/btn/btn"`).
///
/// The longest matching alias wins; an alias only matches whole path
/// segments, so `"@c"` never matches `"@components/btn"`.
pub fn resolve_path_alias(reference: &str, path_aliases: &IndexMap<String, String>) -> Option<String> {
    let (alias, target) = path_aliases
        .iter()
        .filter(|(alias, _)| {
            reference == alias.as_str()
                || reference
                    .strip_prefix(alias.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(alias, _)| alias.len())?;

    let rest = reference[alias.len()..].trim_start_matches('/');
    let target = target.trim_start_matches("./").trim_matches('/');

    let resolved = match (target.is_empty(), rest.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{rest}"),
        (false, true) => format!("/{target}"),
        (false, false) => format!("/{target}/{rest}"),
    };

    Some(resolved)
}
