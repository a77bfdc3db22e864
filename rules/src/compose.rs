// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// Builds the full composed expression text for one metric rule (spec
/// §4.5): splice `expPrefix` between the source name (the expression's
/// first dotted segment) and the rest, then append `expSuffix`.
pub fn compose(exp: &str, exp_prefix: Option<&str>, exp_suffix: Option<&str>) -> String {
    let mut composed = match exp_prefix {
        Some(prefix) if !prefix.is_empty() => splice_prefix(exp, prefix),
        _ => exp.to_string(),
    };

    if let Some(suffix) = exp_suffix {
        if !suffix.is_empty() {
            composed = format!("({composed}).{suffix}");
        }
    }

    composed
}

/// `"<name>.<expPrefix>).<rest>"` conceptually reads as
/// `(<name>.<expPrefix>).<rest>`: the prefix attaches directly to the source
/// name, and everything after the first dot is pushed out past the new
/// parenthesis.
fn splice_prefix(exp: &str, prefix: &str) -> String {
    match exp.find('.') {
        Some(dot) => {
            let (name, rest) = exp.split_at(dot);
            format!("({name}.{prefix}){rest}")
        }
        None => format!("{exp}.{prefix}"),
    }
}
