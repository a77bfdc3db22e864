// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::{QueryLocation, TagClosure};
use regex::Regex;
use std::sync::OnceLock;

use crate::ParserError;

fn concat_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\w+)\s*->\s*\1\.(\w+)\s*=\s*'([^']*)'\s*\+\s*\1\.\2\s*$").unwrap()
    })
}

fn copy_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*->\s*\1\.(\w+)\s*=\s*\1\.(\w+)\s*$").unwrap())
}

fn conditional_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(\w+)\s*->\s*if\s+\1\.(\w+)\s*==\s*'([^']*)'\s*then\s+\1\.\2\s*=\s*'([^']*)'\s*$",
        )
        .unwrap()
    })
}

fn remove_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*->\s*\1\.remove\(\s*'?(\w+)'?\s*\)\s*$").unwrap())
}

fn table_entry_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'([^']*)'\s*:\s*'([^']*)'").unwrap())
}

/// Matches a `tag(closure)` closure body against the small finite family of
/// patterns observed in the rule corpus (spec §9). The engine never
/// interprets the closure text as executable code — this is the whole of
/// the interpretation step, performed once at parse time.
pub fn match_tag_closure(
    query_location: &QueryLocation,
    text: &str,
) -> Result<TagClosure, ParserError> {
    if let Some(captures) = concat_pattern().captures(text) {
        return Ok(TagClosure::ConcatPrefix {
            key: captures[2].into(),
            prefix: captures[3].into(),
        });
    }

    if let Some(captures) = conditional_pattern().captures(text) {
        return Ok(TagClosure::ConditionalRewrite {
            key: captures[2].into(),
            when_equals: captures[3].into(),
            new_value: captures[4].into(),
        });
    }

    if let Some(captures) = remove_pattern().captures(text) {
        return Ok(TagClosure::RemoveKey {
            key: captures[2].into(),
        });
    }

    if let Some(captures) = copy_pattern().captures(text) {
        return Ok(TagClosure::CopyKey {
            from: captures[3].into(),
            to: captures[2].into(),
        });
    }

    Err(ParserError::UnsupportedClosure(
        query_location.clone(),
        text.into(),
    ))
}

/// Parses a `forEach(keys, { 'from': 'to', ... })` remap table closure: a
/// key-indexed literal replacement table (spec §9 pattern (b)) applied
/// independently to each key named in `keys`.
pub fn parse_foreach_table(
    query_location: &QueryLocation,
    keys: Vec<Box<str>>,
    text: &str,
) -> Result<TagClosure, ParserError> {
    let table: Vec<(Box<str>, Box<str>)> = table_entry_pattern()
        .captures_iter(text)
        .map(|c| (Box::from(&c[1]), Box::from(&c[2])))
        .collect();

    if table.is_empty() {
        return Err(ParserError::UnsupportedClosure(
            query_location.clone(),
            text.into(),
        ));
    }

    Ok(TagClosure::ForEachRemap { keys, table })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> QueryLocation {
        QueryLocation::new_fake()
    }

    #[test]
    fn matches_concat_prefix() {
        let closure =
            match_tag_closure(&loc(), "tags -> tags.cluster = 'elasticsearch::' + tags.cluster")
                .unwrap();
        match closure {
            TagClosure::ConcatPrefix { key, prefix } => {
                assert_eq!(&*key, "cluster");
                assert_eq!(&*prefix, "elasticsearch::");
            }
            other => panic!("unexpected closure: {other:?}"),
        }
    }

    #[test]
    fn matches_remove_key() {
        let closure = match_tag_closure(&loc(), "tags -> tags.remove('service')").unwrap();
        assert!(matches!(closure, TagClosure::RemoveKey { key } if &*key == "service"));
    }

    #[test]
    fn matches_conditional_rewrite() {
        let closure = match_tag_closure(
            &loc(),
            "tags -> if tags.side == 'client' then tags.side = 'consumer'",
        )
        .unwrap();
        match closure {
            TagClosure::ConditionalRewrite {
                key,
                when_equals,
                new_value,
            } => {
                assert_eq!(&*key, "side");
                assert_eq!(&*when_equals, "client");
                assert_eq!(&*new_value, "consumer");
            }
            other => panic!("unexpected closure: {other:?}"),
        }
    }

    #[test]
    fn matches_copy_key() {
        let closure = match_tag_closure(&loc(), "tags -> tags.to = tags.from").unwrap();
        assert!(matches!(closure, TagClosure::CopyKey { from, to } if &*from == "from" && &*to == "to"));
    }

    #[test]
    fn unsupported_pattern_is_rejected() {
        assert!(match_tag_closure(&loc(), "tags -> 1 + 1").is_err());
    }

    #[test]
    fn parses_foreach_literal_table() {
        let closure = parse_foreach_table(
            &loc(),
            vec!["client".into(), "server".into()],
            "'CLIENT': 'consumer', 'SERVER': 'provider'",
        )
        .unwrap();
        match closure {
            TagClosure::ForEachRemap { keys, table } => {
                assert_eq!(keys.len(), 2);
                assert_eq!(table.len(), 2);
            }
            other => panic!("unexpected closure: {other:?}"),
        }
    }
}
