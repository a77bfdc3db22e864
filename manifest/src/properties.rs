// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::error::ManifestError;

/// Parses the `key=value` line format shared by every manifest artifact
/// (spec §6): the meter-entry mapping, the expression-hash mapping, and
/// `staleness.properties` are all one `key=value` pair per line. Blank
/// lines and lines starting with `#` are ignored.
pub fn parse(text: &str) -> Result<Vec<(Box<str>, Box<str>)>, ManifestError> {
    let mut entries = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ManifestError::MalformedLine { line: index + 1, text: raw_line.into() });
        };
        entries.push((key.trim().into(), value.trim().into()));
    }
    Ok(entries)
}

pub fn render(entries: &[(Box<str>, Box<str>)]) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_lines() {
        let entries = parse("a=1\nb=2\n").unwrap();
        assert_eq!(entries, vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let entries = parse("# header\n\na=1\n").unwrap();
        assert_eq!(entries, vec![("a".into(), "1".into())]);
    }

    #[test]
    fn rejects_a_line_with_no_equals_sign() {
        assert!(parse("not-a-pair").is_err());
    }
}
