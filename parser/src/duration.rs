// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::QueryLocation;

use crate::ParserError;

/// Parses the subset of ISO-8601 durations the rule corpus uses for rate
/// windows (`'PT1M'`, `'PT30S'`, `'PT1H'`) into a second count. This is a
/// multiplier, not a sliding-window boundary (spec §9 Open Question).
pub fn parse_iso8601_duration_seconds(
    query_location: &QueryLocation,
    text: &str,
) -> Result<f64, ParserError> {
    let rest = text.strip_prefix('P').ok_or_else(|| {
        ParserError::InvalidLiteral(
            query_location.clone(),
            format!("duration '{text}' must start with 'P'"),
        )
    })?;
    let rest = rest.strip_prefix('T').ok_or_else(|| {
        ParserError::InvalidLiteral(
            query_location.clone(),
            format!("duration '{text}' must use the time designator 'PT' (only H/M/S supported)"),
        )
    })?;

    let mut seconds = 0f64;
    let mut number = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => number.push(c),
            'H' | 'M' | 'S' => {
                let value: f64 = number.parse().map_err(|_| {
                    ParserError::InvalidLiteral(
                        query_location.clone(),
                        format!("duration '{text}' has an invalid numeric component"),
                    )
                })?;
                number.clear();
                seconds += match c {
                    'H' => value * 3600.0,
                    'M' => value * 60.0,
                    'S' => value,
                    _ => unreachable!(),
                };
            }
            _ => {
                return Err(ParserError::InvalidLiteral(
                    query_location.clone(),
                    format!("duration '{text}' contains an unsupported designator '{c}'"),
                ));
            }
        }
    }

    if !number.is_empty() {
        return Err(ParserError::InvalidLiteral(
            query_location.clone(),
            format!("duration '{text}' is missing a trailing designator"),
        ));
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> QueryLocation {
        QueryLocation::new_fake()
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_iso8601_duration_seconds(&loc(), "PT1M").unwrap(), 60.0);
    }

    #[test]
    fn parses_compound_duration() {
        assert_eq!(
            parse_iso8601_duration_seconds(&loc(), "PT1H30M").unwrap(),
            5400.0
        );
    }

    #[test]
    fn rejects_missing_time_designator() {
        assert!(parse_iso8601_duration_seconds(&loc(), "P1D").is_err());
    }
}
