// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::TagFilterExpression;
use mal_model::SampleFamily;

pub fn apply(filter: &TagFilterExpression, family: &SampleFamily) -> SampleFamily {
    family
        .iter()
        .filter(|sample| match filter {
            TagFilterExpression::TagEqual(f) => sample.labels().get(f.key()) == Some(f.value()),
            TagFilterExpression::TagNotEqual(f) => sample.labels().get(f.key()) != Some(f.value()),
            TagFilterExpression::TagMatch(f) => f.regex().is_match(sample.labels().get(f.key()).unwrap_or("")),
            TagFilterExpression::TagNotMatch(f) => !f.regex().is_match(sample.labels().get(f.key()).unwrap_or("")),
            TagFilterExpression::ValueEqual(f) => sample.value() == f.value(),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::{QueryLocation, TagLiteralFilter};
    use mal_model::{Labels, Sample};

    #[test]
    fn tag_equal_keeps_matching_samples() {
        let family = SampleFamily::new(vec![
            Sample::new("m", Labels::from_pairs([("env", "prod")]), 1.0, 0),
            Sample::new("m", Labels::from_pairs([("env", "dev")]), 2.0, 0),
        ]);
        let filter = TagFilterExpression::TagEqual(TagLiteralFilter::new(
            QueryLocation::new_fake(),
            "env",
            "prod",
        ));

        let filtered = apply(&filter, &family);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.samples()[0].value(), 1.0);
    }
}
