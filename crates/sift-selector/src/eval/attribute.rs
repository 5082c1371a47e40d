//! [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)

use sift_dom::ElementData;

use crate::ast::{AttributeOperator, AttributeSelector};

/// Whether any attribute of `element` satisfies `selector`.
///
/// Names compare ASCII case-insensitively, values case-sensitively. Every
/// attribute entry is tried, including repeated names. An empty name matches
/// nothing.
pub(super) fn matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    if selector.name.is_empty() {
        return false;
    }
    element
        .attributes_named(&selector.name)
        .any(|attr| value_matches(selector.operator, &attr.value, selector.value.as_deref()))
}

fn value_matches(operator: AttributeOperator, value: &str, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return operator == AttributeOperator::Exists;
    };
    match operator {
        // [att]
        AttributeOperator::Exists => true,
        // [att=val]
        AttributeOperator::Equals => value == query,
        // [att~=val]: "If 'val' contains whitespace, it will never represent
        // anything (since the words are separated by spaces). Also if 'val' is
        // the empty string, it will never represent anything."
        AttributeOperator::Includes => value.split_ascii_whitespace().any(|word| word == query),
        // [att|=val]
        AttributeOperator::DashMatch => {
            value == query
                || value
                    .strip_prefix(query)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // [att^=val], [att$=val], [att*=val]: "If 'val' is the empty string
        // then the selector does not represent anything."
        AttributeOperator::PrefixMatch => !query.is_empty() && value.starts_with(query),
        AttributeOperator::SuffixMatch => !query.is_empty() && value.ends_with(query),
        AttributeOperator::SubstringMatch => !query.is_empty() && value.contains(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, operator: AttributeOperator, value: Option<&str>) -> AttributeSelector {
        AttributeSelector {
            name: name.to_owned(),
            operator,
            value: value.map(str::to_owned),
        }
    }

    #[test]
    fn repeated_attributes_are_all_scanned() {
        let element = ElementData::new("a")
            .with_attribute("rel", "next")
            .with_attribute("rel", "up");
        assert!(matches(
            &attr("rel", AttributeOperator::Equals, Some("up")),
            &element
        ));
    }

    #[test]
    fn empty_name_and_empty_query() {
        let element = ElementData::new("a").with_attribute("href", "/x");
        assert!(!matches(&attr("", AttributeOperator::Exists, None), &element));
        assert!(!matches(
            &attr("href", AttributeOperator::PrefixMatch, Some("")),
            &element
        ));
        assert!(!matches(
            &attr("href", AttributeOperator::Includes, Some("")),
            &element
        ));
    }

    #[test]
    fn dash_match_needs_hyphen_boundary() {
        let en_us = ElementData::new("p").with_attribute("lang", "en-US");
        let english = ElementData::new("p").with_attribute("lang", "english");
        let sel = attr("lang", AttributeOperator::DashMatch, Some("en"));
        assert!(matches(&sel, &en_us));
        assert!(!matches(&sel, &english));
    }
}
