//! Property-based tests for parsing and evaluation.
//!
//! Selectors are generated from a small grammar so most inputs parse; trees
//! are random shapes over a handful of tag names.

use proptest::prelude::*;
use sift_dom::{DomTree, ElementData, NodeId};
use sift_selector::tokenizer::Tokenizer;
use sift_selector::{Expression, evaluate, parse, select};

// ============================================================================
// Strategies
// ============================================================================

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,6}"
}

fn arb_tag() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("div"), Just("p"), Just("span"), Just("li")]
}

fn arb_nth() -> impl Strategy<Value = String> {
    prop_oneof![
        (-5i32..=5).prop_map(|n| n.to_string()),
        Just("odd".to_string()),
        Just("even".to_string()),
        (-3i32..=3, -5i32..=5).prop_map(|(a, b)| format!("{a}n{b:+}")),
        (-3i32..=3, -5i32..=5).prop_map(|(a, b)| {
            let sign = if b < 0 { '-' } else { '+' };
            format!(" {a}n {sign} {} ", b.abs())
        }),
    ]
}

fn arb_filter() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_ident().prop_map(|s| format!(".{s}")),
        arb_ident().prop_map(|s| format!("#{s}")),
        arb_ident().prop_map(|s| format!("[{s}]")),
        (arb_ident(), arb_ident()).prop_map(|(n, v)| format!("[{n}*={v}]")),
        (arb_ident(), "[a-z /]{0,6}").prop_map(|(n, v)| format!("[{n}^='{v}']")),
        Just(":first-child".to_string()),
        Just(":last-of-type".to_string()),
        Just(":empty".to_string()),
        Just("::before".to_string()),
        arb_nth().prop_map(|n| format!(":nth-child({n})")),
        arb_nth().prop_map(|n| format!(":nth-last-of-type({n})")),
        arb_ident().prop_map(|s| format!(":not(.{s})")),
        (arb_tag(), arb_tag()).prop_map(|(a, b)| format!(":not({a}, {b})")),
    ]
}

fn arb_sequence() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(String::new()), Just("*".to_string()), arb_tag().prop_map(str::to_string)],
        prop::collection::vec(arb_filter(), 0..3),
    )
        .prop_map(|(base, filters)| {
            let sequence = format!("{base}{}", filters.concat());
            if sequence.is_empty() { "*".to_string() } else { sequence }
        })
}

fn arb_selector() -> impl Strategy<Value = String> {
    let combinator = prop_oneof![Just(" "), Just(" > "), Just("+"), Just(" ~ ")];
    (arb_sequence(), prop::collection::vec((combinator, arb_sequence()), 0..3)).prop_map(
        |(first, rest)| {
            rest.into_iter()
                .fold(first, |acc, (comb, seq)| format!("{acc}{comb}{seq}"))
        },
    )
}

fn arb_group() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_selector(), 1..4).prop_map(|alternatives| alternatives.join(","))
}

/// Each entry attaches a new element under an earlier one (or the document).
fn arb_tree() -> impl Strategy<Value = DomTree> {
    prop::collection::vec((any::<usize>(), arb_tag()), 1..40).prop_map(|spec| {
        let mut tree = DomTree::new();
        let mut nodes = vec![NodeId::ROOT];
        for (parent, tag) in spec {
            let parent = nodes[parent % nodes.len()];
            nodes.push(tree.append_element(parent, ElementData::new(tag)));
        }
        tree
    })
}

fn parse_ok(input: &str) -> Expression {
    let (expression, errors) = parse(input);
    assert!(errors.is_empty(), "{input}: {errors:?}");
    expression.unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn display_round_trips(input in arb_group()) {
        let expression = parse_ok(&input);
        let printed = expression.to_string();
        prop_assert_eq!(parse_ok(&printed), expression, "printed as `{}`", printed);
    }

    #[test]
    fn tokenizer_always_terminates(input in "\\PC{0,40}") {
        let tokens: Vec<_> = Tokenizer::new(&input).collect();
        prop_assert!(tokens.last().is_some_and(|t| t.is_eof()));
    }

    #[test]
    fn parse_never_panics(input in "[a-z#.:\\[\\]()=~|^$*+>, '\"0-9-]{0,30}") {
        let (expression, errors) = parse(&input);
        prop_assert_eq!(expression.is_some(), errors.is_empty());
    }

    #[test]
    fn even_matches_two_n(tree in arb_tree()) {
        for (a, b) in [("even", "2n"), ("odd", "2n+1")] {
            let left = select(&tree, NodeId::ROOT, &format!(":nth-child({a})")).unwrap();
            let right = select(&tree, NodeId::ROOT, &format!(":nth-child({b})")).unwrap();
            prop_assert_eq!(left, right);
        }
    }

    #[test]
    fn zero_step_selects_kth_child(tree in arb_tree(), k in 1usize..6) {
        let matches = select(&tree, NodeId::ROOT, &format!(":nth-child(0n+{k})")).unwrap();
        for id in tree.descendants(NodeId::ROOT) {
            let parent = tree.parent(id).unwrap();
            let is_kth = tree.element_children(parent).nth(k - 1) == Some(id);
            prop_assert_eq!(matches.contains(&id), is_kth);
        }
    }

    #[test]
    fn duplicate_alternatives_are_idempotent(tree in arb_tree(), selector in arb_selector(), k in 2usize..4) {
        let single = parse_ok(&selector);
        let repeated = parse_ok(&vec![selector.as_str(); k].join(", "));
        prop_assert_eq!(
            evaluate(&repeated, &tree, NodeId::ROOT),
            evaluate(&single, &tree, NodeId::ROOT)
        );
    }

    #[test]
    fn results_are_unique_and_in_document_order(tree in arb_tree(), selector in arb_selector()) {
        let matches = evaluate(&parse_ok(&selector), &tree, NodeId::ROOT);
        let order = tree.descendants(NodeId::ROOT);
        let ranks: Vec<usize> = matches
            .iter()
            .map(|id| order.iter().position(|o| o == id).unwrap())
            .collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]), "ranks {:?}", ranks);
    }
}
