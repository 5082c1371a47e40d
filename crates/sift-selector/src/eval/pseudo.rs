//! [§ 6.6 Pseudo-classes](https://www.w3.org/TR/selectors-3/#pseudo-classes)
//!
//! Only structural pseudo-classes are evaluated. Anything else parses but
//! never matches, and is reported once through [`warn_once`].

use sift_common::warning::warn_once;
use sift_dom::NodeId;

use super::Evaluator;
use super::nth::{Population, matches_formula, sibling_index};
use crate::ast::Argument;

impl Evaluator<'_> {
    /// Match a non-functional pseudo-class such as `:first-child`.
    ///
    /// `hint` is the type selector of the enclosing sequence, used by the
    /// "of-type" variants in place of the element's own tag.
    pub(super) fn matches_pseudo_class(&self, name: &str, id: NodeId, hint: Option<&str>) -> bool {
        let tree = self.tree;
        let Some(tag) = hint.or_else(|| tree.tag_name(id)) else {
            return false;
        };
        let first = |population: Population<'_>| sibling_index(tree, id, population) == Some(1);
        let children = Population::children();
        let of_type = Population::of_type(tag);

        match name.to_ascii_lowercase().as_str() {
            // [§ 6.6.5.1 :root](https://www.w3.org/TR/selectors-3/#root-pseudo)
            // "The :root pseudo-class represents an element that is the root of the document."
            "root" => self.document_element == Some(id),

            // [§ 6.6.5.6 :first-child](https://www.w3.org/TR/selectors-3/#first-child-pseudo)
            // "Same as :nth-child(1)."
            "first-child" => first(children),

            // [§ 6.6.5.7 :last-child](https://www.w3.org/TR/selectors-3/#last-child-pseudo)
            // "Same as :nth-last-child(1)."
            "last-child" => first(children.reversed()),

            // [§ 6.6.5.8 :first-of-type](https://www.w3.org/TR/selectors-3/#first-of-type-pseudo)
            "first-of-type" => first(of_type),

            // [§ 6.6.5.9 :last-of-type](https://www.w3.org/TR/selectors-3/#last-of-type-pseudo)
            "last-of-type" => first(of_type.reversed()),

            // [§ 6.6.5.10 :only-child](https://www.w3.org/TR/selectors-3/#only-child-pseudo)
            // "Represents an element that has a parent element and whose parent
            // element has no other element children."
            "only-child" => first(children) && first(children.reversed()),

            // [§ 6.6.5.11 :only-of-type](https://www.w3.org/TR/selectors-3/#only-of-type-pseudo)
            "only-of-type" => first(of_type) && first(of_type.reversed()),

            // [§ 6.6.5.12 :empty](https://www.w3.org/TR/selectors-3/#empty-pseudo)
            // Only element children count; text and comments are invisible here.
            "empty" => tree.element_children(id).next().is_none(),

            _ => {
                warn_once("eval", &format!("unsupported pseudo-class :{name}"));
                false
            }
        }
    }

    /// Match a functional pseudo-class such as `:nth-child(2n+1)`.
    pub(super) fn matches_pseudo_function(
        &self,
        name: &str,
        argument: &Argument,
        id: NodeId,
        hint: Option<&str>,
    ) -> bool {
        let Some(tag) = hint.or_else(|| self.tree.tag_name(id)) else {
            return false;
        };
        let population = match name.to_ascii_lowercase().as_str() {
            "nth-child" => Population::children(),
            "nth-last-child" => Population::children().reversed(),
            "nth-of-type" => Population::of_type(tag),
            "nth-last-of-type" => Population::of_type(tag).reversed(),
            _ => {
                warn_once("eval", &format!("unsupported pseudo-class :{name}()"));
                return false;
            }
        };

        let Some((a, b)) = argument.formula() else {
            warn_once(
                "eval",
                &format!(":{name}() needs an An+B argument, got `{argument}`"),
            );
            return false;
        };
        sibling_index(self.tree, id, population).is_some_and(|index| matches_formula(a, b, index))
    }
}
