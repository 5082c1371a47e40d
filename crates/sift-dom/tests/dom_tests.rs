//! Tests for tree construction, traversal helpers, and the JSON loader.

use sift_dom::{DocumentError, DomTree, ElementData, NodeId, NodeType};

/// `<html><body><h1/>text<p id=a/><!--c--><p/></body></html>`
fn sample() -> (DomTree, [NodeId; 5]) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let h1 = tree.append_element(body, ElementData::new("h1"));
    let _ = tree.append_text(body, "text");
    let p1 = tree.append_element(body, ElementData::new("p").with_attribute("id", "a"));
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(body, comment);
    let p2 = tree.append_element(body, ElementData::new("p"));
    (tree, [html, body, h1, p1, p2])
}

// ========== construction ==========

#[test]
fn test_new_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
}

#[test]
fn test_append_links_siblings() {
    let (tree, [_, body, h1, p1, p2]) = sample();
    assert_eq!(tree.children(body).len(), 5);
    assert_eq!(tree.first_child(body), Some(h1));
    assert_eq!(tree.last_child(body), Some(p2));
    assert_eq!(tree.parent(p1), Some(body));
    assert_eq!(tree.prev_sibling(h1), None);
    assert!(tree.next_sibling(h1).is_some_and(|id| tree.as_text(id) == Some("text")));
}

// ========== element views ==========

#[test]
fn test_element_children_skip_text_and_comments() {
    let (tree, [_, body, h1, p1, p2]) = sample();
    let children: Vec<_> = tree.element_children(body).collect();
    assert_eq!(children, vec![h1, p1, p2]);
    let reversed: Vec<_> = tree.element_children(body).rev().collect();
    assert_eq!(reversed, vec![p2, p1, h1]);
}

#[test]
fn test_next_element_sibling_skips_non_elements() {
    let (tree, [_, _, h1, p1, p2]) = sample();
    assert_eq!(tree.next_element_sibling(h1), Some(p1));
    assert_eq!(tree.next_element_sibling(p1), Some(p2));
    assert_eq!(tree.next_element_sibling(p2), None);
}

#[test]
fn test_sibling_iterators() {
    let (tree, [_, _, h1, p1, p2]) = sample();
    let before: Vec<_> = tree
        .preceding_siblings(p2)
        .filter(|&id| tree.is_element(id))
        .collect();
    assert_eq!(before, vec![p1, h1]);
    assert_eq!(tree.following_siblings(p2).count(), 0);
    assert_eq!(tree.following_siblings(h1).count(), 4);
}

#[test]
fn test_descendants_in_document_order() {
    let (tree, [html, body, h1, p1, p2]) = sample();
    assert_eq!(tree.descendants(NodeId::ROOT), vec![html, body, h1, p1, p2]);
    assert_eq!(tree.descendants(body), vec![h1, p1, p2]);
    assert!(tree.descendants(p2).is_empty());
}

#[test]
fn test_ancestors_and_descendant_check() {
    let (tree, [html, body, _, p1, _]) = sample();
    let ancestors: Vec<_> = tree.ancestors(p1).collect();
    assert_eq!(ancestors, vec![body, html, NodeId::ROOT]);
    assert!(tree.is_descendant_of(p1, html));
    assert!(!tree.is_descendant_of(html, p1));
    assert!(!tree.is_descendant_of(p1, p1));
}

#[test]
fn test_document_element() {
    let (tree, [html, _, _, p1, _]) = sample();
    assert_eq!(tree.document_element(p1), Some(html));
    assert_eq!(tree.document_element(NodeId::ROOT), Some(html));
}

#[test]
fn test_document_element_of_detached_subtree() {
    let mut tree = DomTree::new();
    let div = tree.alloc(NodeType::Element(ElementData::new("div")));
    let span = tree.append_element(div, ElementData::new("span"));
    assert_eq!(tree.document_element(span), Some(div));
}

#[test]
fn test_attributes_keep_duplicates_and_order() {
    let element = ElementData::new("a")
        .with_attribute("class", "one two")
        .with_attribute("CLASS", "three")
        .with_attribute("id", "x");
    assert_eq!(element.classes().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    assert_eq!(element.attributes_named("class").count(), 2);
    assert_eq!(element.attribute("Id"), Some("x"));
    assert_eq!(element.id(), Some("x"));
    assert_eq!(element.attributes().count(), 3);
}

#[test]
fn test_attribute_lookup_outlives_name() {
    let element = ElementData::new("a").with_attribute("href", "/home");
    let value = {
        let name = String::from("HREF");
        element.attribute(&name)
    };
    assert_eq!(value, Some("/home"));
    let first = {
        let name = "href".to_string();
        element.attributes_named(&name).next()
    };
    assert!(first.is_some_and(|attr| attr.value == "/home"));
}

// ========== JSON loader ==========

#[test]
fn test_from_json_document() {
    let json = r#"{"type": "document", "children": [
        {"type": "element", "tagName": "body", "children": [
            {"type": "element", "tagName": "p", "attributes": {"class": "foo", "id": "a"},
             "children": [{"type": "text", "content": "hi"}]},
            {"type": "comment", "content": "note"},
            {"type": "element", "tagName": "p"}
        ]}
    ]}"#;
    let tree = DomTree::from_json_str(json).unwrap();
    let elements = tree.descendants(NodeId::ROOT);
    assert_eq!(elements.len(), 3);
    assert_eq!(tree.tag_name(elements[0]), Some("body"));
    let p = tree.as_element(elements[1]).unwrap();
    assert_eq!(p.id(), Some("a"));
    assert_eq!(p.attribute("class"), Some("foo"));
    assert_eq!(tree.children(elements[0]).len(), 3);
}

#[test]
fn test_from_json_attribute_pairs_keep_order() {
    let json = r#"{"type": "element", "tagName": "a",
        "attributes": [["rel", "next"], ["rel", "up"]]}"#;
    let tree = DomTree::from_json_str(json).unwrap();
    let a = tree.element_children(NodeId::ROOT).next().unwrap();
    let values: Vec<_> = tree
        .as_element(a)
        .unwrap()
        .attributes_named("rel")
        .map(|attr| attr.value.as_str())
        .collect();
    assert_eq!(values, vec!["next", "up"]);
}

#[test]
fn test_from_json_rejects_nested_document() {
    let json = r#"{"type": "element", "tagName": "div",
        "children": [{"type": "document"}]}"#;
    assert!(matches!(
        DomTree::from_json_str(json),
        Err(DocumentError::NestedDocument)
    ));
}

#[test]
fn test_from_json_rejects_malformed_input() {
    assert!(matches!(
        DomTree::from_json_str(r#"{"type": "element"}"#),
        Err(DocumentError::Json(_))
    ));
    assert!(matches!(
        DomTree::from_json_str("not json"),
        Err(DocumentError::Json(_))
    ));
}

#[test]
fn test_from_json_attribute_object_keeps_key_order() {
    let json = r#"{"type": "element", "tagName": "a",
        "attributes": {"title": "t", "href": "/x", "class": "c"}}"#;
    let tree = DomTree::from_json_str(json).unwrap();
    let a = tree.element_children(NodeId::ROOT).next().unwrap();
    let names: Vec<_> = tree
        .as_element(a)
        .unwrap()
        .attributes()
        .map(|attr| attr.name.as_str())
        .collect();
    assert_eq!(names, vec!["title", "href", "class"]);
}

#[test]
fn test_from_json_rejects_non_string_attribute() {
    let json = r#"{"type": "element", "tagName": "input", "attributes": {"size": 4}}"#;
    assert!(matches!(
        DomTree::from_json_str(json),
        Err(DocumentError::AttributeValue(name)) if name == "size"
    ));
}
