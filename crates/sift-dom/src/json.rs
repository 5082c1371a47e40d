//! Load a [`DomTree`] from a JSON node dump.
//!
//! The format is the one produced by the usual "dump the parsed document as
//! JSON" tooling:
//!
//! ```json
//! {"type": "document", "children": [
//!   {"type": "element", "tagName": "p", "attributes": {"class": "intro"},
//!    "children": [{"type": "text", "content": "hello"}]}
//! ]}
//! ```
//!
//! Object-form `attributes` keep their key order. They may also be an array
//! of `[name, value]` pairs, which allows repeated names.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Attribute, DomTree, ElementData, NodeId, NodeType};

/// Errors raised while loading a document dump.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The input is not valid JSON or does not follow the node-dump format.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A document node appeared somewhere other than the top level.
    #[error("document node nested inside another node")]
    NestedDocument,

    /// An object-form attribute had a value that is not a string.
    #[error("attribute `{0}` must have a string value")]
    AttributeValue(String),
}

/// One node of the dump.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode {
    Document {
        #[serde(default)]
        children: Vec<JsonNode>,
    },
    Element {
        #[serde(rename = "tagName")]
        tag_name: String,
        #[serde(default)]
        attributes: Option<JsonAttributes>,
        #[serde(default)]
        children: Vec<JsonNode>,
    },
    Text {
        #[serde(default)]
        content: String,
    },
    Comment {
        #[serde(default)]
        content: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonAttributes {
    Pairs(Vec<(String, String)>),
    Map(Map<String, Value>),
}

impl JsonAttributes {
    fn into_attributes(self) -> Result<Vec<Attribute>, DocumentError> {
        match self {
            Self::Pairs(pairs) => Ok(pairs
                .into_iter()
                .map(|(name, value)| Attribute { name, value })
                .collect()),
            Self::Map(map) => map
                .into_iter()
                .map(|(name, value)| match value {
                    Value::String(value) => Ok(Attribute { name, value }),
                    _ => Err(DocumentError::AttributeValue(name)),
                })
                .collect(),
        }
    }
}

impl DomTree {
    /// Build a tree from a JSON node dump.
    ///
    /// A top-level element (or text/comment) is attached under a fresh
    /// Document node, so [`NodeId::ROOT`] is always the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] for malformed input and
    /// [`DocumentError::NestedDocument`] when a document node is not at the top,
    /// and [`DocumentError::AttributeValue`] for a non-string attribute value.
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        let root: JsonNode = serde_json::from_str(input)?;
        let mut tree = Self::new();
        match root {
            JsonNode::Document { children } => {
                for child in children {
                    tree.attach_json(NodeId::ROOT, child)?;
                }
            }
            other => tree.attach_json(NodeId::ROOT, other)?,
        }
        Ok(tree)
    }

    fn attach_json(&mut self, parent: NodeId, node: JsonNode) -> Result<(), DocumentError> {
        match node {
            JsonNode::Document { .. } => return Err(DocumentError::NestedDocument),
            JsonNode::Element {
                tag_name,
                attributes,
                children,
            } => {
                let element = ElementData {
                    tag_name,
                    attrs: match attributes {
                        Some(attributes) => attributes.into_attributes()?,
                        None => Vec::new(),
                    },
                };
                let id = self.append_element(parent, element);
                for child in children {
                    self.attach_json(id, child)?;
                }
            }
            JsonNode::Text { content } => {
                let _ = self.append_text(parent, content);
            }
            JsonNode::Comment { content } => {
                let id = self.alloc(NodeType::Comment(content));
                self.append_child(parent, id);
            }
        }
        Ok(())
    }
}
