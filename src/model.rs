//! The JSON graph model.
//!
//! A model is a recursive JSON object. Every key is optional:
//!
//! ```json
//! {
//!   "nodes": { "a": { "classes": ["db"], "rank": "stores", "shape": "box" } },
//!   "edges": [ { "from": "a", "to": "b", "classes": ["wire"] } ],
//!   "subgraphs": { "cluster_backend": { "nodes": { "b": {} } } },
//!   "ranks": { "stores": "same" },
//!   "classes": ["dark"],
//!   "styles": { "db": { "color": "blue" } },
//!   "prefix": "svc",
//!   "rankdir": "LR"
//! }
//! ```
//!
//! Keys not listed above are direct graph attributes (`rankdir` here). The
//! same applies inside nodes and edges: anything that is not `classes`,
//! `rank`, `paths` or `visible` is a candidate Graphviz attribute, filtered
//! against the accepted vocabulary before emission.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Candidate attribute names mapped to their raw JSON values.
pub type AttrMap = IndexMap<String, serde_json::Value>;

/// Named bundles of attributes, as found in `styles` maps and stylesheets.
pub type StyleMap = IndexMap<String, AttrMap>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Model {
    pub nodes: IndexMap<String, Node>,
    pub edges: Vec<Edge>,
    pub subgraphs: IndexMap<String, Model>,
    pub ranks: IndexMap<String, String>,
    pub classes: Vec<String>,
    pub styles: StyleMap,
    pub prefix: String,
    pub visible: Option<bool>,
    pub cluster: bool,
    #[serde(flatten)]
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Node {
    pub classes: Vec<String>,
    pub rank: Option<String>,
    pub paths: Vec<String>,
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(flatten)]
    pub attrs: AttrMap,
}

impl Model {
    /// True when the model has neither nodes nor edges of its own.
    pub fn has_no_elements(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Parse a model document. Strict JSON is tried first; JSON5 as a fallback
/// so inputs with comments or trailing commas still load. The strict error
/// is the one reported when both fail.
pub fn parse_model(input: &str) -> Result<Model, ModelError> {
    match serde_json::from_str(input) {
        Ok(model) => Ok(model),
        Err(err) => {
            json5::from_str(input).map_err(|_| ModelError::MalformedInput(err.to_string()))
        }
    }
}

/// Parse a stylesheet document (class name -> attribute map), with the same
/// JSON5 fallback as [`parse_model`].
pub fn parse_styles(input: &str) -> Result<StyleMap, ModelError> {
    match serde_json::from_str(input) {
        Ok(styles) => Ok(styles),
        Err(err) => {
            json5::from_str(input).map_err(|_| ModelError::MalformedInput(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaulted_model() {
        let model = parse_model("{}").unwrap();
        assert!(model.nodes.is_empty());
        assert!(model.edges.is_empty());
        assert!(model.subgraphs.is_empty());
        assert!(model.has_no_elements());
        assert_eq!(model.prefix, "");
    }

    #[test]
    fn splits_recognized_keys_from_attributes() {
        let model = parse_model(
            r#"{
                "nodes": {
                    "a": {"classes": ["db"], "rank": "r1", "color": "red", "paths": ["x.y"]}
                },
                "rankdir": "LR"
            }"#,
        )
        .unwrap();
        let node = &model.nodes["a"];
        assert_eq!(node.classes, vec!["db"]);
        assert_eq!(node.rank.as_deref(), Some("r1"));
        assert_eq!(node.paths, vec!["x.y"]);
        assert_eq!(node.attrs["color"], "red");
        assert!(!node.attrs.contains_key("classes"));
        assert_eq!(model.attrs["rankdir"], "LR");
    }

    #[test]
    fn node_map_keeps_document_order() {
        let model = parse_model(r#"{"nodes": {"z": {}, "a": {}, "m": {}}}"#).unwrap();
        let ids: Vec<&String> = model.nodes.keys().collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn edge_requires_endpoints() {
        let err = parse_model(r#"{"edges": [{"from": "a"}]}"#).unwrap_err();
        assert!(matches!(err, ModelError::MalformedInput(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_model("not json at all {{{").is_err());
    }

    #[test]
    fn json5_fallback_accepts_comments() {
        let model = parse_model(
            "{\n  // two plain nodes\n  nodes: { a: {}, b: {} },\n}",
        )
        .unwrap();
        assert_eq!(model.nodes.len(), 2);
    }

    #[test]
    fn nested_subgraphs_deserialize_recursively() {
        let model = parse_model(
            r#"{"subgraphs": {"outer": {"subgraphs": {"inner": {"nodes": {"n": {}}}}}}}"#,
        )
        .unwrap();
        let inner = &model.subgraphs["outer"].subgraphs["inner"];
        assert_eq!(inner.nodes.len(), 1);
    }
}
