use crate::attrs::filter_attrs;
use crate::model::{AttrMap, StyleMap};

/// Which base style an element resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Graph,
    Node,
    Edge,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Graph => "graph",
            Kind::Node => "node",
            Kind::Edge => "edge",
        }
    }
}

/// The ambient stylesheet: class name -> attribute bundle.
///
/// Three implicit classes named after the element kinds always exist and are
/// merged first during resolution. User classes share the same namespace, so
/// a stylesheet may restyle every node by defining a `node` class.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    classes: StyleMap,
}

impl Stylesheet {
    pub fn new() -> Self {
        let mut classes = StyleMap::new();
        for kind in [Kind::Graph, Kind::Node, Kind::Edge] {
            classes.insert(kind.as_str().to_string(), AttrMap::new());
        }
        Self { classes }
    }

    /// Overlay another class map. Same-named classes are replaced wholesale,
    /// matching how model `styles` blocks shadow inherited ones.
    pub fn merge(&mut self, styles: &StyleMap) {
        for (name, attrs) in styles {
            self.classes.insert(name.clone(), attrs.clone());
        }
    }

    /// The raw base style for a kind, handed to the backend as its default
    /// attribute statement. Not filtered.
    pub fn kind_defaults(&self, kind: Kind) -> AttrMap {
        self.classes.get(kind.as_str()).cloned().unwrap_or_default()
    }

    /// Resolve an element's final attribute set: base kind style, then each
    /// class in listed order, then the element's own attributes; later
    /// entries win on key collision. The merged set is whitelist-filtered.
    /// Unknown class names contribute nothing.
    pub fn resolve(&self, kind: Kind, classes: &[String], attrs: &AttrMap) -> AttrMap {
        let mut merged = self.kind_defaults(kind);
        for class in classes {
            if let Some(style) = self.classes.get(class.as_str()) {
                for (key, value) in style {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        for (key, value) in attrs {
            merged.insert(key.clone(), value.clone());
        }
        filter_attrs(&merged)
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}
