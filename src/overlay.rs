//! Path-based selection overlay.
//!
//! A second pass over the model, run before the walker, that decides per
//! element whether it is visible, highlighted, or shaded by comparing its
//! hierarchical paths against three configured prefix lists. The pass
//! produces a rewritten copy of the model; the input tree is left alone.
//!
//! Paths are dot-joined subgraph names from the root (`infra.db.replica`).
//! Nodes and edges inherit the path of their enclosing subgraph and may add
//! explicit `paths` tags of their own. List entries starting with `^` are
//! negations: "everything except these branches".

use indexmap::IndexMap;

use crate::model::{AttrMap, Edge, Model, Node, StyleMap};

pub const HIGHLIGHTED_CLASS: &str = "highlighted";
pub const SHADED_CLASS: &str = "shaded";

/// Style classes backing the overlay annotations, merged into the ambient
/// stylesheet whenever the overlay is active. External stylesheets and model
/// styles can override them by redefining the class names.
pub fn builtin_styles() -> StyleMap {
    let mut styles = StyleMap::new();

    let mut highlighted = AttrMap::new();
    highlighted.insert("penwidth".to_string(), "3".into());
    styles.insert(HIGHLIGHTED_CLASS.to_string(), highlighted);

    let mut shaded = AttrMap::new();
    shaded.insert("color".to_string(), "darkgrey".into());
    shaded.insert("fontcolor".to_string(), "darkgrey".into());
    shaded.insert("fillcolor".to_string(), "lightgrey".into());
    styles.insert(SHADED_CLASS.to_string(), shaded);

    styles
}

/// One comma-separated prefix list, as passed on the command line.
#[derive(Debug, Clone)]
pub struct PathFilter {
    entries: Vec<String>,
}

impl PathFilter {
    pub fn parse(list: &str) -> Self {
        Self {
            entries: list.split(',').map(|entry| entry.trim().to_string()).collect(),
        }
    }

    /// An unconfigured list: splitting the empty string leaves exactly one
    /// empty entry.
    pub fn is_empty(&self) -> bool {
        self.entries == [""]
    }

    /// Prefix matching with negation. Any candidate path starting with a
    /// plain entry matches outright. Failing that, a list that carries
    /// negated entries matches exactly when no candidate path starts with
    /// any of them. The unconfigured list matches nothing.
    pub fn matches(&self, paths: &[String]) -> bool {
        if self.is_empty() {
            return false;
        }
        let negated: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|entry| entry.strip_prefix('^'))
            .collect();
        let mut in_negated = false;
        for path in paths {
            if self.entries.iter().any(|entry| path.starts_with(entry.as_str())) {
                return true;
            }
            in_negated = in_negated || negated.iter().any(|prefix| path.starts_with(prefix));
        }
        !negated.is_empty() && !in_negated
    }
}

/// Selection, highlight, and shade configuration for one run.
#[derive(Debug, Clone)]
pub struct Overlay {
    selected: PathFilter,
    highlighted: PathFilter,
    shaded: PathFilter,
    remove_deselected: bool,
}

impl Overlay {
    pub fn new(select: &str, highlight: &str, shade: &str, remove_deselected: bool) -> Self {
        Self {
            selected: PathFilter::parse(select),
            highlighted: PathFilter::parse(highlight),
            shaded: PathFilter::parse(shade),
            remove_deselected,
        }
    }

    /// An overlay with every option at its default does nothing; callers
    /// skip the preprocessing pass entirely so plain renders stay untouched.
    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
            || !self.highlighted.is_empty()
            || !self.shaded.is_empty()
            || self.remove_deselected
    }

    /// Selection has the inverse default of highlight and shade: an
    /// unconfigured select list keeps everything visible.
    pub fn is_selected(&self, paths: &[String]) -> bool {
        if self.selected.is_empty() {
            return true;
        }
        self.selected.matches(paths)
    }

    /// Rewrite a whole model tree. The input is not mutated.
    pub fn preprocess_model(&self, model: &Model) -> Model {
        self.preprocess(model, "")
    }

    fn preprocess(&self, model: &Model, current_path: &str) -> Model {
        let mut out = model.clone();
        let paths: Vec<String> = if current_path.is_empty() {
            Vec::new()
        } else {
            vec![current_path.to_string()]
        };
        out.nodes = self.preprocess_nodes(&model.nodes, &paths);
        out.edges = self.preprocess_edges(&model.edges, &paths);
        out.subgraphs = self.preprocess_subgraphs(&model.subgraphs, current_path);
        out
    }

    fn preprocess_nodes(
        &self,
        nodes: &IndexMap<String, Node>,
        paths: &[String],
    ) -> IndexMap<String, Node> {
        let mut selected = IndexMap::new();
        for (id, node) in nodes {
            let node_paths = join_paths(paths, &node.paths);
            if !self.is_selected(&node_paths) && self.remove_deselected {
                continue;
            }
            let mut node = node.clone();
            self.annotate(&mut node.visible, &mut node.classes, &node_paths);
            selected.insert(id.clone(), node);
        }
        selected
    }

    fn preprocess_edges(&self, edges: &[Edge], paths: &[String]) -> Vec<Edge> {
        let mut selected = Vec::new();
        for edge in edges {
            let edge_paths = join_paths(paths, &edge.paths);
            if !self.is_selected(&edge_paths) && self.remove_deselected {
                continue;
            }
            let mut edge = edge.clone();
            self.annotate(&mut edge.visible, &mut edge.classes, &edge_paths);
            selected.push(edge);
        }
        selected
    }

    fn preprocess_subgraphs(
        &self,
        subgraphs: &IndexMap<String, Model>,
        current_path: &str,
    ) -> IndexMap<String, Model> {
        let mut selected = IndexMap::new();
        for (name, subgraph) in subgraphs {
            let (name, cluster) = match name.strip_prefix("cluster_") {
                Some(stripped) => (stripped, true),
                None => (name.as_str(), subgraph.cluster),
            };
            let path = subgraph_path(name, current_path);
            let paths = vec![path.clone()];

            let mut processed = self.preprocess(subgraph, &path);
            processed.cluster = cluster;
            self.annotate(&mut processed.visible, &mut processed.classes, &paths);

            if !self.is_selected(&paths) {
                if self.remove_deselected && processed.has_no_elements() {
                    // Collapse the empty container: splice its already
                    // processed children into this level and carry on with
                    // the remaining siblings.
                    for (child_name, child) in processed.subgraphs {
                        selected.insert(child_name, child);
                    }
                    continue;
                }
            } else if processed.has_no_elements() {
                // An empty container is never drawn as a labeled box.
                processed.visible = Some(false);
            }
            selected.insert(name.to_string(), processed);
        }
        selected
    }

    fn annotate(&self, visible: &mut Option<bool>, classes: &mut Vec<String>, paths: &[String]) {
        *visible = Some(self.is_selected(paths));
        if self.highlighted.matches(paths) {
            classes.push(HIGHLIGHTED_CLASS.to_string());
        }
        if self.shaded.matches(paths) {
            classes.push(SHADED_CLASS.to_string());
        }
    }
}

fn join_paths(ambient: &[String], own: &[String]) -> Vec<String> {
    ambient.iter().chain(own).cloned().collect()
}

fn subgraph_path(name: &str, current_path: &str) -> String {
    if current_path.is_empty() {
        name.to_string()
    } else {
        format!("{current_path}.{name}")
    }
}
