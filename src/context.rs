//! Graph construction context.
//!
//! A `GraphContext` wraps one DOT graph or subgraph under construction
//! together with the ambient stylesheet, the node-id prefix, and the rank
//! accumulator for its subtree. Child contexts are built per subgraph and
//! attached back to the parent once their subtree is walked.

use indexmap::IndexMap;

use crate::dot::{quote_id, DotGraph};
use crate::model::{AttrMap, Edge, Model, Node};
use crate::style::{Kind, Stylesheet};

pub struct GraphContext {
    graph: DotGraph,
    styles: Stylesheet,
    ranks: IndexMap<String, Vec<String>>,
    level: usize,
    prefix: String,
    directed: bool,
}

impl GraphContext {
    /// Root context for a whole model. The model's own `styles` merge over
    /// the supplied stylesheet; its `classes` and direct attributes resolve
    /// to the root graph's attribute statement.
    pub fn root(model: &Model, name: &str, directed: bool, mut styles: Stylesheet) -> Self {
        styles.merge(&model.styles);
        Self::build(model, name, styles, String::new(), 0, directed)
    }

    fn build(
        model: &Model,
        name: &str,
        styles: Stylesheet,
        prefix: String,
        level: usize,
        directed: bool,
    ) -> Self {
        let mut graph = DotGraph::new(name, directed);
        for kind in [Kind::Graph, Kind::Node, Kind::Edge] {
            graph.attr_defaults(kind, styles.kind_defaults(kind));
        }

        let mut attrs = styles.resolve(Kind::Graph, &model.classes, &model.attrs);
        apply_visibility(&mut attrs, model.visible);
        graph.graph_attrs(attrs);

        Self {
            graph,
            styles,
            ranks: IndexMap::new(),
            level,
            prefix,
            directed,
        }
    }

    /// Child context one level deeper. The child inherits this context's
    /// stylesheet overlaid with its own model `styles` and carries its own
    /// `prefix`. A model flagged `cluster` gets the `cluster_` name marker
    /// restored so Graphviz draws it as a cluster box.
    pub fn new_context(&self, name: &str, child: &Model) -> Self {
        let mut styles = self.styles.clone();
        styles.merge(&child.styles);
        let dot_name = if child.cluster {
            format!("cluster_{name}")
        } else {
            name.to_string()
        };
        Self::build(
            child,
            &dot_name,
            styles,
            child.prefix.clone(),
            self.level + 1,
            self.directed,
        )
    }

    /// Attach a finished child context as a subgraph and fold its rank
    /// lists into this context's accumulator, existing entries first.
    pub fn add_subgraph_from_context(&mut self, child: GraphContext) {
        let GraphContext { graph, ranks, .. } = child;
        self.graph.subgraph(graph);
        for (rank, nodes) in ranks {
            self.ranks.entry(rank).or_default().extend(nodes);
        }
    }

    /// Emit a node under the prefixed id. A `rank` membership is recorded
    /// as a side effect on the accumulator and never reaches the backend
    /// as an attribute.
    pub fn add_node(&mut self, name: &str, node: &Node) {
        let id = self.node_id(name);
        if let Some(rank) = &node.rank {
            self.ranks.entry(rank.clone()).or_default().push(id.clone());
        }
        let mut attrs = self.styles.resolve(Kind::Node, &node.classes, &node.attrs);
        apply_visibility(&mut attrs, node.visible);
        self.graph.node(id, attrs);
    }

    /// Emit an edge. Endpoints are used exactly as given; the prefix
    /// transform does not apply to edges.
    pub fn add_edge(&mut self, edge: &Edge) {
        let mut attrs = self.styles.resolve(Kind::Edge, &edge.classes, &edge.attrs);
        apply_visibility(&mut attrs, edge.visible);
        self.graph.edge(edge.from.clone(), edge.to.clone(), attrs);
    }

    /// Flush one rank group as a raw grouping statement listing every node
    /// id accumulated under `rank_name`. Only complete once the whole
    /// subtree has been walked. The rank type is forwarded verbatim.
    pub fn add_rank(&mut self, rank_name: &str, rank_type: &str) {
        let names: Vec<String> = self
            .ranks
            .get(rank_name)
            .map(|nodes| nodes.iter().map(|id| quote_id(id)).collect())
            .unwrap_or_default();
        self.graph
            .raw(format!("{{rank={rank_type}; {}}}", names.join(" ")));
    }

    pub fn ranks(&self) -> &IndexMap<String, Vec<String>> {
        &self.ranks
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn source(&self) -> String {
        self.graph.source()
    }

    fn node_id(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        }
    }
}

fn apply_visibility(attrs: &mut AttrMap, visible: Option<bool>) {
    if visible == Some(false) {
        attrs.insert("style".to_string(), "invis".into());
    }
}
