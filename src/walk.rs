//! Model traversal.
//!
//! Walks a model in fixed order: nodes, subgraphs, edges, ranks. Ranks come
//! last because rank groups accumulate members while nodes and subgraphs are
//! visited; flushing them earlier would silently drop later members.

use indexmap::IndexMap;

use crate::context::GraphContext;
use crate::model::{Edge, Model, Node};

pub fn walk(ctx: &mut GraphContext, model: &Model) {
    add_nodes(ctx, &model.nodes);
    add_subgraphs(ctx, &model.subgraphs);
    add_edges(ctx, &model.edges);
    add_ranks(ctx, &model.ranks);
}

fn add_nodes(ctx: &mut GraphContext, nodes: &IndexMap<String, Node>) {
    for (id, node) in nodes {
        ctx.add_node(id, node);
    }
}

fn add_subgraphs(ctx: &mut GraphContext, subgraphs: &IndexMap<String, Model>) {
    for (name, model) in subgraphs {
        let mut child = ctx.new_context(name, model);
        walk(&mut child, model);
        ctx.add_subgraph_from_context(child);
    }
}

fn add_edges(ctx: &mut GraphContext, edges: &[Edge]) {
    for edge in edges {
        ctx.add_edge(edge);
    }
}

fn add_ranks(ctx: &mut GraphContext, ranks: &IndexMap<String, String>) {
    for (name, rank_type) in ranks {
        ctx.add_rank(name, rank_type);
    }
}
