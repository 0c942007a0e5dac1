use std::path::{Path, PathBuf};

use jsondot::{
    builtin_styles, parse_model, parse_styles, walk, GraphContext, Model, Overlay, Stylesheet,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> Model {
    let input = std::fs::read_to_string(fixture_path(name)).expect("fixture read failed");
    parse_model(&input).expect("parse failed")
}

fn render(model: &Model, directed: bool, styles: Stylesheet) -> String {
    let mut ctx = GraphContext::root(model, "G", directed, styles);
    walk(&mut ctx, model);
    ctx.source()
}

fn render_plain(fixture: &str) -> String {
    render(&load_fixture(fixture), true, Stylesheet::new())
}

fn render_with_overlay(
    fixture: &str,
    select: &str,
    highlight: &str,
    shade: &str,
    remove: bool,
) -> String {
    let model = load_fixture(fixture);
    let overlay = Overlay::new(select, highlight, shade, remove);
    let mut styles = Stylesheet::new();
    styles.merge(&builtin_styles());
    let processed = overlay.preprocess_model(&model);
    render(&processed, true, styles)
}

fn assert_valid_dot(source: &str, fixture: &str) {
    assert!(
        source.starts_with("digraph ") || source.starts_with("graph "),
        "{fixture}: missing graph header"
    );
    assert!(source.ends_with("}\n"), "{fixture}: missing closing brace");
    assert_eq!(
        source.matches('{').count(),
        source.matches('}').count(),
        "{fixture}: unbalanced braces"
    );
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "two_nodes.json",
        "ranks.json",
        "styles.json",
        "prefixed.json",
        "nested.json",
        "overlay.json",
        "comments.json",
        "kitchen_sink.json",
    ];

    for name in candidates {
        assert!(fixture_path(name).exists(), "fixture missing: {}", name);
        let source = render_plain(name);
        assert_valid_dot(&source, name);
    }
}

#[test]
fn two_nodes_and_an_edge() {
    assert_eq!(
        render_plain("two_nodes.json"),
        "digraph G {\n\ta\n\tb\n\ta -> b\n}\n"
    );
}

#[test]
fn undirected_graphs_use_double_dash_edges() {
    let model = load_fixture("two_nodes.json");
    assert_eq!(
        render(&model, false, Stylesheet::new()),
        "graph G {\n\ta\n\tb\n\ta -- b\n}\n"
    );
}

#[test]
fn rank_groups_list_members_and_drop_the_rank_attr() {
    assert_eq!(
        render_plain("ranks.json"),
        "digraph G {\n\ta\n\tb\n\t{rank=same; a b}\n}\n"
    );
}

#[test]
fn class_styles_layer_under_direct_attributes() {
    let source = render_plain("styles.json");
    assert!(source.contains("\tnode [shape=box]\n"));
    assert!(source.contains("\ta [shape=ellipse color=blue]\n"));
    assert!(source.contains("\tb [shape=box]\n"));
    assert!(!source.contains("bogus"));
}

#[test]
fn prefixes_rename_nodes_but_not_edges() {
    let source = render_plain("prefixed.json");
    assert!(source.contains("\t\tp_x\n"));
    assert!(source.contains("\t\tp_y\n"));
    assert!(source.contains("\t\tp_x -> p_y\n"));
    assert!(!source.contains("\t\tx\n"));
}

#[test]
fn external_stylesheet_sits_under_model_styles() {
    let sheet = std::fs::read_to_string(fixture_path("sheet.json")).expect("fixture read failed");
    let mut styles = Stylesheet::new();
    styles.merge(&parse_styles(&sheet).expect("stylesheet parse failed"));

    let model = parse_model(
        r#"{"styles": {"db": {"shape": "box"}}, "nodes": {"n": {"classes": ["db"]}}}"#,
    )
    .expect("parse failed");
    let source = render(&model, true, styles);

    assert!(source.contains("\tnode [fontname=Helvetica]\n"));
    assert!(source.contains("\tn [fontname=Helvetica shape=box]\n"));
    assert!(!source.contains("cylinder"));
}

#[test]
fn kind_defaults_appear_in_root_and_subgraph_bodies() {
    let model = parse_model(
        r#"{"styles": {"node": {"shape": "box"}}, "subgraphs": {"s": {"nodes": {"x": {}}}}}"#,
    )
    .expect("parse failed");
    let source = render(&model, true, Stylesheet::new());
    assert!(source.contains("\tnode [shape=box]\n"));
    assert!(source.contains("\t\tnode [shape=box]\n"));
    assert!(source.contains("\t\tx [shape=box]\n"));
}

#[test]
fn select_hides_unmatched_elements() {
    let source = render_with_overlay("nested.json", "infra", "", "", false);
    assert!(source.contains("\tlobby [style=invis]\n"));
    assert!(source.contains("\tsubgraph cluster_infra {\n"));
    assert!(source.contains("\t\t\tprimary\n"));
    assert!(source.contains("\tsubgraph app {\n\t\tstyle=invis\n"));
    assert!(source.contains("\t\tweb [style=invis]\n"));
    assert!(source.contains("\tweb -> primary [style=invis]\n"));
}

#[test]
fn remove_deselected_prunes_and_collapses() {
    let source = render_with_overlay("nested.json", "infra.db,app", "", "", true);
    assert!(!source.contains("cluster_infra"));
    assert!(!source.contains("lobby"));
    assert!(source.contains("\tsubgraph db {\n"));
    assert!(source.contains("\t\tprimary\n"));
    assert!(source.contains("\t\treplica\n"));
    assert!(source.contains("\tsubgraph app {\n"));
    assert!(source.contains("\t\tweb\n"));
    assert!(!source.contains("web -> primary"));
}

#[test]
fn negated_selectors_keep_the_rest() {
    let source = render_with_overlay("nested.json", "^app", "", "", true);
    assert!(source.contains("\tlobby\n"));
    assert!(source.contains("\tsubgraph cluster_infra {\n"));
    assert!(!source.contains("subgraph app"));
    assert!(!source.contains("\t\tweb\n"));
    assert!(source.contains("\tweb -> primary\n"));
}

#[test]
fn highlight_and_shade_attach_builtin_styles() {
    let source = render_with_overlay("overlay.json", "", "svc.core", "svc", false);
    assert!(source.contains(
        "\tapi [penwidth=3 color=darkgrey fontcolor=darkgrey fillcolor=lightgrey]\n"
    ));
    assert!(source.contains("\tcache [color=darkgrey fontcolor=darkgrey fillcolor=lightgrey]\n"));
    assert!(source.contains("\tlogs\n"));
    assert!(source.contains(
        "\tapi -> cache [penwidth=3 color=darkgrey fontcolor=darkgrey fillcolor=lightgrey]\n"
    ));
}

#[test]
fn json5_models_with_comments_parse() {
    let source = render_plain("comments.json");
    assert!(source.contains("\ta [label=first]\n"));
    assert!(source.contains("\ta -> b\n"));
}

#[test]
fn kitchen_sink_renders_every_feature() {
    let source = render_plain("kitchen_sink.json");
    assert!(source.contains("\tnode [fontsize=11]\n"));
    assert!(source.contains("\tranksep=1.5 rankdir=LR\n"));
    assert!(source.contains("\tegress [fontsize=11 label=\"out gateway\"]\n"));
    assert!(source.contains("\tsubgraph cluster_data {\n"));
    assert!(source.contains("\t\td_kv [fontsize=11 shape=box3d]\n"));
    assert!(source.contains("\t\td_kv -> d_blob\n"));
    assert!(source.contains("\td_blob -> sched [constraint=false]\n"));
    assert!(source.contains("\t{rank=same; ingress egress runner}\n"));
}
