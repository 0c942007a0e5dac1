//! DOT text backend.
//!
//! Builds a statement tree and serializes it to Graphviz DOT source. The
//! output shape is deliberately conservative: one statement per line, tab
//! indentation per nesting level, identifiers quoted only when the grammar
//! requires it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::AttrMap;
use crate::style::Kind;

static BARE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static NUMERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?(\.\d+|\d+(\.\d*)?)$").unwrap());

/// Reserved words that must be quoted even though they look like bare ids.
const DOT_KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// One statement inside a graph body, in emission order.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// Default attributes for a kind: `node [shape=box]`.
    Defaults(Kind, AttrMap),
    /// Plain attribute assignments for the enclosing graph: `rankdir=LR`.
    GraphAttrs(AttrMap),
    Node {
        id: String,
        attrs: AttrMap,
    },
    Edge {
        from: String,
        to: String,
        attrs: AttrMap,
    },
    /// A preformatted line emitted verbatim (rank groups use this).
    Raw(String),
    Subgraph(DotGraph),
}

/// A graph or subgraph under construction.
#[derive(Debug, Clone)]
pub struct DotGraph {
    name: String,
    directed: bool,
    body: Vec<Stmt>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            body: Vec::new(),
        }
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Append a kind-default statement. Empty bundles emit nothing.
    pub fn attr_defaults(&mut self, kind: Kind, attrs: AttrMap) {
        if !attrs.is_empty() {
            self.body.push(Stmt::Defaults(kind, attrs));
        }
    }

    /// Append the enclosing graph's own attributes. Empty bundles emit
    /// nothing.
    pub fn graph_attrs(&mut self, attrs: AttrMap) {
        if !attrs.is_empty() {
            self.body.push(Stmt::GraphAttrs(attrs));
        }
    }

    pub fn node(&mut self, id: impl Into<String>, attrs: AttrMap) {
        self.body.push(Stmt::Node {
            id: id.into(),
            attrs,
        });
    }

    pub fn edge(&mut self, from: impl Into<String>, to: impl Into<String>, attrs: AttrMap) {
        self.body.push(Stmt::Edge {
            from: from.into(),
            to: to.into(),
            attrs,
        });
    }

    pub fn raw(&mut self, line: impl Into<String>) {
        self.body.push(Stmt::Raw(line.into()));
    }

    pub fn subgraph(&mut self, graph: DotGraph) {
        self.body.push(Stmt::Subgraph(graph));
    }

    /// Serialize the whole tree to DOT source, ending in a newline.
    pub fn source(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out, 0, false);
        out
    }

    fn write_into(&self, out: &mut String, level: usize, nested: bool) {
        let indent = "\t".repeat(level);
        out.push_str(&indent);
        let keyword = if nested {
            "subgraph"
        } else if self.directed {
            "digraph"
        } else {
            "graph"
        };
        if self.name.is_empty() {
            if nested {
                out.push_str("{\n");
            } else {
                out.push_str(keyword);
                out.push_str(" {\n");
            }
        } else {
            out.push_str(keyword);
            out.push(' ');
            out.push_str(&quote_id(&self.name));
            out.push_str(" {\n");
        }

        for stmt in &self.body {
            self.write_stmt(stmt, out, level + 1);
        }

        out.push_str(&indent);
        out.push_str("}\n");
    }

    fn write_stmt(&self, stmt: &Stmt, out: &mut String, level: usize) {
        match stmt {
            Stmt::Defaults(kind, attrs) => {
                let list = attr_list(attrs);
                if !list.is_empty() {
                    out.push_str(&"\t".repeat(level));
                    out.push_str(kind.as_str());
                    out.push_str(&list);
                    out.push('\n');
                }
            }
            Stmt::GraphAttrs(attrs) => {
                let plain = plain_attrs(attrs);
                if !plain.is_empty() {
                    out.push_str(&"\t".repeat(level));
                    out.push_str(&plain);
                    out.push('\n');
                }
            }
            Stmt::Node { id, attrs } => {
                out.push_str(&"\t".repeat(level));
                out.push_str(&quote_id(id));
                out.push_str(&attr_list(attrs));
                out.push('\n');
            }
            Stmt::Edge { from, to, attrs } => {
                let op = if self.directed { "->" } else { "--" };
                out.push_str(&"\t".repeat(level));
                out.push_str(&format!(
                    "{} {op} {}{}",
                    quote_id(from),
                    quote_id(to),
                    attr_list(attrs)
                ));
                out.push('\n');
            }
            Stmt::Raw(line) => {
                out.push_str(&"\t".repeat(level));
                out.push_str(line);
                out.push('\n');
            }
            Stmt::Subgraph(graph) => {
                graph.write_into(out, level, true);
            }
        }
    }
}

/// Quote an identifier for DOT, leaving it bare when the grammar allows:
/// alphanumeric names, numerals, and HTML-like `<...>` labels pass through.
pub fn quote_id(input: &str) -> String {
    if is_html_like(input) {
        return input.to_string();
    }
    let bare = (BARE_ID_RE.is_match(input) || NUMERAL_RE.is_match(input))
        && !DOT_KEYWORDS.contains(&input.to_ascii_lowercase().as_str());
    if bare {
        input.to_string()
    } else {
        format!("\"{}\"", escape_quotes(input))
    }
}

fn is_html_like(input: &str) -> bool {
    input.starts_with('<') && input.ends_with('>') && input.len() >= 2
}

/// Escape double quotes that are not already escaped.
fn escape_quotes(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    let mut prev_backslash = false;
    for ch in input.chars() {
        if ch == '"' && !prev_backslash {
            out.push('\\');
        }
        prev_backslash = ch == '\\';
        out.push(ch);
    }
    out
}

/// Render a JSON attribute value as DOT text. `Null` yields `None` and the
/// attribute is dropped; structured values fall back to compact JSON.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(num) => Some(num.to_string()),
        other => Some(other.to_string()),
    }
}

fn rendered_pairs(attrs: &AttrMap) -> Vec<String> {
    attrs
        .iter()
        .filter_map(|(key, value)| {
            format_value(value).map(|text| format!("{}={}", quote_id(key), quote_id(&text)))
        })
        .collect()
}

/// Bracketed attribute list with a leading space, or empty when nothing
/// renders: ` [color=red shape=box]`.
fn attr_list(attrs: &AttrMap) -> String {
    let pairs = rendered_pairs(attrs);
    if pairs.is_empty() {
        String::new()
    } else {
        format!(" [{}]", pairs.join(" "))
    }
}

/// Unbracketed assignments for graph-level attributes: `rankdir=LR pad=0.5`.
fn plain_attrs(attrs: &AttrMap) -> String {
    rendered_pairs(attrs).join(" ")
}
