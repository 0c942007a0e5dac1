use crate::context::GraphContext;
use crate::model::{parse_model, parse_styles};
use crate::overlay::{builtin_styles, Overlay};
use crate::style::Stylesheet;
use crate::walk::walk;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "jdot", version, about = "Render JSON graph models to Graphviz DOT")]
pub struct Args {
    /// Name of the graph
    #[arg(short = 'n', long = "name", default_value = "G")]
    pub name: String,

    /// Input JSON model file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// External stylesheet JSON file
    #[arg(short = 's', long = "stylesheet")]
    pub stylesheet: Option<PathBuf>,

    /// Output DOT file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Graph type
    #[arg(short = 't', long = "graph-type", value_enum, default_value = "digraph")]
    pub graph_type: GraphType,

    /// Comma-separated path prefixes to keep visible ('^' negates)
    #[arg(long = "select", default_value = "")]
    pub select: String,

    /// Comma-separated path prefixes to highlight
    #[arg(long = "highlight", default_value = "")]
    pub highlight: String,

    /// Comma-separated path prefixes to shade
    #[arg(long = "shade", default_value = "")]
    pub shade: String,

    /// Remove deselected elements as opposed to hiding them. This will also
    /// remove not-selected subgraphs instead of just the elements.
    #[arg(long = "remove-deselected")]
    pub remove_deselected: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum GraphType {
    Graph,
    Digraph,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let input = read_input(args.input.as_deref())?;
    let model = parse_model(&input)?;

    let overlay = Overlay::new(
        &args.select,
        &args.highlight,
        &args.shade,
        args.remove_deselected,
    );

    let mut styles = Stylesheet::new();
    if overlay.is_active() {
        styles.merge(&builtin_styles());
    }
    if let Some(path) = args.stylesheet.as_deref() {
        let sheet = std::fs::read_to_string(path)?;
        styles.merge(&parse_styles(&sheet)?);
    }

    let model = if overlay.is_active() {
        overlay.preprocess_model(&model)
    } else {
        model
    };

    let directed = matches!(args.graph_type, GraphType::Digraph);
    let mut ctx = GraphContext::root(&model, &args.name, directed, styles);
    walk(&mut ctx, &model);

    write_output(&ctx.source(), args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(source: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, source)?;
        }
        None => {
            print!("{}", source);
        }
    }
    Ok(())
}
