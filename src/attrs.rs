use crate::model::AttrMap;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Attribute names accepted by Graphviz, per https://graphviz.org/doc/info/attrs.html.
/// `rank` is deliberately absent: the graph context interprets it as a rank
/// group membership and it must never reach the backend verbatim.
pub const VALID_ATTRS: [&str; 171] = [
    "_background",
    "area",
    "arrowhead",
    "arrowsize",
    "arrowtail",
    "bb",
    "bgcolor",
    "center",
    "charset",
    "class",
    "clusterrank",
    "color",
    "colorscheme",
    "comment",
    "compound",
    "concentrate",
    "constraint",
    "Damping",
    "decorate",
    "defaultdist",
    "dim",
    "dimen",
    "dir",
    "diredgeconstraints",
    "distortion",
    "dpi",
    "edgehref",
    "edgetarget",
    "edgetooltip",
    "edgeURL",
    "epsilon",
    "esep",
    "fillcolor",
    "fixedsize",
    "fontcolor",
    "fontname",
    "fontnames",
    "fontpath",
    "fontsize",
    "forcelabels",
    "gradientangle",
    "group",
    "head_lp",
    "headclip",
    "headhref",
    "headlabel",
    "headport",
    "headtarget",
    "headtooltip",
    "headURL",
    "height",
    "href",
    "id",
    "image",
    "imagepath",
    "imagepos",
    "imagescale",
    "inputscale",
    "K",
    "label",
    "label_scheme",
    "labelangle",
    "labeldistance",
    "labelfloat",
    "labelfontcolor",
    "labelfontname",
    "labelfontsize",
    "labelhref",
    "labeljust",
    "labelloc",
    "labeltarget",
    "labeltooltip",
    "labelURL",
    "landscape",
    "layer",
    "layerlistsep",
    "layers",
    "layerselect",
    "layersep",
    "layout",
    "len",
    "levels",
    "levelsgap",
    "lhead",
    "lheight",
    "lp",
    "ltail",
    "lwidth",
    "margin",
    "maxiter",
    "mclimit",
    "mindist",
    "minlen",
    "mode",
    "model",
    "mosek",
    "newrank",
    "nodesep",
    "nojustify",
    "normalize",
    "notranslate",
    "nslimit",
    "nslimit1",
    "ordering",
    "orientation",
    "outputorder",
    "overlap",
    "overlap_scaling",
    "overlap_shrink",
    "pack",
    "packmode",
    "pad",
    "page",
    "pagedir",
    "pencolor",
    "penwidth",
    "peripheries",
    "pin",
    "pos",
    "quadtree",
    "quantum",
    "rankdir",
    "ranksep",
    "ratio",
    "rects",
    "regular",
    "remincross",
    "repulsiveforce",
    "resolution",
    "root",
    "rotate",
    "rotation",
    "samehead",
    "sametail",
    "samplepoints",
    "scale",
    "searchsize",
    "sep",
    "shape",
    "shapefile",
    "showboxes",
    "sides",
    "size",
    "skew",
    "smoothing",
    "sortv",
    "splines",
    "start",
    "style",
    "stylesheet",
    "tail_lp",
    "tailclip",
    "tailhref",
    "taillabel",
    "tailport",
    "tailtarget",
    "tailtooltip",
    "tailURL",
    "target",
    "tooltip",
    "truecolor",
    "URL",
    "vertices",
    "viewport",
    "voro_margin",
    "weight",
    "width",
    "xdotversion",
    "xlabel",
    "xlp",
    "z",
];

static VALID_ATTR_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| VALID_ATTRS.iter().copied().collect());

/// Exact, case-sensitive membership test (`Damping`, `K` and `URL` really are
/// spelled that way).
pub fn is_valid_attr(name: &str) -> bool {
    VALID_ATTR_SET.contains(name)
}

/// Keep only whitelisted keys, preserving input order. Unknown keys are
/// dropped silently; they are not an error.
pub fn filter_attrs(attrs: &AttrMap) -> AttrMap {
    attrs
        .iter()
        .filter(|(key, _)| is_valid_attr(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
