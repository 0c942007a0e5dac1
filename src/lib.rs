pub mod attrs;
pub mod cli;
pub mod context;
pub mod dot;
pub mod model;
pub mod overlay;
pub mod style;
pub mod walk;

pub use cli::run;
pub use context::GraphContext;
pub use model::{parse_model, parse_styles, Model};
pub use overlay::{builtin_styles, Overlay};
pub use style::Stylesheet;
pub use walk::walk;
