//! depscan-cli: argument parsing and output rendering for the `depscan` binary.

pub mod args;
pub mod render;

pub use args::{Cli, LayerArg, OutputFormat};
pub use render::{render, render_to_string, RenderFilter, RenderOptions};
