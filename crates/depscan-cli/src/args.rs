//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use depscan_core::config::CliOverrides;
use depscan_core::tracing::setup::DEFAULT_FILTER;

/// depscan: multi-language static dependency analyzer
#[derive(Parser, Debug)]
#[command(name = "depscan")]
#[command(about = "Extract module, struct, and method dependencies from a source tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Files or directories to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum directory depth below each root
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Layers to extract (repeatable)
    #[arg(long = "layer", value_enum)]
    pub layers: Vec<LayerArg>,

    /// Only show dependencies whose target or file contains this text (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Hide dependencies whose target or file contains this text (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Skip paths matching this glob while walking (repeatable)
    #[arg(long = "ignore")]
    pub ignore: Vec<String>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Process files on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Reuse results for unchanged files across runs
    #[arg(long)]
    pub incremental: bool,

    /// Where incremental state is persisted
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Disable the file content cache
    #[arg(long)]
    pub no_cache: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub output: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Append crawl statistics
    #[arg(long)]
    pub stats: bool,

    /// Load configuration from this file instead of the project and user files
    #[arg(short, long, env = "DEPSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Grouped tree per file
    Terminal,
    /// Pretty-printed JSON document
    Json,
    /// Graphviz digraph
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayerArg {
    Module,
    Struct,
    Method,
    All,
}

impl LayerArg {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            LayerArg::Module => &["module"],
            LayerArg::Struct => &["struct"],
            LayerArg::Method => &["method"],
            LayerArg::All => &["module", "struct", "method"],
        }
    }
}

impl Cli {
    /// Layer names selected on the command line, deduplicated.
    /// Empty when no `--layer` was given.
    pub fn layer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.layers.iter().flat_map(|l| l.names()) {
            if !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }
        names
    }

    /// Flags that take precedence over every configuration file.
    /// Switches left off on the command line do not override the files.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            max_depth: self.depth,
            threads: self.threads,
            parallel: self.parallel.then_some(true),
            incremental: self.incremental.then_some(true),
            cache_enabled: self.no_cache.then_some(false),
            state_file: self.state_file.clone(),
            layers: self.layer_names(),
            exclude: self.ignore.clone(),
        }
    }

    /// Directory whose `depscan.toml` applies: the first path, or its
    /// parent when it names a file.
    pub fn config_root(&self) -> PathBuf {
        let first = self.paths.first().map(PathBuf::as_path).unwrap_or(Path::new("."));
        if first.is_file() {
            match first.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            first.to_path_buf()
        }
    }

    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "depscan=debug"
        } else {
            DEFAULT_FILTER
        }
    }
}
