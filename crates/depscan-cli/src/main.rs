//! depscan: multi-language static dependency analyzer
//!
//! Walks the given paths, extracts module imports, type declarations, and
//! method calls, then renders the result as a terminal report, JSON, or a
//! Graphviz digraph.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use depscan_analysis::crawler::Crawler;
use depscan_analysis::grammar::LayerMask;
use depscan_cli::{render, Cli, RenderFilter, RenderOptions};
use depscan_core::config::DepscanConfig;
use depscan_core::tracing::init_tracing_with_default;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_with_default(cli.log_directive());

    let overrides = cli.overrides();
    let config = match &cli.config {
        Some(path) => DepscanConfig::load_file(path, Some(&overrides))
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DepscanConfig::load(&cli.config_root(), Some(&overrides)).context("loading configuration")?,
    };
    debug!(?config, "configuration resolved");

    let options = RenderOptions {
        filter: RenderFilter {
            layers: LayerMask::from_names(&config.analysis.layers),
            include: cli.include.clone(),
            exclude: cli.exclude.clone(),
        },
        stats: cli.stats,
    };

    let crawler = Crawler::new(config, cli.paths.clone()).context("compiling grammars")?;
    let graph = crawler.run().context("analysis failed")?;
    info!(
        files = graph.stats.files_analyzed + graph.stats.files_reused,
        dependencies = graph.stats.dependencies,
        failed = graph.stats.files_failed,
        "analysis complete"
    );

    let mut out: Box<dyn Write> = match &cli.file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    render(&graph, cli.output, &options, &mut out).context("writing output")?;
    out.flush().context("writing output")?;
    Ok(())
}
