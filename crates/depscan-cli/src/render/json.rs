use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use depscan_analysis::call_graph::MethodDefinition;
use depscan_analysis::crawler::{CrawlStats, DependencyGraph, FileFailure};
use depscan_analysis::extractors::ExtractedDependency;
use depscan_analysis::incremental::DependencyChange;
use depscan_analysis::structures::StructureEntry;

use super::RenderOptions;

const FORMAT_VERSION: &str = "1.0";

#[derive(Serialize)]
struct Report<'a> {
    dependencies: Vec<&'a ExtractedDependency>,
    methods: Vec<&'a MethodDefinition>,
    structures: Vec<&'a StructureEntry>,
    cycles: &'a [Vec<String>],
    #[serde(skip_serializing_if = "is_empty")]
    changes: &'a [DependencyChange],
    #[serde(skip_serializing_if = "is_empty")]
    failures: &'a [FileFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a CrawlStats>,
    metadata: Metadata,
}

#[derive(Serialize)]
struct Metadata {
    format_version: &'static str,
    generated_at: u64,
    total_dependencies: usize,
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

pub(super) fn write(graph: &DependencyGraph, options: &RenderOptions, out: &mut dyn Write) -> io::Result<()> {
    let filter = &options.filter;
    let dependencies: Vec<&ExtractedDependency> = filter.dependencies(graph).collect();
    let report = Report {
        metadata: Metadata {
            format_version: FORMAT_VERSION,
            generated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            total_dependencies: dependencies.len(),
        },
        dependencies,
        methods: filter.methods(graph).collect(),
        structures: filter.structures(graph).collect(),
        cycles: &graph.cycles,
        changes: &graph.changes,
        failures: &graph.failures,
        stats: options.stats.then_some(&graph.stats),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
